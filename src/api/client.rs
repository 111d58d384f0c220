//! api::client
//!
//! REST client that attaches the session's bearer token and recovers from an
//! expired access token.
//!
//! # Protocol
//!
//! 1. Send the request with `Content-Type: application/json` and, when the
//!    session holds one, `Authorization: Bearer <access token>`.
//! 2. Success: decode the body. Any other status except 401: fail with
//!    [`ApiError::Http`].
//! 3. 401 without a refresh token: clear the access token, notify
//!    `on_unauthorized`, fail with [`ApiError::Unauthorized`].
//! 4. 401 with a refresh token: refresh (single-flight). On failure both
//!    tokens are cleared and `on_unauthorized` fires once. On success the
//!    original request is sent exactly once more and its outcome returned
//!    as is; a second 401 is an [`ApiError::Http`], not another refresh.
//!
//! After a 401 the session is re-checked: if its access token is no longer
//! the one this request sent, another caller already refreshed, and the
//! request goes straight to its single retry.

use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::errors::{ApiError, RefreshFailure};
use super::refresh::RefreshCoordinator;
use crate::auth::{Credentials, Session};
use crate::core::config::schema::DEFAULT_REFRESH_PATH;
use crate::core::config::Config;
use crate::editor::EntityLoader;

/// Authenticated JSON client bound to one base URL and one [`Session`].
///
/// Clones share the session and the in-flight refresh.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    refresh_path: String,
    session: Arc<Session>,
    refresh: Arc<RefreshCoordinator>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("refresh_path", &self.refresh_path)
            .field("session", &self.session)
            .finish()
    }
}

impl ApiClient {
    /// Create a client for `base_url` (trailing slashes are ignored).
    pub fn new(base_url: impl Into<String>, session: Arc<Session>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            session,
            refresh: Arc::new(RefreshCoordinator::new()),
        }
    }

    /// Create a client from the configured base URL and refresh path.
    pub fn from_config(config: &Config, session: Arc<Session>) -> Self {
        Self::new(config.api_base_url(), session).with_refresh_path(config.refresh_path())
    }

    /// Use a different refresh endpoint path.
    pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        decode(self.send(Method::GET, path, None).await?)
    }

    pub async fn post<B, T>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode(body)?;
        decode(self.send(Method::POST, path, body.as_ref()).await?)
    }

    pub async fn put<B, T>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode(body)?;
        decode(self.send(Method::PUT, path, body.as_ref()).await?)
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        decode(self.send(Method::DELETE, path, None).await?)
    }

    // =========================================================================
    // Send / refresh / retry
    // =========================================================================

    /// Issue a request, refreshing and retrying once on 401.
    ///
    /// An empty success body decodes as `null`.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let sent = self.session.access_token();
        let response = self.execute(&method, path, body, sent.as_deref()).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return handle_response(response).await;
        }
        debug!(%method, path, "request unauthorized");

        // Re-check: another caller may have refreshed or logged out meanwhile.
        let current = self.session.access_token();
        if current == sent {
            if self.session.refresh_token().is_none() {
                self.session.clear_access_token();
                self.session.notify_unauthorized();
                return Err(ApiError::Unauthorized);
            }
            self.refresh_credentials().await?;
        } else if current.is_none() {
            return Err(ApiError::Unauthorized);
        } else {
            debug!(%method, path, "token changed while in flight, skipping refresh");
        }

        debug!(%method, path, "retrying request once");
        let token = self.session.access_token();
        let retry = self.execute(&method, path, body, token.as_deref()).await?;
        handle_response(retry).await
    }

    async fn execute(
        &self,
        method: &Method,
        path: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .http
            .request(method.clone(), &url)
            .headers(headers(token)?);
        if let Some(body) = body {
            request = request.body(body.to_string());
        }
        Ok(request.send().await?)
    }

    /// Run (or join) the single in-flight refresh.
    ///
    /// Fails with [`ApiError::Unauthorized`] when the refresh fails; by then
    /// the session has been cleared and observers notified.
    async fn refresh_credentials(&self) -> Result<(), ApiError> {
        let http = self.http.clone();
        let url = format!("{}{}", self.base_url, self.refresh_path);
        let session = self.session.clone();

        let result = self
            .refresh
            .run(move || {
                async move {
                    let outcome = request_refresh(&http, &url, &session).await;
                    match &outcome {
                        Ok(credentials) => {
                            info!("credentials refreshed");
                            session.set_credentials(credentials.clone());
                            session.notify_refreshed(credentials);
                        }
                        Err(failure) => {
                            warn!(error = %failure, "credential refresh failed");
                            session.clear();
                            session.notify_unauthorized();
                        }
                    }
                    outcome.map(|_| ())
                }
                .boxed()
            })
            .await;

        result.map_err(|_| ApiError::Unauthorized)
    }
}

/// POST the refresh token and parse the new pair. No bearer header is sent.
async fn request_refresh(
    http: &Client,
    url: &str,
    session: &Session,
) -> Result<Credentials, RefreshFailure> {
    let refresh_token = session
        .refresh_token()
        .ok_or(RefreshFailure::Rejected(StatusCode::UNAUTHORIZED.as_u16()))?;
    debug!("requesting credential refresh");

    let response = http
        .post(url)
        .header(CONTENT_TYPE, "application/json")
        .body(json!({ "refreshToken": refresh_token }).to_string())
        .send()
        .await
        .map_err(|e| RefreshFailure::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(RefreshFailure::Rejected(status.as_u16()));
    }
    response
        .json::<Credentials>()
        .await
        .map_err(|e| RefreshFailure::Decode(e.to_string()))
}

fn headers(token: Option<&str>) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(token) = token {
        let value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ApiError::InvalidHeader("bearer token contains invalid characters".into()))?;
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

async fn handle_response(response: Response) -> Result<Value, ApiError> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(ApiError::Http {
            status: status.as_u16(),
            body: text,
        });
    }
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
}

fn encode<B: Serialize + ?Sized>(body: Option<&B>) -> Result<Option<Value>, ApiError> {
    body.map(serde_json::to_value)
        .transpose()
        .map_err(|e| ApiError::Decode(format!("cannot encode request body: {}", e)))
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl EntityLoader for ApiClient {
    /// Fetch the assembled config of a pattern.
    async fn load(&self, id: &str) -> Result<Value, ApiError> {
        self.assembled_config(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_without_token() {
        let headers = headers(None).unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn headers_with_token() {
        let headers = headers(Some("abc")).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc");
    }

    #[test]
    fn invalid_token_does_not_leak() {
        let err = headers(Some("bad\ntoken-secret")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidHeader(_)));
        assert!(!err.to_string().contains("secret"));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8080/", Arc::new(Session::new()));
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn from_config_uses_configured_paths() {
        let client = ApiClient::from_config(&Config::default(), Arc::new(Session::new()));
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.refresh_path, "/api/auth/refresh");
    }

    #[test]
    fn debug_omits_tokens() {
        let session = Arc::new(Session::with_credentials(Credentials::new("tok-a", "tok-r")));
        let client = ApiClient::new("http://localhost", session);
        let debug = format!("{:?}", client);
        assert!(!debug.contains("tok-a"));
        assert!(!debug.contains("tok-r"));
    }
}
