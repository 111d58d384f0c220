//! drafts::entry
//!
//! Draft identity and the persisted entry format.
//!
//! # Wire format
//!
//! ```json
//! {"base": {...}, "modified": {...}, "savedAt": "2026-10-16T09:30:00.000Z"}
//! ```
//!
//! All three fields are required. A stored value that is not JSON, lacks a
//! field, or has a `savedAt` that is not an RFC 3339 timestamp does not parse.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key namespace shared by every draft.
pub const KEY_PREFIX: &str = "autosave:";

/// Sentinel id for an entity that has never been saved.
pub const NEW_ENTITY_SENTINEL: &str = "__new__";

/// Which entity a draft belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DraftKey {
    /// An entity the server already knows, by id.
    Id(String),
    /// The unsaved entity currently being created.
    New,
}

impl DraftKey {
    /// Parse a user-facing id; the sentinel maps back to [`DraftKey::New`].
    pub fn parse(id: &str) -> Self {
        if id == NEW_ENTITY_SENTINEL {
            Self::New
        } else {
            Self::Id(id.to_string())
        }
    }

    /// Recover the key from a full storage key, if it is in the draft namespace.
    pub fn from_storage_key(key: &str) -> Option<Self> {
        key.strip_prefix(KEY_PREFIX).map(Self::parse)
    }

    /// The entity id, or `None` for the new-entity sentinel.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Id(id) => Some(id),
            Self::New => None,
        }
    }

    /// Full key under which the draft is stored.
    pub fn storage_key(&self) -> String {
        format!("{}{}", KEY_PREFIX, self)
    }
}

impl fmt::Display for DraftKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => f.write_str(id),
            Self::New => f.write_str(NEW_ENTITY_SENTINEL),
        }
    }
}

impl From<Option<&str>> for DraftKey {
    fn from(id: Option<&str>) -> Self {
        match id {
            Some(id) => Self::Id(id.to_string()),
            None => Self::New,
        }
    }
}

impl From<&str> for DraftKey {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

/// A recoverable pair of snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftEntry {
    /// State the edits started from.
    pub base: Value,
    /// The user's working state.
    pub modified: Value,
    /// When the draft was written.
    #[serde(with = "saved_at")]
    pub saved_at: DateTime<Utc>,
}

impl DraftEntry {
    pub fn new(base: Value, modified: Value, saved_at: DateTime<Utc>) -> Self {
        Self {
            base,
            modified,
            saved_at,
        }
    }

    /// Parse a stored value. Any malformed input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

/// Millisecond-precision RFC 3339 with a `Z` suffix.
mod saved_at {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    mod keys {
        use super::*;

        #[test]
        fn storage_keys() {
            assert_eq!(DraftKey::from("p1").storage_key(), "autosave:p1");
            assert_eq!(DraftKey::New.storage_key(), "autosave:__new__");
            assert_eq!(DraftKey::from(None).storage_key(), "autosave:__new__");
        }

        #[test]
        fn parse_recognizes_sentinel() {
            assert_eq!(DraftKey::parse("__new__"), DraftKey::New);
            assert_eq!(DraftKey::parse("p1"), DraftKey::Id("p1".into()));
        }

        #[test]
        fn from_storage_key() {
            assert_eq!(
                DraftKey::from_storage_key("autosave:p1"),
                Some(DraftKey::Id("p1".into()))
            );
            assert_eq!(
                DraftKey::from_storage_key("autosave:__new__"),
                Some(DraftKey::New)
            );
            assert_eq!(DraftKey::from_storage_key("auth:token"), None);
        }

        #[test]
        fn id_accessor() {
            assert_eq!(DraftKey::from("p1").id(), Some("p1"));
            assert_eq!(DraftKey::New.id(), None);
        }
    }

    mod format {
        use super::*;

        #[test]
        fn serializes_camel_case_with_millis() {
            let at = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();
            let entry = DraftEntry::new(json!({"a": 1}), json!({"a": 2}), at);

            let value = serde_json::to_value(&entry).unwrap();
            assert_eq!(
                value,
                json!({"base": {"a": 1}, "modified": {"a": 2}, "savedAt": "2026-10-16T09:30:00.000Z"})
            );
        }

        #[test]
        fn parses_stored_entry() {
            let entry = DraftEntry::parse(
                r#"{"base":{},"modified":{"x":1},"savedAt":"2026-10-16T09:30:00.000Z"}"#,
            )
            .expect("valid entry");
            assert_eq!(entry.modified, json!({"x": 1}));
            assert_eq!(
                entry.saved_at,
                Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap()
            );
        }

        #[test]
        fn null_snapshots_are_allowed() {
            let entry = DraftEntry::parse(
                r#"{"base":null,"modified":null,"savedAt":"2026-10-16T09:30:00Z"}"#,
            );
            assert!(entry.is_some());
        }

        #[test]
        fn malformed_values_do_not_parse() {
            assert!(DraftEntry::parse("not-json").is_none());
            assert!(DraftEntry::parse("[]").is_none());
            assert!(DraftEntry::parse(r#"{"base":{},"modified":{}}"#).is_none());
            assert!(DraftEntry::parse(r#"{"modified":{},"savedAt":"2026-10-16T09:30:00Z"}"#).is_none());
            assert!(
                DraftEntry::parse(r#"{"base":{},"modified":{},"savedAt":"yesterday"}"#).is_none()
            );
        }
    }
}
