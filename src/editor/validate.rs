//! editor::validate
//!
//! The schema-validation seam.
//!
//! Validation rules belong to the host; the session only asks whether a
//! value is acceptable before adopting a restored draft.

use serde_json::Value;

use crate::core::json::type_name;

/// Accepts or rejects a config value.
///
/// Closures of the form `Fn(&Value) -> Result<(), String>` implement this.
pub trait SchemaValidator: Send + Sync {
    /// `Err` carries a message for the user.
    fn validate(&self, value: &Value) -> Result<(), String>;
}

impl<F> SchemaValidator for F
where
    F: Fn(&Value) -> Result<(), String> + Send + Sync,
{
    fn validate(&self, value: &Value) -> Result<(), String> {
        self(value)
    }
}

/// Accepts every value.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl SchemaValidator for AcceptAll {
    fn validate(&self, _value: &Value) -> Result<(), String> {
        Ok(())
    }
}

/// Accepts only values whose root is a mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireObject;

impl SchemaValidator for RequireObject {
    fn validate(&self, value: &Value) -> Result<(), String> {
        if value.is_object() {
            Ok(())
        } else {
            Err(format!("expected a mapping at the root, found {}", type_name(value)))
        }
    }
}
