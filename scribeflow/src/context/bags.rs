//! The blackboard: field-name to value store shared by pipeline stages.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder rendered for fields that were never written.
pub const NOT_SET: &str = "Not set";

/// Field store threaded through a single pipeline run.
///
/// Fields are only added or overwritten, never removed. Absence is represented
/// by the key not being present; [`NOT_SET`] is only ever produced when a
/// missing field is rendered as text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Blackboard {
    fields: BTreeMap<String, serde_json::Value>,
}

impl Blackboard {
    /// Creates an empty blackboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a field, builder style.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Writes a field, returning the previous value if it was overwritten.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Option<serde_json::Value> {
        self.fields.insert(key.into(), value.into())
    }

    /// Gets a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields.get(key)
    }

    /// Gets a field rendered as text.
    ///
    /// Strings are returned verbatim; any other JSON value is pretty-printed.
    #[must_use]
    pub fn get_text(&self, key: &str) -> Option<String> {
        self.fields.get(key).map(render_value)
    }

    /// Gets a field as text, or `placeholder` when absent.
    #[must_use]
    pub fn text_or(&self, key: &str, placeholder: &str) -> String {
        self.get_text(key).unwrap_or_else(|| placeholder.to_string())
    }

    /// Deserializes a structured field.
    ///
    /// Returns `None` when the field is absent or does not match `T`.
    #[must_use]
    pub fn get_as<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.fields
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Checks if a field is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Returns the field names in sorted order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no field has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Reports, for each requested key, whether it is set.
    #[must_use]
    pub fn field_status<'a>(&self, keys: &[&'a str]) -> Vec<(&'a str, bool)> {
        keys.iter().map(|k| (*k, self.contains(k))).collect()
    }

    /// Returns a copy of all fields.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, serde_json::Value> {
        self.fields.clone()
    }
}

fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}
