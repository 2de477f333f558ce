//! Stage output type with factory methods.

use super::StageStatus;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The output of a stage execution.
///
/// A stage writes at most one field. `value` carries what the runner stores
/// under the stage's output key; a failed or skipped stage leaves it empty and
/// the field stays absent on the blackboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageOutput {
    /// The status of the stage execution.
    pub status: StageStatus,

    /// The value written to the stage's output field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,

    /// Additional metadata.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,

    /// Error message (for failed executions).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Skip reason (for skipped executions).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
}

impl Default for StageOutput {
    fn default() -> Self {
        Self::ok_empty()
    }
}

impl StageOutput {
    /// Creates a successful output carrying a value.
    #[must_use]
    pub fn ok(value: serde_json::Value) -> Self {
        Self {
            status: StageStatus::Ok,
            value: Some(value),
            metadata: HashMap::new(),
            error: None,
            skip_reason: None,
        }
    }

    /// Creates a successful output with a string value.
    #[must_use]
    pub fn ok_text(text: impl Into<String>) -> Self {
        Self::ok(serde_json::Value::String(text.into()))
    }

    /// Creates a successful output that writes nothing.
    ///
    /// The runner treats this like any other missing output.
    #[must_use]
    pub fn ok_empty() -> Self {
        Self {
            status: StageStatus::Ok,
            value: None,
            metadata: HashMap::new(),
            error: None,
            skip_reason: None,
        }
    }

    /// Creates a skip output with a reason.
    #[must_use]
    pub fn skip(reason: impl Into<String>) -> Self {
        Self {
            status: StageStatus::Skip,
            value: None,
            metadata: HashMap::new(),
            error: None,
            skip_reason: Some(reason.into()),
        }
    }

    /// Creates a failure output with an error message.
    #[must_use]
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            status: StageStatus::Fail,
            value: None,
            metadata: HashMap::new(),
            error: Some(error.into()),
            skip_reason: None,
        }
    }

    /// Adds a single metadata entry.
    #[must_use]
    pub fn add_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Returns true if the stage succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == StageStatus::Ok
    }

    /// Returns true if the stage failed.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.status == StageStatus::Fail
    }

    /// Returns true if the output carries a value to write.
    #[must_use]
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }
}
