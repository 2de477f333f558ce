//! Per-stage run records.

use crate::core::{StageOutput, StageStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened when the runner executed one stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageResult {
    /// Stage name.
    pub name: String,
    /// The field the stage is declared to write.
    pub output_key: String,
    /// Stage status.
    pub status: StageStatus,
    /// Whether the output field was written.
    pub wrote_output: bool,
    /// Declared inputs that were absent when the stage started.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_inputs: Vec<String>,
    /// When the stage started.
    pub started_at: DateTime<Utc>,
    /// When the stage ended.
    pub ended_at: DateTime<Utc>,
    /// Error message if failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StageResult {
    /// Builds a record from a finished stage output.
    #[must_use]
    pub fn from_output(
        name: impl Into<String>,
        output_key: impl Into<String>,
        output: &StageOutput,
        missing_inputs: Vec<String>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            output_key: output_key.into(),
            status: output.status,
            wrote_output: output.has_value(),
            missing_inputs,
            started_at,
            ended_at: Utc::now(),
            error: output.error.clone(),
        }
    }

    /// Returns the duration in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        (self.ended_at - self.started_at).num_milliseconds()
    }

    /// Returns true if the stage succeeded and wrote its field.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == StageStatus::Ok && self.wrote_output
    }
}
