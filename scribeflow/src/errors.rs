//! Error types for scribeflow.
//!
//! Pipelines are best-effort: a failing stage is recorded in the run report
//! rather than surfaced as an `Err`. The types here cover the failures that do
//! propagate: invalid pipeline construction, provider transport problems,
//! search failures and explicit file I/O.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// The main error type for scribeflow operations.
#[derive(Debug, Error)]
pub enum ScribeflowError {
    /// A pipeline validation error occurred.
    #[error("{0}")]
    Validation(#[from] PipelineValidationError),

    /// An LLM provider call failed.
    #[error("{0}")]
    Provider(#[from] ProviderError),

    /// A web search failed.
    #[error("{0}")]
    Search(#[from] SearchError),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Metadata about a contract error for better diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ContractErrorInfo {
    /// Error code (e.g., "CONTRACT-001-EMPTY").
    pub code: String,
    /// Short summary of the error.
    pub summary: String,
    /// Hint for fixing the error.
    pub fix_hint: Option<String>,
    /// Additional context key-value pairs.
    #[serde(default)]
    pub context: HashMap<String, String>,
}

impl ContractErrorInfo {
    /// Creates a new contract error info.
    #[must_use]
    pub fn new(code: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            summary: summary.into(),
            fix_hint: None,
            context: HashMap::new(),
        }
    }

    /// Sets the fix hint.
    #[must_use]
    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }

    /// Adds a single context entry.
    #[must_use]
    pub fn with_context_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

/// Error raised when a pipeline definition is rejected by the builder.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct PipelineValidationError {
    /// The error message.
    pub message: String,
    /// The stages involved in the error.
    pub stages: Vec<String>,
    /// Optional contract error info.
    pub error_info: Option<ContractErrorInfo>,
}

impl PipelineValidationError {
    /// Creates a new pipeline validation error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stages: Vec::new(),
            error_info: None,
        }
    }

    /// Sets the stages involved.
    #[must_use]
    pub fn with_stages(mut self, stages: Vec<String>) -> Self {
        self.stages = stages;
        self
    }

    /// Sets the contract error info.
    #[must_use]
    pub fn with_error_info(mut self, info: ContractErrorInfo) -> Self {
        self.error_info = Some(info);
        self
    }

    /// Returns the contract code, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.error_info.as_ref().map(|info| info.code.as_str())
    }
}

/// Errors returned by LLM providers.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The HTTP request could not be sent or timed out.
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The API answered with a non-success status.
    #[error("API error (status {status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The response body could not be decoded.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A scripted mock ran out of responses.
    #[error("Mock provider exhausted after {calls} calls")]
    Exhausted {
        /// Number of calls served.
        calls: usize,
    },
}

/// Errors returned by web search backends.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    /// The HTTP request failed.
    #[error("Search request failed: {0}")]
    RequestFailed(String),

    /// The search backend answered with a non-success status.
    #[error("Search backend returned status {0}")]
    Status(u16),

    /// The response could not be parsed.
    #[error("Search response could not be parsed: {0}")]
    Parse(String),
}

/// Provides default suggestions for common contract error codes.
pub struct ContractSuggestions;

impl ContractSuggestions {
    /// Gets a suggestion for a given error code.
    #[must_use]
    pub fn get(code: &str) -> Option<&'static str> {
        match code {
            "CONTRACT-001-EMPTY" => Some("Add at least one stage to the pipeline before building."),
            "CONTRACT-002-FINAL_FIELD" => Some(
                "Name the final field with `final_field` and make sure some stage writes it.",
            ),
            "CONTRACT-003-MISSING_INPUT" => Some(
                "Seed the field before the run or move the producing stage earlier in the list.",
            ),
            "CONTRACT-005-DUPLICATE_STAGE" => Some("Give every stage a unique name."),
            _ => None,
        }
    }
}
