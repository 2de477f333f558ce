//! Stage specifications.

use crate::errors::{ContractErrorInfo, PipelineValidationError};
use crate::stages::Stage;
use std::sync::Arc;

/// Specification for a single stage in a pipeline.
///
/// Pairs a stage implementation with the blackboard fields it reads and the
/// one field it writes. Immutable once added to a builder.
#[derive(Debug, Clone)]
pub struct StageSpec {
    /// The unique name of the stage.
    pub name: String,
    /// The stage implementation.
    pub runner: Arc<dyn Stage>,
    /// Fields this stage reads.
    pub inputs: Vec<String>,
    /// The field this stage writes.
    pub output_key: String,
}

impl StageSpec {
    /// Creates a new stage specification.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        runner: Arc<dyn Stage>,
        output_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            runner,
            inputs: Vec::new(),
            output_key: output_key.into(),
        }
    }

    /// Sets the input fields.
    #[must_use]
    pub fn with_inputs(mut self, inputs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    /// Adds an input field.
    #[must_use]
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        let input = input.into();
        if !self.inputs.contains(&input) {
            self.inputs.push(input);
        }
        self
    }

    /// Validates the stage specification on its own.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or output key is blank, or if the stage
    /// reads its own output field.
    pub fn validate(&self) -> Result<(), PipelineValidationError> {
        if self.name.trim().is_empty() {
            return Err(PipelineValidationError::new("Stage name cannot be empty"));
        }
        if self.output_key.trim().is_empty() {
            return Err(PipelineValidationError::new(format!(
                "Stage '{}' has an empty output field",
                self.name
            ))
            .with_stages(vec![self.name.clone()]));
        }
        if self.inputs.contains(&self.output_key) {
            return Err(PipelineValidationError::new(format!(
                "Stage '{}' cannot read its own output field '{}'",
                self.name, self.output_key
            ))
            .with_stages(vec![self.name.clone()])
            .with_error_info(
                ContractErrorInfo::new(
                    "CONTRACT-003-MISSING_INPUT",
                    format!("'{}' is both input and output", self.output_key),
                )
                .with_context_entry("stage", &self.name),
            ));
        }
        Ok(())
    }
}
