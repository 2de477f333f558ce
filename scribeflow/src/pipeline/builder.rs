//! Pipeline builder with validation.

use super::{FallbackDocument, SequentialPipeline, StageSpec};
use crate::errors::{ContractErrorInfo, ContractSuggestions, PipelineValidationError};
use crate::events::{EventSink, LoggingEventSink};
use crate::stages::Stage;
use std::collections::HashSet;
use std::sync::Arc;

/// Builder for creating validated sequential pipelines.
///
/// Stages run in the order they are added. Every declared input must either
/// be seeded by the caller or written by an earlier stage; this is checked as
/// each stage is added.
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    /// The pipeline name.
    name: String,
    /// Fields the caller seeds before the run.
    seeds: Vec<String>,
    /// The stage specifications, in execution order.
    stages: Vec<StageSpec>,
    /// The designated final field.
    final_field: Option<String>,
    /// Template used when the final field is absent.
    fallback: Option<FallbackDocument>,
    /// Where lifecycle events go.
    event_sink: Option<Arc<dyn EventSink>>,
}

impl PipelineBuilder {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            seeds: Vec::new(),
            stages: Vec::new(),
            final_field: None,
            fallback: None,
            event_sink: None,
        }
    }

    /// Declares a field the caller seeds before running.
    #[must_use]
    pub fn seed(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        if !self.seeds.contains(&key) {
            self.seeds.push(key);
        }
        self
    }

    /// Declares several seeded fields.
    #[must_use]
    pub fn seeds<'a>(self, keys: impl IntoIterator<Item = &'a str>) -> Self {
        keys.into_iter().fold(self, |builder, key| builder.seed(key))
    }

    /// Adds a stage to the pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken or an input has no producer.
    pub fn stage(
        mut self,
        name: impl Into<String>,
        runner: Arc<dyn Stage>,
        inputs: &[&str],
        output_key: impl Into<String>,
    ) -> Result<Self, PipelineValidationError> {
        let spec = StageSpec::new(name, runner, output_key).with_inputs(inputs.iter().copied());
        self.add_stage_spec(spec)?;
        Ok(self)
    }

    /// Adds a stage with a specification.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn add_stage_spec(&mut self, spec: StageSpec) -> Result<(), PipelineValidationError> {
        spec.validate()?;

        if self.stages.iter().any(|s| s.name == spec.name) {
            return Err(PipelineValidationError::new(format!(
                "Stage '{}' is already defined in pipeline '{}'",
                spec.name, self.name
            ))
            .with_stages(vec![spec.name.clone()])
            .with_error_info(contract_info(
                "CONTRACT-005-DUPLICATE_STAGE",
                format!("Duplicate stage name '{}'", spec.name),
            )));
        }

        for input in &spec.inputs {
            if !self.is_available(input) {
                return Err(PipelineValidationError::new(format!(
                    "Stage '{}' reads '{}', which is neither seeded nor written by an earlier stage",
                    spec.name, input
                ))
                .with_stages(vec![spec.name.clone()])
                .with_error_info(
                    contract_info(
                        "CONTRACT-003-MISSING_INPUT",
                        format!("No producer for field '{input}'"),
                    )
                    .with_context_entry("stage", &spec.name)
                    .with_context_entry("field", input),
                ));
            }
        }

        self.stages.push(spec);
        Ok(())
    }

    /// Appends the stages of another builder as a nested group.
    ///
    /// The group's seeds are merged into this builder; its stages are
    /// re-validated against the fields available at this point.
    ///
    /// # Errors
    ///
    /// Returns an error if any appended stage fails validation.
    pub fn extend(mut self, group: Self) -> Result<Self, PipelineValidationError> {
        for seed in group.seeds {
            if !self.seeds.contains(&seed) {
                self.seeds.push(seed);
            }
        }
        for spec in group.stages {
            self.add_stage_spec(spec)?;
        }
        Ok(self)
    }

    /// Designates the field whose value is the pipeline's result.
    ///
    /// Defaults to the output field of the last stage.
    #[must_use]
    pub fn final_field(mut self, key: impl Into<String>) -> Self {
        self.final_field = Some(key.into());
        self
    }

    /// Sets the template rendered when the final field is absent.
    #[must_use]
    pub fn fallback(mut self, document: FallbackDocument) -> Self {
        self.fallback = Some(document);
        self
    }

    /// Sets the event sink.
    #[must_use]
    pub fn event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = Some(sink);
        self
    }

    /// Builds the pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the builder has no stages or if the final field is
    /// not written by any stage.
    pub fn build(self) -> Result<SequentialPipeline, PipelineValidationError> {
        let Some(last) = self.stages.last() else {
            return Err(PipelineValidationError::new(format!(
                "Pipeline '{}' has no stages",
                self.name
            ))
            .with_error_info(contract_info(
                "CONTRACT-001-EMPTY",
                "Cannot build an empty pipeline",
            )));
        };

        let final_field = self
            .final_field
            .clone()
            .unwrap_or_else(|| last.output_key.clone());

        if !self.stages.iter().any(|s| s.output_key == final_field) {
            return Err(PipelineValidationError::new(format!(
                "No stage in pipeline '{}' writes the final field '{}'",
                self.name, final_field
            ))
            .with_error_info(
                contract_info(
                    "CONTRACT-002-FINAL_FIELD",
                    format!("Final field '{final_field}' has no producer"),
                )
                .with_context_entry("field", &final_field),
            ));
        }

        let fallback = self.fallback.unwrap_or_else(|| {
            let partial_keys: Vec<&str> = self
                .stages
                .iter()
                .map(|s| s.output_key.as_str())
                .filter(|k| *k != final_field)
                .collect();
            FallbackDocument::for_fields(format!("# {} (Partial)", self.name), partial_keys)
        });

        let event_sink = self
            .event_sink
            .unwrap_or_else(|| Arc::new(LoggingEventSink));

        Ok(SequentialPipeline::new(
            self.name,
            self.seeds,
            self.stages,
            final_field,
            fallback,
            event_sink,
        ))
    }

    /// Returns the pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Returns the fields available to the next stage added.
    #[must_use]
    pub fn available_fields(&self) -> HashSet<&str> {
        self.seeds
            .iter()
            .map(String::as_str)
            .chain(self.stages.iter().map(|s| s.output_key.as_str()))
            .collect()
    }

    fn is_available(&self, key: &str) -> bool {
        self.seeds.iter().any(|s| s == key) || self.stages.iter().any(|s| s.output_key == key)
    }
}

fn contract_info(code: &str, summary: impl Into<String>) -> ContractErrorInfo {
    let info = ContractErrorInfo::new(code, summary);
    match ContractSuggestions::get(code) {
        Some(hint) => info.with_fix_hint(hint),
        None => info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaticStage;

    fn stage(name: &str) -> Arc<dyn Stage> {
        Arc::new(StaticStage::new(name, "value"))
    }

    #[test]
    fn test_builder_orders_stages() {
        let pipeline = PipelineBuilder::new("plan")
            .seed("task")
            .stage("a", stage("a"), &["task"], "subtasks")
            .unwrap()
            .stage("b", stage("b"), &["task", "subtasks"], "final")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(pipeline.stage_names(), vec!["a", "b"]);
        assert_eq!(pipeline.final_field(), "final");
    }

    #[test]
    fn test_empty_pipeline_rejected() {
        let err = PipelineBuilder::new("empty").build().unwrap_err();
        assert_eq!(err.code(), Some("CONTRACT-001-EMPTY"));
        assert!(err.error_info.unwrap().fix_hint.is_some());
    }

    #[test]
    fn test_unseeded_input_rejected() {
        let err = PipelineBuilder::new("p")
            .stage("a", stage("a"), &["task"], "subtasks")
            .unwrap_err();

        assert_eq!(err.code(), Some("CONTRACT-003-MISSING_INPUT"));
        assert_eq!(err.stages, vec!["a"]);
    }

    #[test]
    fn test_input_from_later_stage_rejected() {
        let builder = PipelineBuilder::new("p").seed("task");
        let err = builder
            .stage("b", stage("b"), &["subtasks"], "agents")
            .unwrap_err();

        assert_eq!(err.code(), Some("CONTRACT-003-MISSING_INPUT"));
    }

    #[test]
    fn test_duplicate_stage_rejected() {
        let err = PipelineBuilder::new("p")
            .stage("a", stage("a"), &[], "x")
            .unwrap()
            .stage("a", stage("a"), &[], "y")
            .unwrap_err();

        assert_eq!(err.code(), Some("CONTRACT-005-DUPLICATE_STAGE"));
    }

    #[test]
    fn test_final_field_must_have_producer() {
        let err = PipelineBuilder::new("p")
            .stage("a", stage("a"), &[], "x")
            .unwrap()
            .final_field("report")
            .build()
            .unwrap_err();

        assert_eq!(err.code(), Some("CONTRACT-002-FINAL_FIELD"));
    }

    #[test]
    fn test_extend_with_group() {
        let group = PipelineBuilder::new("group")
            .seed("task")
            .stage("analyze", stage("analyze"), &["task"], "subtasks")
            .unwrap();

        let builder = PipelineBuilder::new("outer")
            .extend(group)
            .unwrap()
            .stage("final", stage("final"), &["task", "subtasks"], "report")
            .unwrap();

        assert_eq!(builder.stage_count(), 2);
        assert!(builder.available_fields().contains("report"));
    }
}
