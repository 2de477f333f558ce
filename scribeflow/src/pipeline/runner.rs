//! Sequential pipeline execution over a blackboard.

use super::{FallbackDocument, StageSpec};
use crate::context::{Blackboard, RunIdentity, StageContext};
use crate::core::StageStatus;
use crate::events::{
    EventSink, PIPELINE_COMPLETED, STAGE_COMPLETED, STAGE_FAILED, STAGE_OUTPUT_MISSING,
    STAGE_STARTED,
};
use crate::observability::SpanTimer;
use crate::stages::StageResult;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The value a run hands back to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum FinalOutput {
    /// The final field was written by its stage.
    Produced(String),
    /// The final field was absent; this is the rendered fallback document.
    Fallback(String),
}

impl FinalOutput {
    /// Returns the text.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Produced(text) | Self::Fallback(text) => text,
        }
    }

    /// Consumes the output and returns the text.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Produced(text) | Self::Fallback(text) => text,
        }
    }

    /// Returns true if the fallback document was used.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    /// The run identity.
    pub run_id: RunIdentity,
    /// The blackboard after the last stage.
    pub board: Blackboard,
    /// The final output.
    pub final_output: FinalOutput,
    /// One record per stage, in execution order.
    pub stages: Vec<StageResult>,
    /// Total duration in milliseconds.
    pub duration_ms: f64,
}

impl PipelineRun {
    /// Returns the final output text.
    #[must_use]
    pub fn final_text(&self) -> &str {
        self.final_output.text()
    }

    /// Returns true if any stage failed or left its output unwritten.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.final_output.is_fallback() || self.stages.iter().any(|s| !s.is_complete())
    }

    /// Returns the names of stages that reported a failure.
    #[must_use]
    pub fn failed_stages(&self) -> Vec<&str> {
        self.stages
            .iter()
            .filter(|s| s.status == StageStatus::Fail)
            .map(|s| s.name.as_str())
            .collect()
    }

    /// Returns the record for a stage.
    #[must_use]
    pub fn stage(&self, name: &str) -> Option<&StageResult> {
        self.stages.iter().find(|s| s.name == name)
    }
}

/// A validated, ordered list of stages sharing one blackboard.
///
/// Built by [`PipelineBuilder`](super::PipelineBuilder). A run never aborts:
/// failed stages and missing outputs are logged, reported as events and
/// recorded, and later stages still execute.
#[derive(Debug, Clone)]
pub struct SequentialPipeline {
    name: String,
    seeds: Vec<String>,
    stages: Vec<StageSpec>,
    final_field: String,
    fallback: FallbackDocument,
    event_sink: Arc<dyn EventSink>,
}

impl SequentialPipeline {
    pub(super) fn new(
        name: String,
        seeds: Vec<String>,
        stages: Vec<StageSpec>,
        final_field: String,
        fallback: FallbackDocument,
        event_sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            name,
            seeds,
            stages,
            final_field,
            fallback,
            event_sink,
        }
    }

    /// Returns the pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the stage names in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name.as_str()).collect()
    }

    /// Returns the fields the caller is expected to seed.
    #[must_use]
    pub fn seeds(&self) -> &[String] {
        &self.seeds
    }

    /// Returns the designated final field.
    #[must_use]
    pub fn final_field(&self) -> &str {
        &self.final_field
    }

    /// Returns the fallback template.
    #[must_use]
    pub fn fallback(&self) -> &FallbackDocument {
        &self.fallback
    }

    /// Runs the pipeline on a seeded blackboard.
    pub async fn run(&self, board: Blackboard) -> PipelineRun {
        self.run_with_identity(board, RunIdentity::new()).await
    }

    /// Runs the pipeline with an explicit run identity.
    pub async fn run_with_identity(&self, mut board: Blackboard, run_id: RunIdentity) -> PipelineRun {
        let timer = SpanTimer::start(&self.name);
        let run_label = run_id.pipeline_run_id.to_string();

        for seed in &self.seeds {
            if !board.contains(seed) {
                warn!(pipeline = %self.name, field = %seed, "Seed field not provided");
            }
        }

        info!(
            pipeline = %self.name,
            pipeline_run_id = %run_label,
            stages = self.stages.len(),
            "Pipeline started"
        );

        let mut records = Vec::with_capacity(self.stages.len());

        for spec in &self.stages {
            let record = self.run_stage(spec, &mut board, &run_id).await;
            records.push(record);
        }

        let final_output = match board.get_text(&self.final_field) {
            Some(text) => FinalOutput::Produced(text),
            None => {
                warn!(
                    pipeline = %self.name,
                    field = %self.final_field,
                    "Final field not produced, rendering fallback document"
                );
                FinalOutput::Fallback(self.fallback.render(&board))
            }
        };

        let duration_ms = timer.finish();

        self.event_sink.try_emit(
            PIPELINE_COMPLETED,
            Some(serde_json::json!({
                "pipeline": self.name,
                "pipeline_run_id": run_label,
                "fallback": final_output.is_fallback(),
                "duration_ms": duration_ms,
            })),
        );

        info!(
            pipeline = %self.name,
            duration_ms = duration_ms,
            fallback = final_output.is_fallback(),
            "Pipeline completed"
        );

        PipelineRun {
            run_id,
            board,
            final_output,
            stages: records,
            duration_ms,
        }
    }

    async fn run_stage(
        &self,
        spec: &StageSpec,
        board: &mut Blackboard,
        run_id: &RunIdentity,
    ) -> StageResult {
        let started_at = Utc::now();
        let timer = SpanTimer::start(&spec.name);

        let (output, missing) = {
            let ctx = StageContext::new(
                &spec.name,
                &spec.inputs,
                board,
                run_id,
                Arc::clone(&self.event_sink),
            );

            let missing: Vec<String> = ctx.missing_inputs().into_iter().map(String::from).collect();
            if !missing.is_empty() {
                warn!(
                    stage = %spec.name,
                    missing = ?missing,
                    "Running stage with missing inputs"
                );
            }

            ctx.try_emit_event(
                STAGE_STARTED,
                Some(serde_json::json!({ "output_key": spec.output_key })),
            );
            debug!(stage = %spec.name, "Stage started");

            (spec.runner.execute(&ctx).await, missing)
        };

        let stage_duration_ms = timer.finish();
        let record = StageResult::from_output(
            &spec.name,
            &spec.output_key,
            &output,
            missing,
            started_at,
        );

        let payload = |extra: serde_json::Value| {
            let mut data = serde_json::json!({
                "pipeline_run_id": run_id.pipeline_run_id.to_string(),
                "stage": spec.name,
                "output_key": spec.output_key,
                "duration_ms": stage_duration_ms,
            });
            if let (Some(map), serde_json::Value::Object(extra)) = (data.as_object_mut(), extra) {
                map.extend(extra);
            }
            Some(data)
        };

        if output.status == StageStatus::Fail {
            let error = output.error.clone().unwrap_or_default();
            warn!(stage = %spec.name, error = %error, "Stage failed");
            self.event_sink
                .try_emit(STAGE_FAILED, payload(serde_json::json!({ "error": error })));
        }

        match output.value {
            Some(value) => {
                if board.set(&spec.output_key, value).is_some() {
                    debug!(stage = %spec.name, field = %spec.output_key, "Overwrote field");
                }
                self.event_sink
                    .try_emit(STAGE_COMPLETED, payload(serde_json::json!({})));
                info!(
                    stage = %spec.name,
                    field = %spec.output_key,
                    duration_ms = stage_duration_ms,
                    "Stage completed"
                );
            }
            None => {
                warn!(
                    stage = %spec.name,
                    field = %spec.output_key,
                    status = %output.status,
                    "Stage did not produce its output field"
                );
                self.event_sink.try_emit(
                    STAGE_OUTPUT_MISSING,
                    payload(serde_json::json!({ "status": output.status })),
                );
            }
        }

        record
    }
}
