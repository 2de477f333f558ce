//! Planner pipeline assembly.

use super::prompts::{
    AGENT_DESIGNER_INSTRUCTION, AGENT_DESIGNER_TEMPLATE, FINAL_DESCRIPTION_INSTRUCTION,
    FINAL_DESCRIPTION_TEMPLATE, TASK_ANALYZER_INSTRUCTION, TASK_ANALYZER_TEMPLATE,
    WORKFLOW_DESIGNER_INSTRUCTION, WORKFLOW_DESIGNER_TEMPLATE,
};
use super::{
    STATE_AGENT_DESCRIPTIONS, STATE_FINAL_DESCRIPTION, STATE_SUBTASKS, STATE_TASK,
    STATE_WORKFLOW_PATTERN,
};
use crate::agents::LlmStage;
use crate::errors::PipelineValidationError;
use crate::events::EventSink;
use crate::pipeline::{FallbackDocument, PipelineBuilder, SequentialPipeline};
use crate::providers::LlmProvider;
use crate::websearch::WebSearch;
use std::sync::Arc;

/// Search backend handed to every planner stage.
#[derive(Clone)]
pub struct PlannerSearch {
    /// The backend.
    pub search: Arc<dyn WebSearch>,
    /// Hits per query.
    pub max_results: usize,
}

/// The template rendered when `final_description` is missing.
#[must_use]
pub fn plan_fallback_document() -> FallbackDocument {
    FallbackDocument::new("# Agent System Plan (Partial)")
        .with_intro("The final description was not produced. Intermediate planning results follow.")
        .section("Subtasks", STATE_SUBTASKS)
        .section("Agent Descriptions", STATE_AGENT_DESCRIPTIONS)
        .section("Workflow Pattern", STATE_WORKFLOW_PATTERN)
}

fn llm_stage(
    name: &str,
    provider: &Arc<dyn LlmProvider>,
    search: Option<&PlannerSearch>,
    instruction: &str,
    template: &str,
) -> Arc<LlmStage> {
    let stage = LlmStage::new(name, Arc::clone(provider), template).with_instruction(instruction);
    Arc::new(match search {
        Some(s) => stage.with_research(Arc::clone(&s.search), STATE_TASK, s.max_results),
        None => stage,
    })
}

/// Builds the four-stage planner pipeline.
///
/// # Errors
///
/// Returns an error only if the stage wiring is invalid.
pub fn build_planner_pipeline(
    provider: Arc<dyn LlmProvider>,
    search: Option<PlannerSearch>,
    event_sink: Option<Arc<dyn EventSink>>,
) -> Result<SequentialPipeline, PipelineValidationError> {
    let search = search.as_ref();

    let planning_agents = PipelineBuilder::new("PlanningAgents")
        .seed(STATE_TASK)
        .stage(
            "TaskAnalyzer",
            llm_stage("TaskAnalyzer", &provider, search, TASK_ANALYZER_INSTRUCTION, TASK_ANALYZER_TEMPLATE),
            &[STATE_TASK],
            STATE_SUBTASKS,
        )?
        .stage(
            "AgentDesigner",
            llm_stage("AgentDesigner", &provider, search, AGENT_DESIGNER_INSTRUCTION, AGENT_DESIGNER_TEMPLATE),
            &[STATE_TASK, STATE_SUBTASKS],
            STATE_AGENT_DESCRIPTIONS,
        )?
        .stage(
            "WorkflowDesigner",
            llm_stage(
                "WorkflowDesigner",
                &provider,
                search,
                WORKFLOW_DESIGNER_INSTRUCTION,
                WORKFLOW_DESIGNER_TEMPLATE,
            ),
            &[STATE_TASK, STATE_SUBTASKS, STATE_AGENT_DESCRIPTIONS],
            STATE_WORKFLOW_PATTERN,
        )?;

    let mut builder = PipelineBuilder::new("AgentsPlanner")
        .extend(planning_agents)?
        .stage(
            "FinalDescription",
            llm_stage(
                "FinalDescription",
                &provider,
                search,
                FINAL_DESCRIPTION_INSTRUCTION,
                FINAL_DESCRIPTION_TEMPLATE,
            ),
            &[STATE_TASK, STATE_SUBTASKS, STATE_AGENT_DESCRIPTIONS, STATE_WORKFLOW_PATTERN],
            STATE_FINAL_DESCRIPTION,
        )?
        .final_field(STATE_FINAL_DESCRIPTION)
        .fallback(plan_fallback_document());

    if let Some(sink) = event_sink {
        builder = builder.event_sink(sink);
    }

    builder.build()
}
