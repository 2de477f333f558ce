//! Running the planner and persisting its result.

use super::{
    build_planner_pipeline, PlannerSearch, APP_NAME, PLANNER_FIELDS, PLAN_FILENAME, SESSION_ID,
    STATE_TASK, USER_ID,
};
use crate::context::{Blackboard, InMemorySessionStore, RunIdentity, SessionKey, SessionStore, NOT_SET};
use crate::errors::PipelineValidationError;
use crate::events::EventSink;
use crate::pipeline::{PipelineRun, SequentialPipeline};
use crate::providers::LlmProvider;
use crate::tools::{save_to_file, OutputDir};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// The result of planning one task.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    /// The run report.
    pub run: PipelineRun,
}

impl PlanOutcome {
    /// The markdown plan, or the partial plan when the last stage failed.
    #[must_use]
    pub fn description(&self) -> &str {
        self.run.final_text()
    }

    /// Returns true if the partial template was used.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.run.final_output.is_fallback()
    }

    /// Per-field set/unset status, in pipeline order.
    #[must_use]
    pub fn field_status(&self) -> Vec<(&'static str, bool)> {
        PLANNER_FIELDS
            .iter()
            .map(|(key, label)| (*label, self.run.board.contains(key)))
            .collect()
    }

    /// Human-readable `Label: Set` / `Label: Not set` lines.
    #[must_use]
    pub fn status_report(&self) -> String {
        self.field_status()
            .into_iter()
            .map(|(label, set)| format!("{label}: {}", if set { "Set" } else { NOT_SET }))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Plans agent systems and keeps the last blackboard per session.
pub struct AgentsPlanner {
    pipeline: SequentialPipeline,
    store: Arc<dyn SessionStore>,
    session: SessionKey,
}

impl fmt::Debug for AgentsPlanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentsPlanner")
            .field("pipeline", &self.pipeline.name())
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl AgentsPlanner {
    /// Creates a planner with the default session and an in-memory store.
    ///
    /// # Errors
    ///
    /// Returns an error if the pipeline wiring is invalid.
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        search: Option<PlannerSearch>,
    ) -> Result<Self, PipelineValidationError> {
        Self::with_event_sink(provider, search, None)
    }

    /// Creates a planner that publishes pipeline events to `sink`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pipeline wiring is invalid.
    pub fn with_event_sink(
        provider: Arc<dyn LlmProvider>,
        search: Option<PlannerSearch>,
        sink: Option<Arc<dyn EventSink>>,
    ) -> Result<Self, PipelineValidationError> {
        Ok(Self {
            pipeline: build_planner_pipeline(provider, search, sink)?,
            store: Arc::new(InMemorySessionStore::new()),
            session: SessionKey::new(APP_NAME, USER_ID, SESSION_ID),
        })
    }

    /// Uses a different session store.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = store;
        self
    }

    /// Uses a different session key.
    #[must_use]
    pub fn with_session(mut self, session: SessionKey) -> Self {
        self.session = session;
        self
    }

    /// Returns the session key.
    #[must_use]
    pub fn session(&self) -> &SessionKey {
        &self.session
    }

    /// Returns the blackboard stored for the session after the last run.
    #[must_use]
    pub fn last_board(&self) -> Option<Blackboard> {
        self.store.get(&self.session)
    }

    /// Plans a multi-agent system for `task`. Never fails.
    pub async fn plan_agent_system(&self, task: &str) -> PlanOutcome {
        let task = task.trim();
        let preview: String = task.chars().take(50).collect();
        info!(task = %preview, session = %self.session, "Planning agent system");

        let board = Blackboard::new().with_field(STATE_TASK, task);
        let run_id = RunIdentity::new().with_session(self.session.clone());
        let run = self.pipeline.run_with_identity(board, run_id).await;

        self.store.set(self.session.clone(), run.board.clone());

        let outcome = PlanOutcome { run };
        if outcome.is_partial() {
            warn!(failed = ?outcome.run.failed_stages(), "Final description missing, returning partial plan");
        }
        outcome
    }
}

/// Saves the plan to `agent_system_plan.md`, logging rather than failing.
pub fn save_plan(dir: &OutputDir, description: &str) -> String {
    save_to_file(dir, PLAN_FILENAME, description)
}
