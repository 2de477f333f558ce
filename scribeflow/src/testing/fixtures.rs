//! Test fixtures for running single stages.

use std::sync::Arc;

use crate::context::{Blackboard, RunIdentity, StageContext};
use crate::core::StageOutput;
use crate::events::{CollectingEventSink, EventSink};
use crate::stages::Stage;

/// Runs one stage against a prepared blackboard, outside any pipeline.
#[derive(Debug)]
pub struct StageHarness {
    board: Blackboard,
    run_id: RunIdentity,
    events: Arc<CollectingEventSink>,
}

impl Default for StageHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl StageHarness {
    /// Creates a harness with an empty blackboard.
    #[must_use]
    pub fn new() -> Self {
        Self::with_board(Blackboard::new())
    }

    /// Creates a harness with a seeded blackboard.
    #[must_use]
    pub fn with_board(board: Blackboard) -> Self {
        Self {
            board,
            run_id: RunIdentity::new(),
            events: Arc::new(CollectingEventSink::new()),
        }
    }

    /// Adds a field to the blackboard.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.board.set(key, value);
        self
    }

    /// Returns the blackboard.
    #[must_use]
    pub fn board(&self) -> &Blackboard {
        &self.board
    }

    /// Returns the events emitted by stages run through this harness.
    #[must_use]
    pub fn events(&self) -> &CollectingEventSink {
        &self.events
    }

    /// Executes the stage with the given declared inputs.
    pub async fn run(&self, stage: &dyn Stage, inputs: &[&str]) -> StageOutput {
        let declared: Vec<String> = inputs.iter().map(|s| (*s).to_string()).collect();
        let sink: Arc<dyn EventSink> = self.events.clone();
        let ctx = StageContext::new(stage.name(), &declared, &self.board, &self.run_id, sink);
        stage.execute(&ctx).await
    }
}
