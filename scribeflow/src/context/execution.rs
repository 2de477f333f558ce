//! Read-only execution context handed to each stage.

use super::{Blackboard, RunIdentity, NOT_SET};
use crate::events::EventSink;
use std::sync::Arc;

/// The context for a single stage execution.
///
/// Borrows the blackboard immutably; the stage returns its value and the
/// runner performs the write, so a stage can never touch any field other
/// than its own output.
pub struct StageContext<'a> {
    stage_name: &'a str,
    declared_inputs: &'a [String],
    board: &'a Blackboard,
    run_id: &'a RunIdentity,
    event_sink: Arc<dyn EventSink>,
}

impl<'a> StageContext<'a> {
    /// Creates a new stage context.
    #[must_use]
    pub fn new(
        stage_name: &'a str,
        declared_inputs: &'a [String],
        board: &'a Blackboard,
        run_id: &'a RunIdentity,
        event_sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            stage_name,
            declared_inputs,
            board,
            run_id,
            event_sink,
        }
    }

    /// Returns the stage name.
    #[must_use]
    pub fn stage_name(&self) -> &str {
        self.stage_name
    }

    /// Returns the declared input fields.
    #[must_use]
    pub fn declared_inputs(&self) -> &[String] {
        self.declared_inputs
    }

    /// Returns the run identity.
    #[must_use]
    pub fn run_id(&self) -> &RunIdentity {
        self.run_id
    }

    /// Returns the whole blackboard.
    #[must_use]
    pub fn board(&self) -> &Blackboard {
        self.board
    }

    /// Reads an input field.
    #[must_use]
    pub fn input(&self, key: &str) -> Option<&serde_json::Value> {
        if !self.declared_inputs.iter().any(|k| k == key) {
            tracing::debug!(stage = %self.stage_name, field = %key, "Reading undeclared field");
        }
        self.board.get(key)
    }

    /// Reads an input field as text.
    #[must_use]
    pub fn input_text(&self, key: &str) -> Option<String> {
        self.input(key).map(|_| self.board.text_or(key, NOT_SET))
    }

    /// Reads an input field as text, rendering [`NOT_SET`] when absent.
    #[must_use]
    pub fn input_or_placeholder(&self, key: &str) -> String {
        self.input_text(key).unwrap_or_else(|| NOT_SET.to_string())
    }

    /// Deserializes a structured input field.
    #[must_use]
    pub fn input_as<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.input(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Returns the declared inputs that are not on the blackboard.
    #[must_use]
    pub fn missing_inputs(&self) -> Vec<&str> {
        self.declared_inputs
            .iter()
            .filter(|k| !self.board.contains(k))
            .map(String::as_str)
            .collect()
    }

    /// Emits an event tagged with the stage and run.
    pub fn try_emit_event(&self, event_type: &str, data: Option<serde_json::Value>) {
        let mut enriched = data.unwrap_or_else(|| serde_json::json!({}));

        if let serde_json::Value::Object(ref mut map) = enriched {
            map.insert(
                "pipeline_run_id".to_string(),
                serde_json::json!(self.run_id.pipeline_run_id.to_string()),
            );
            map.insert("stage".to_string(), serde_json::json!(self.stage_name));
        }

        self.event_sink.try_emit(event_type, Some(enriched));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{CollectingEventSink, NoOpEventSink};

    #[test]
    fn test_inputs_and_placeholders() {
        let board = Blackboard::new().with_field("task", "X");
        let inputs = vec!["task".to_string(), "subtasks".to_string()];
        let run_id = RunIdentity::new();
        let ctx = StageContext::new("designer", &inputs, &board, &run_id, Arc::new(NoOpEventSink));

        assert_eq!(ctx.stage_name(), "designer");
        assert_eq!(ctx.input_text("task").as_deref(), Some("X"));
        assert_eq!(ctx.input_or_placeholder("subtasks"), NOT_SET);
        assert_eq!(ctx.missing_inputs(), vec!["subtasks"]);
    }

    #[test]
    fn test_structured_input() {
        let board = Blackboard::new().with_field("sizes", serde_json::json!([1, 2, 3]));
        let inputs = vec!["sizes".to_string()];
        let run_id = RunIdentity::new();
        let ctx = StageContext::new("s", &inputs, &board, &run_id, Arc::new(NoOpEventSink));

        assert_eq!(ctx.input_as::<Vec<u32>>("sizes"), Some(vec![1, 2, 3]));
        assert_eq!(ctx.input_as::<String>("sizes"), None);
    }

    #[test]
    fn test_emit_event_is_enriched() {
        let board = Blackboard::new();
        let inputs = Vec::new();
        let run_id = RunIdentity::new();
        let sink = Arc::new(CollectingEventSink::new());
        let ctx = StageContext::new("s", &inputs, &board, &run_id, sink.clone());

        ctx.try_emit_event("stage.note", Some(serde_json::json!({"k": 1})));

        let events = sink.events();
        assert_eq!(events.len(), 1);
        let data = events[0].1.as_ref().unwrap();
        assert_eq!(data["stage"], "s");
        assert_eq!(data["k"], 1);
        assert_eq!(data["pipeline_run_id"], run_id.pipeline_run_id.to_string());
    }
}
