//! Mock stages for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;

use crate::context::StageContext;
use crate::core::StageOutput;
use crate::stages::Stage;

/// A mock stage that counts calls and returns a configurable output.
#[derive(Debug)]
pub struct MockStage {
    name: String,
    output: Mutex<StageOutput>,
    call_count: Mutex<usize>,
}

impl MockStage {
    /// Creates a mock stage that succeeds without writing anything.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            output: Mutex::new(StageOutput::ok_empty()),
            call_count: Mutex::new(0),
        }
    }

    /// Sets the output to return.
    pub fn set_output(&self, output: StageOutput) {
        *self.output.lock() = output;
    }

    /// Returns the number of times the stage was called.
    #[must_use]
    pub fn call_count(&self) -> usize {
        *self.call_count.lock()
    }
}

#[async_trait]
impl Stage for MockStage {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, _ctx: &StageContext<'_>) -> StageOutput {
        *self.call_count.lock() += 1;
        self.output.lock().clone()
    }
}

/// A stage that always writes the same text.
#[derive(Debug)]
pub struct StaticStage {
    name: String,
    value: String,
}

impl StaticStage {
    /// Creates a new static stage.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[async_trait]
impl Stage for StaticStage {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, _ctx: &StageContext<'_>) -> StageOutput {
        StageOutput::ok_text(&self.value)
    }
}

/// A stage that always fails.
#[derive(Debug)]
pub struct FailingStage {
    name: String,
    error: String,
}

impl FailingStage {
    /// Creates a new failing stage.
    #[must_use]
    pub fn new(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            error: error.into(),
        }
    }
}

#[async_trait]
impl Stage for FailingStage {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, _ctx: &StageContext<'_>) -> StageOutput {
        StageOutput::fail(&self.error)
    }
}

/// A recorded execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedExecution {
    /// Stage name from context.
    pub stage_name: String,
    /// Declared inputs as seen at execution time; `None` when absent.
    pub inputs: BTreeMap<String, Option<String>>,
}

/// A stage that records the inputs it observed and then writes a fixed value.
#[derive(Debug)]
pub struct RecordingStage {
    name: String,
    value: Option<String>,
    executions: Mutex<Vec<RecordedExecution>>,
}

impl RecordingStage {
    /// Creates a recording stage that writes `value`.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            executions: Mutex::new(Vec::new()),
        }
    }

    /// Creates a recording stage that writes nothing.
    #[must_use]
    pub fn silent(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            executions: Mutex::new(Vec::new()),
        }
    }

    /// Returns all recorded executions.
    #[must_use]
    pub fn executions(&self) -> Vec<RecordedExecution> {
        self.executions.lock().clone()
    }

    /// Returns the number of executions.
    #[must_use]
    pub fn execution_count(&self) -> usize {
        self.executions.lock().len()
    }
}

#[async_trait]
impl Stage for RecordingStage {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, ctx: &StageContext<'_>) -> StageOutput {
        let inputs = ctx
            .declared_inputs()
            .iter()
            .map(|key| (key.clone(), ctx.input_text(key)))
            .collect();

        self.executions.lock().push(RecordedExecution {
            stage_name: ctx.stage_name().to_string(),
            inputs,
        });

        match &self.value {
            Some(value) => StageOutput::ok_text(value),
            None => StageOutput::ok_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Blackboard;
    use crate::testing::StageHarness;

    #[tokio::test]
    async fn test_mock_stage() {
        let stage = MockStage::new("test");
        let harness = StageHarness::new();

        let output = harness.run(&stage, &[]).await;
        assert!(output.is_success());
        assert!(!output.has_value());
        assert_eq!(stage.call_count(), 1);

        stage.set_output(StageOutput::fail("error"));
        let output = harness.run(&stage, &[]).await;
        assert!(output.is_failure());
        assert_eq!(stage.call_count(), 2);
    }

    #[tokio::test]
    async fn test_static_and_failing_stages() {
        let harness = StageHarness::new();

        let output = harness.run(&StaticStage::new("s", "hello"), &[]).await;
        assert_eq!(output.value, Some(serde_json::json!("hello")));

        let output = harness.run(&FailingStage::new("f", "boom"), &[]).await;
        assert_eq!(output.error.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn test_recording_stage() {
        let stage = RecordingStage::new("record", "done");
        let harness = StageHarness::with_board(Blackboard::new().with_field("task", "X"));

        harness.run(&stage, &["task", "subtasks"]).await;

        let executions = stage.executions();
        assert_eq!(executions.len(), 1);
        assert_eq!(executions[0].stage_name, "record");
        assert_eq!(executions[0].inputs["task"].as_deref(), Some("X"));
        assert_eq!(executions[0].inputs["subtasks"], None);
    }
}
