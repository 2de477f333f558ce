//! Test assertions for stage outputs and pipeline runs.

use crate::core::{StageOutput, StageStatus};
use crate::pipeline::PipelineRun;

/// Asserts that the output indicates success.
pub fn assert_output_succeeded(output: &StageOutput) {
    assert!(
        output.is_success(),
        "Expected success, got status: {:?}",
        output.status
    );
}

/// Asserts that the output indicates failure.
pub fn assert_output_failed(output: &StageOutput) {
    assert!(
        output.is_failure(),
        "Expected failure, got status: {:?}",
        output.status
    );
}

/// Asserts that the output has the expected status.
pub fn assert_output_status(output: &StageOutput, expected: StageStatus) {
    assert_eq!(
        output.status, expected,
        "Expected status {:?}, got {:?}",
        expected, output.status
    );
}

/// Asserts that the output carries the given text.
pub fn assert_output_text(output: &StageOutput, expected: &str) {
    assert_eq!(
        output.value.as_ref().and_then(|v| v.as_str()),
        Some(expected),
        "Expected text output {:?}, got {:?}",
        expected,
        output.value
    );
}

/// Asserts that a run wrote a field.
pub fn assert_field_set(run: &PipelineRun, key: &str) {
    assert!(
        run.board.contains(key),
        "Expected field '{}' to be set. Fields: {:?}",
        key,
        run.board.keys()
    );
}

/// Asserts that a run left a field absent.
pub fn assert_field_absent(run: &PipelineRun, key: &str) {
    assert!(
        !run.board.contains(key),
        "Expected field '{}' to be absent, found {:?}",
        key,
        run.board.get(key)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_assertions() {
        let output = StageOutput::ok_text("plan");
        assert_output_succeeded(&output);
        assert_output_status(&output, StageStatus::Ok);
        assert_output_text(&output, "plan");

        assert_output_failed(&StageOutput::fail("x"));
    }

    #[test]
    #[should_panic(expected = "Expected failure")]
    fn test_failed_assertion_panics() {
        assert_output_failed(&StageOutput::ok_empty());
    }
}
