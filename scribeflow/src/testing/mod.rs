//! Testing utilities for scribeflow pipelines.
//!
//! This module provides:
//! - Mock stages
//! - A harness for running a single stage
//! - Assertions for stage outputs and pipeline runs

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{
    assert_field_absent, assert_field_set, assert_output_failed, assert_output_status,
    assert_output_succeeded, assert_output_text,
};
pub use fixtures::StageHarness;
pub use mocks::{FailingStage, MockStage, RecordedExecution, RecordingStage, StaticStage};
