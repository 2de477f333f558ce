//! Pipeline building and execution.
//!
//! This module provides:
//! - Stage specifications
//! - Pipeline builder with validation
//! - The sequential runner over a shared blackboard
//! - Fallback documents for runs that miss their final field

mod builder;
mod fallback;
mod runner;
mod spec;

#[cfg(test)]
mod integration_tests;

pub use builder::PipelineBuilder;
pub use fallback::{FallbackDocument, FallbackSection};
pub use runner::{FinalOutput, PipelineRun, SequentialPipeline};
pub use spec::StageSpec;
