//! Event sinks for pipeline observability.
//!
//! The runner publishes lifecycle events (`stage.started`, `stage.completed`,
//! `stage.failed`, `stage.output_missing`, `pipeline.completed`) through an
//! [`EventSink`]. The default sink forwards them to `tracing`.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

/// Event emitted before a stage runs.
pub const STAGE_STARTED: &str = "stage.started";
/// Event emitted when a stage wrote its output field.
pub const STAGE_COMPLETED: &str = "stage.completed";
/// Event emitted when a stage reported a failure.
pub const STAGE_FAILED: &str = "stage.failed";
/// Event emitted when a stage finished without writing its output field.
pub const STAGE_OUTPUT_MISSING: &str = "stage.output_missing";
/// Event emitted after the last stage.
pub const PIPELINE_COMPLETED: &str = "pipeline.completed";
