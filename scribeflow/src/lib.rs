//! # Scribeflow
//!
//! Sequential LLM stage pipelines over a shared blackboard.
//!
//! Scribeflow runs an ordered list of stages. Each stage reads named fields
//! from a blackboard, asks a model for one result and writes it back under a
//! single output key. Two applications are built on top:
//!
//! - **Agents planner**: turns a task description into a multi-agent system plan
//! - **Blog generator**: plans a series roadmap and writes one post per entry
//!
//! Runs are best-effort. A failing stage is recorded and the run continues;
//! when the final field is missing a fallback document is rendered from
//! whatever intermediate fields exist.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use scribeflow::prelude::*;
//!
//! let pipeline = PipelineBuilder::new("summary")
//!     .seed("topic")
//!     .stage("Outline", outline_stage, &["topic"], "outline")?
//!     .stage("Draft", draft_stage, &["topic", "outline"], "draft")?
//!     .build()?;
//!
//! let run = pipeline.run(Blackboard::new().with_field("topic", "Rust")).await;
//! println!("{}", run.final_text());
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod agents;
pub mod blog;
pub mod config;
pub mod context;
pub mod core;
pub mod errors;
pub mod events;
pub mod observability;
pub mod pipeline;
pub mod planner;
pub mod providers;
pub mod roadmap;
pub mod stages;
pub mod testing;
pub mod tools;
pub mod websearch;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::agents::{render_prompt, LlmStage};
    pub use crate::blog::{BlogManager, BlogPost, BlogRequest, BlogRun};
    pub use crate::config::AppConfig;
    pub use crate::context::{Blackboard, RunIdentity, SessionKey, StageContext, NOT_SET};
    pub use crate::core::{StageOutput, StageStatus};
    pub use crate::errors::{
        ContractErrorInfo, PipelineValidationError, ProviderError, ScribeflowError, SearchError,
    };
    pub use crate::events::{EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::pipeline::{
        FallbackDocument, FinalOutput, PipelineBuilder, PipelineRun, SequentialPipeline,
        StageSpec,
    };
    pub use crate::planner::{AgentsPlanner, PlanOutcome};
    pub use crate::providers::{CompletionRequest, LlmProvider, LlmResponse};
    pub use crate::roadmap::{Roadmap, RoadmapEntry};
    pub use crate::stages::{FnStage, Stage};
    pub use crate::tools::OutputDir;
    pub use crate::websearch::{SearchHit, WebSearch};
}
