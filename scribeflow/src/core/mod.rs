//! Core domain model types for scribeflow.
//!
//! This module contains the fundamental types used throughout the crate:
//! - Stage status enum
//! - Stage output type with factory methods

mod output;
mod status;

pub use output::StageOutput;
pub use status::StageStatus;
