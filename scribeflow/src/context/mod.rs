//! Context management for pipeline execution.
//!
//! This module provides:
//! - The blackboard that stages read from and write to
//! - Session keys and a session store for persisting blackboards
//! - The read-only stage context handed to each stage

mod bags;
mod execution;
mod identity;
mod store;

pub use bags::{Blackboard, NOT_SET};
pub use execution::StageContext;
pub use identity::{RunIdentity, SessionKey};
pub use store::{InMemorySessionStore, SessionStore};
