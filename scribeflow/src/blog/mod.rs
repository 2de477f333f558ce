//! Blog series generator.
//!
//! Planning asks the model for a roadmap, which is saved as markdown; writing
//! then produces one post per roadmap entry, strictly in order. A saved
//! roadmap can be loaded to skip planning.

mod manager;
mod models;
mod prompts;
mod stages;

pub use manager::BlogManager;
pub use models::{BlogPost, BlogRequest, BlogRun};
pub use stages::{PlanRoadmapStage, WritePostsStage};

/// Series topic.
pub const STATE_TOPIC: &str = "topic";
/// Series goal.
pub const STATE_GOAL: &str = "goal";
/// The roadmap, as JSON.
pub const STATE_ROADMAP: &str = "roadmap";
/// Written posts, as a JSON array.
pub const STATE_POSTS: &str = "posts";

/// Topic used when none is given.
pub const DEFAULT_TOPIC: &str = "Python Design Patterns for Machine Learning";

/// Goal used when none is given.
pub const DEFAULT_GOAL: &str = "Create a comprehensive series of technical blog posts giving an \
overview, with examples, of the most common design patterns used in machine learning. Each post \
should explain a specific pattern with real-world examples, code snippets, and diagrams. The \
content should be suitable for intermediate Python ML Engineers looking to improve their skills.";

/// Log file written by the generator, relative to the output directory.
pub const LOG_FILENAME: &str = "blog_generation.log";
