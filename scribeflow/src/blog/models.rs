//! Blog generator inputs and results.

use crate::pipeline::PipelineRun;
use crate::roadmap::Roadmap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One written post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    /// Post title.
    pub title: String,
    /// Markdown body.
    pub content: String,
    /// True when the model did not return the requested JSON and the raw
    /// reply was used as the body, or when the call failed and the body is
    /// empty.
    #[serde(default)]
    pub degraded: bool,
}

/// What to generate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlogRequest {
    /// Series topic.
    pub topic: String,
    /// Series goal.
    pub goal: String,
    /// Do not plan; only meaningful together with `roadmap_file`.
    pub skip_planning: bool,
    /// Existing roadmap to write from.
    pub roadmap_file: Option<PathBuf>,
}

impl BlogRequest {
    /// Creates a request that plans and writes.
    #[must_use]
    pub fn new(topic: impl Into<String>, goal: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            goal: goal.into(),
            ..Self::default()
        }
    }

    /// Writes from a saved roadmap.
    #[must_use]
    pub fn with_roadmap_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.roadmap_file = Some(path.into());
        self
    }

    /// Skips planning.
    #[must_use]
    pub fn skip_planning(mut self, skip: bool) -> Self {
        self.skip_planning = skip;
        self
    }

    /// Returns true if the planning stage should run.
    ///
    /// A roadmap file always counts as planning (it is loaded instead).
    #[must_use]
    pub fn wants_roadmap(&self) -> bool {
        !self.skip_planning || self.roadmap_file.is_some()
    }
}

/// Everything a generation run produced.
#[derive(Debug, Clone)]
pub struct BlogRun {
    /// Effective topic.
    pub topic: String,
    /// Effective goal.
    pub goal: String,
    /// The roadmap the posts were written from.
    pub roadmap: Roadmap,
    /// Posts, in roadmap order.
    pub posts: Vec<BlogPost>,
    /// The underlying pipeline run.
    pub run: PipelineRun,
}

impl BlogRun {
    /// Returns the number of posts whose body is a raw reply.
    #[must_use]
    pub fn degraded_posts(&self) -> usize {
        self.posts.iter().filter(|p| p.degraded).count()
    }
}
