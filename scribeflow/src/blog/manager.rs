//! Coordinates planning and writing.

use super::{
    BlogPost, BlogRequest, BlogRun, PlanRoadmapStage, WritePostsStage, STATE_GOAL, STATE_POSTS,
    STATE_ROADMAP, STATE_TOPIC,
};
use crate::context::Blackboard;
use crate::errors::ScribeflowError;
use crate::events::EventSink;
use crate::pipeline::{PipelineBuilder, SequentialPipeline};
use crate::providers::LlmProvider;
use crate::roadmap::{load_roadmap, Roadmap};
use crate::tools::OutputDir;
use crate::websearch::WebSearch;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Runs the blog generation process.
pub struct BlogManager {
    provider: Arc<dyn LlmProvider>,
    search: Option<Arc<dyn WebSearch>>,
    max_results: usize,
    output: OutputDir,
    event_sink: Option<Arc<dyn EventSink>>,
}

impl fmt::Debug for BlogManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlogManager")
            .field("provider", &self.provider.name())
            .field("search", &self.search.is_some())
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

impl BlogManager {
    /// Creates a manager writing into `output`.
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, output: OutputDir) -> Self {
        Self {
            provider,
            search: None,
            max_results: 5,
            output,
            event_sink: None,
        }
    }

    /// Enables web research for planning and writing.
    #[must_use]
    pub fn with_search(mut self, search: Arc<dyn WebSearch>, max_results: usize) -> Self {
        self.search = Some(search);
        self.max_results = max_results;
        self
    }

    /// Publishes pipeline events to `sink`.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = Some(sink);
        self
    }

    /// Returns the output directory.
    #[must_use]
    pub fn output(&self) -> &OutputDir {
        &self.output
    }

    fn pipeline(&self, plan: bool) -> Result<SequentialPipeline, ScribeflowError> {
        let mut builder = PipelineBuilder::new("BlogGeneration").seeds([STATE_TOPIC, STATE_GOAL]);

        if plan {
            builder = builder.stage(
                "PlanRoadmap",
                Arc::new(PlanRoadmapStage::new(
                    Arc::clone(&self.provider),
                    self.search.clone(),
                    self.max_results,
                    self.output.clone(),
                )),
                &[STATE_TOPIC, STATE_GOAL],
                STATE_ROADMAP,
            )?;
        } else {
            builder = builder.seed(STATE_ROADMAP);
        }

        builder = builder
            .stage(
                "WritePosts",
                Arc::new(WritePostsStage::new(
                    Arc::clone(&self.provider),
                    self.search.clone(),
                    self.max_results,
                    self.output.clone(),
                )),
                &[STATE_ROADMAP],
                STATE_POSTS,
            )?
            .final_field(STATE_POSTS);

        if let Some(sink) = &self.event_sink {
            builder = builder.event_sink(Arc::clone(sink));
        }

        Ok(builder.build()?)
    }

    /// Plans (or loads) a roadmap and writes every post.
    ///
    /// # Errors
    ///
    /// Returns an error only if a requested roadmap file cannot be read.
    /// Model and write failures are logged and reflected in the result.
    pub async fn run(&self, request: &BlogRequest) -> Result<BlogRun, ScribeflowError> {
        info!("Starting blog generation process");

        let mut topic = request.topic.clone();
        let mut goal = request.goal.clone();
        let mut board = Blackboard::new();

        let plan = match &request.roadmap_file {
            Some(path) => {
                info!(path = %path.display(), "Using existing roadmap file");
                let mut loaded = load_roadmap(path)?;
                if !loaded.topic.is_empty() {
                    topic.clone_from(&loaded.topic);
                }
                if !loaded.goal.is_empty() {
                    goal.clone_from(&loaded.goal);
                }
                loaded.topic.clone_from(&topic);
                loaded.goal.clone_from(&goal);
                board.set(STATE_ROADMAP, serde_json::to_value(&loaded)?);
                false
            }
            None => request.wants_roadmap(),
        };

        board.set(STATE_TOPIC, topic.as_str());
        board.set(STATE_GOAL, goal.as_str());

        let run = self.pipeline(plan)?.run(board).await;

        let roadmap: Roadmap = run.board.get_as(STATE_ROADMAP).unwrap_or_default();
        let posts: Vec<BlogPost> = run.board.get_as(STATE_POSTS).unwrap_or_default();

        info!(posts = posts.len(), "Blog generation process completed");

        Ok(BlogRun {
            topic,
            goal,
            roadmap,
            posts,
            run,
        })
    }
}
