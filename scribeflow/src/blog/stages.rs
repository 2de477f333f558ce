//! Planning and writing stages.

use super::prompts::{planning_prompt, writing_prompt, PLANNER_INSTRUCTION, WRITER_INSTRUCTION};
use super::{BlogPost, STATE_GOAL, STATE_ROADMAP, STATE_TOPIC};
use crate::context::StageContext;
use crate::core::StageOutput;
use crate::providers::{extract_json_reply, CompletionRequest, LlmProvider};
use crate::roadmap::{post_filename, save_roadmap, Roadmap, RoadmapEntry};
use crate::stages::Stage;
use crate::tools::{save_to_file, OutputDir};
use crate::websearch::{research_topic, WebSearch};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

async fn research(
    search: Option<&Arc<dyn WebSearch>>,
    query: &str,
    max_results: usize,
) -> Option<String> {
    let search = search?;
    match research_topic(search.as_ref(), query, max_results).await {
        Ok(digest) if !digest.is_empty() => Some(digest),
        Ok(_) => None,
        Err(e) => {
            warn!(query = %query, error = %e, "Research failed, continuing without it");
            None
        }
    }
}

/// Asks the model for a roadmap and saves it as markdown.
pub struct PlanRoadmapStage {
    provider: Arc<dyn LlmProvider>,
    search: Option<Arc<dyn WebSearch>>,
    max_results: usize,
    output: OutputDir,
}

impl PlanRoadmapStage {
    /// Creates the stage.
    #[must_use]
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        search: Option<Arc<dyn WebSearch>>,
        max_results: usize,
        output: OutputDir,
    ) -> Self {
        Self {
            provider,
            search,
            max_results,
            output,
        }
    }
}

impl fmt::Debug for PlanRoadmapStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanRoadmapStage")
            .field("provider", &self.provider.name())
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Stage for PlanRoadmapStage {
    fn name(&self) -> &str {
        "PlanRoadmap"
    }

    async fn execute(&self, ctx: &StageContext<'_>) -> StageOutput {
        let topic = ctx.input_text(STATE_TOPIC).unwrap_or_default();
        let goal = ctx.input_text(STATE_GOAL).unwrap_or_default();
        info!(topic = %topic, "Generating new roadmap");

        let notes = research(self.search.as_ref(), &topic, self.max_results).await;
        let request = CompletionRequest::new(planning_prompt(&topic, &goal, notes.as_deref()))
            .with_system(PLANNER_INSTRUCTION);

        let reply = match self.provider.complete(request).await {
            Ok(reply) => reply,
            Err(e) => return StageOutput::fail(format!("roadmap planning failed: {e}")),
        };

        let entries = extract_json_reply(&reply.content)
            .as_json()
            .and_then(|json| json.get("posts"))
            .and_then(|posts| serde_json::from_value::<Vec<RoadmapEntry>>(posts.clone()).ok());

        let Some(entries) = entries else {
            error!("Planning reply did not contain a valid roadmap");
            return StageOutput::fail("planning reply did not contain a posts list");
        };

        let roadmap = Roadmap {
            topic,
            goal,
            entries,
        };

        if let Err(e) = save_roadmap(&self.output, &roadmap) {
            error!(error = %e, "Failed to save roadmap");
        }

        match serde_json::to_value(&roadmap) {
            Ok(value) => StageOutput::ok(value).add_metadata("posts", serde_json::json!(roadmap.len())),
            Err(e) => StageOutput::fail(e.to_string()),
        }
    }
}

/// Writes one post per roadmap entry, in order.
pub struct WritePostsStage {
    provider: Arc<dyn LlmProvider>,
    search: Option<Arc<dyn WebSearch>>,
    max_results: usize,
    output: OutputDir,
}

impl WritePostsStage {
    /// Creates the stage.
    #[must_use]
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        search: Option<Arc<dyn WebSearch>>,
        max_results: usize,
        output: OutputDir,
    ) -> Self {
        Self {
            provider,
            search,
            max_results,
            output,
        }
    }

    async fn write_post(&self, roadmap: &Roadmap, index: usize, entry: &RoadmapEntry) -> BlogPost {
        info!(
            "Writing blog post {}/{}: {}",
            index + 1,
            roadmap.len(),
            entry.title
        );

        let query = format!("{} {}", roadmap.topic, entry.title);
        let notes = research(self.search.as_ref(), query.trim(), self.max_results).await;
        let request = CompletionRequest::new(writing_prompt(roadmap, entry, index, notes.as_deref()))
            .with_system(WRITER_INSTRUCTION);

        let reply = match self.provider.complete(request).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(post = index + 1, title = %entry.title, error = %e, "Failed to write post");
                return degraded_post(entry, "");
            }
        };

        let parsed = extract_json_reply(&reply.content);
        let post = match parsed.str_field("content") {
            Some(content) => BlogPost {
                title: parsed
                    .str_field("title")
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or(&entry.title)
                    .to_string(),
                content: content.to_string(),
                degraded: false,
            },
            None => degraded_post(entry, &reply.content),
        };

        if post.degraded {
            warn!(post = index + 1, "Reply was not the requested JSON, using raw text");
        }

        save_to_file(&self.output, &post_filename(index, &entry.title), &post.content);
        post
    }
}

fn degraded_post(entry: &RoadmapEntry, text: &str) -> BlogPost {
    BlogPost {
        title: entry.title.clone(),
        content: text.trim().to_string(),
        degraded: true,
    }
}

impl fmt::Debug for WritePostsStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WritePostsStage")
            .field("provider", &self.provider.name())
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Stage for WritePostsStage {
    fn name(&self) -> &str {
        "WritePosts"
    }

    async fn execute(&self, ctx: &StageContext<'_>) -> StageOutput {
        let Some(roadmap) = ctx.input_as::<Roadmap>(STATE_ROADMAP).filter(|r| !r.is_empty()) else {
            error!("No blog roadmap available, nothing to write");
            return StageOutput::ok(serde_json::json!([])).add_metadata("written", serde_json::json!(0));
        };

        let mut posts = Vec::with_capacity(roadmap.len());
        for (index, entry) in roadmap.entries.iter().enumerate() {
            posts.push(self.write_post(&roadmap, index, entry).await);
        }

        let degraded = posts.iter().filter(|p| p.degraded).count();
        info!(written = posts.len(), degraded, "Completed writing blog posts");

        match serde_json::to_value(&posts) {
            Ok(value) => StageOutput::ok(value).add_metadata("written", serde_json::json!(posts.len())),
            Err(e) => StageOutput::fail(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProviderError;
    use crate::providers::MockLlmProvider;
    use crate::roadmap::{load_roadmap, ROADMAP_FILENAME};
    use crate::testing::StageHarness;
    use pretty_assertions::assert_eq;

    const PLAN_REPLY: &str = r#"Sure! Here is the plan:
{"topic": "LLMs", "goal": "Explain", "posts": [
  {"title": "Intro", "description": "Basics."},
  {"title": "Deep Dive", "description": "Details."}
]}
Let me know if you need changes."#;

    fn two_post_roadmap() -> Roadmap {
        Roadmap::new("LLMs", "Explain transformers")
            .with_entry("Intro", "Basics.")
            .with_entry("Deep Dive", "Details.")
    }

    #[tokio::test]
    async fn test_plan_stage_parses_and_saves() {
        let tmp = tempfile::tempdir().unwrap();
        let output = OutputDir::new(tmp.path());
        let stage = PlanRoadmapStage::new(
            Arc::new(MockLlmProvider::new([PLAN_REPLY])),
            None,
            5,
            output.clone(),
        );
        let harness = StageHarness::new()
            .with_field(STATE_TOPIC, "LLMs")
            .with_field(STATE_GOAL, "Explain transformers");

        let out = harness.run(&stage, &[STATE_TOPIC, STATE_GOAL]).await;

        let roadmap: Roadmap = serde_json::from_value(out.value.unwrap()).unwrap();
        assert_eq!(roadmap, two_post_roadmap());
        assert_eq!(load_roadmap(tmp.path().join(ROADMAP_FILENAME)).unwrap(), roadmap);
    }

    #[tokio::test]
    async fn test_plan_stage_without_posts_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let stage = PlanRoadmapStage::new(
            Arc::new(MockLlmProvider::new(["I cannot help with that."])),
            None,
            5,
            OutputDir::new(tmp.path()),
        );

        let out = StageHarness::new().run(&stage, &[]).await;

        assert!(out.is_failure());
        assert!(!tmp.path().join(ROADMAP_FILENAME).exists());
    }

    #[tokio::test]
    async fn test_write_stage_is_sequential_and_tags_degraded() {
        let tmp = tempfile::tempdir().unwrap();
        let provider = Arc::new(MockLlmProvider::new([
            r##"{"title": "Intro", "content": "# Intro\nHello"}"##,
            "Plain markdown for the deep dive.",
        ]));
        let stage = WritePostsStage::new(provider.clone(), None, 5, OutputDir::new(tmp.path()));
        let harness = StageHarness::new()
            .with_field(STATE_ROADMAP, serde_json::to_value(two_post_roadmap()).unwrap());

        let out = harness.run(&stage, &[STATE_ROADMAP]).await;
        let posts: Vec<BlogPost> = serde_json::from_value(out.value.unwrap()).unwrap();

        assert_eq!(
            posts,
            vec![
                BlogPost {
                    title: "Intro".to_string(),
                    content: "# Intro\nHello".to_string(),
                    degraded: false,
                },
                BlogPost {
                    title: "Deep Dive".to_string(),
                    content: "Plain markdown for the deep dive.".to_string(),
                    degraded: true,
                },
            ]
        );

        let prompts = provider.prompts();
        assert!(prompts[0].contains("Post number: 1 of 2"));
        assert!(prompts[1].contains("Post number: 2 of 2"));
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("Blog_Post_2_Deep_Dive.md")).unwrap(),
            "Plain markdown for the deep dive."
        );
    }

    #[tokio::test]
    async fn test_write_stage_keeps_placeholder_for_failed_post() {
        let tmp = tempfile::tempdir().unwrap();
        let provider = Arc::new(MockLlmProvider::default());
        provider.push_error(ProviderError::RequestFailed("reset".to_string()));
        provider.push_reply(r#"{"title": "Deep Dive", "content": "Body"}"#);
        let stage = WritePostsStage::new(provider, None, 5, OutputDir::new(tmp.path()));
        let harness = StageHarness::new()
            .with_field(STATE_ROADMAP, serde_json::to_value(two_post_roadmap()).unwrap());

        let out = harness.run(&stage, &[STATE_ROADMAP]).await;
        let posts: Vec<BlogPost> = serde_json::from_value(out.value.unwrap()).unwrap();

        assert_eq!(
            posts,
            vec![
                BlogPost {
                    title: "Intro".to_string(),
                    content: String::new(),
                    degraded: true,
                },
                BlogPost {
                    title: "Deep Dive".to_string(),
                    content: "Body".to_string(),
                    degraded: false,
                },
            ]
        );
        assert!(!tmp.path().join("Blog_Post_1_Intro.md").exists());
        assert!(tmp.path().join("Blog_Post_2_Deep_Dive.md").exists());
    }

    #[tokio::test]
    async fn test_write_stage_without_roadmap_writes_nothing() {
        let provider = Arc::new(MockLlmProvider::default());
        let stage = WritePostsStage::new(provider.clone(), None, 5, OutputDir::new("unused"));

        let out = StageHarness::new().run(&stage, &[STATE_ROADMAP]).await;

        assert_eq!(out.value, Some(serde_json::json!([])));
        assert_eq!(provider.call_count(), 0);
    }
}
