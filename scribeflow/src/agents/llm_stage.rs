//! A stage that asks a language model.

use super::render_prompt;
use crate::context::StageContext;
use crate::core::StageOutput;
use crate::providers::{CompletionRequest, LlmProvider};
use crate::stages::Stage;
use crate::websearch::{research_topic, WebSearch};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

struct Research {
    search: Arc<dyn WebSearch>,
    query_field: String,
    max_results: usize,
}

/// A stage whose value is a model completion.
pub struct LlmStage {
    name: String,
    instruction: Option<String>,
    template: String,
    provider: Arc<dyn LlmProvider>,
    research: Option<Research>,
}

impl LlmStage {
    /// Creates a stage from a prompt template.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        provider: Arc<dyn LlmProvider>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            instruction: None,
            template: template.into(),
            provider,
            research: None,
        }
    }

    /// Sets the system instruction.
    #[must_use]
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }

    /// Researches the value of `query_field` before prompting.
    #[must_use]
    pub fn with_research(
        mut self,
        search: Arc<dyn WebSearch>,
        query_field: impl Into<String>,
        max_results: usize,
    ) -> Self {
        self.research = Some(Research {
            search,
            query_field: query_field.into(),
            max_results,
        });
        self
    }

    async fn research_notes(&self, ctx: &StageContext<'_>) -> Option<String> {
        let research = self.research.as_ref()?;
        let query = ctx.input_text(&research.query_field)?;

        match research_topic(research.search.as_ref(), &query, research.max_results).await {
            Ok(digest) if !digest.is_empty() => Some(digest),
            Ok(_) => None,
            Err(e) => {
                warn!(stage = %self.name, error = %e, "Research failed, prompting without it");
                None
            }
        }
    }
}

impl fmt::Debug for LlmStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmStage")
            .field("name", &self.name)
            .field("provider", &self.provider.name())
            .field("research", &self.research.is_some())
            .finish()
    }
}

#[async_trait]
impl Stage for LlmStage {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, ctx: &StageContext<'_>) -> StageOutput {
        let mut prompt = render_prompt(&self.template, ctx);
        if let Some(notes) = self.research_notes(ctx).await {
            prompt.push_str("\n\nResearch notes:\n");
            prompt.push_str(&notes);
        }

        let mut request = CompletionRequest::new(prompt);
        if let Some(instruction) = &self.instruction {
            request = request.with_system(instruction);
        }

        debug!(stage = %self.name, provider = %self.provider.name(), "Prompting model");

        match self.provider.complete(request).await {
            Ok(reply) if reply.content.trim().is_empty() => {
                StageOutput::fail("model returned an empty reply")
            }
            Ok(reply) => StageOutput::ok_text(reply.content.trim())
                .add_metadata("model", serde_json::json!(reply.model)),
            Err(e) => StageOutput::fail(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ProviderError, SearchError};
    use crate::providers::MockLlmProvider;
    use crate::testing::{assert_output_failed, assert_output_text, StageHarness};
    use crate::websearch::{MockWebSearch, SearchHit};

    #[tokio::test]
    async fn test_prompt_is_rendered_and_reply_written() {
        let provider = Arc::new(MockLlmProvider::new(["  1. book flights\n2. hotels  "]));
        let stage = LlmStage::new("TaskAnalyzer", provider.clone(), "Break down: {task}")
            .with_instruction("You analyze tasks.");
        let harness = StageHarness::new().with_field("task", "Plan a trip");

        let output = harness.run(&stage, &["task"]).await;

        assert_output_text(&output, "1. book flights\n2. hotels");
        assert_eq!(provider.prompts(), vec!["Break down: Plan a trip"]);
        assert_eq!(provider.requests()[0].messages[0].content, "You analyze tasks.");
    }

    #[tokio::test]
    async fn test_provider_error_becomes_failure() {
        let provider = Arc::new(MockLlmProvider::default());
        provider.push_error(ProviderError::Api {
            status: 500,
            body: "boom".to_string(),
        });
        let stage = LlmStage::new("s", provider, "{task}");

        let output = StageHarness::new().run(&stage, &["task"]).await;

        assert_output_failed(&output);
        assert!(output.error.unwrap().contains("500"));
    }

    #[tokio::test]
    async fn test_empty_reply_is_failure() {
        let stage = LlmStage::new("s", Arc::new(MockLlmProvider::new(["   "])), "x");
        let output = StageHarness::new().run(&stage, &[]).await;
        assert!(!output.has_value());
    }

    #[tokio::test]
    async fn test_research_is_appended() {
        let mut search = MockWebSearch::new();
        search
            .expect_search()
            .returning(|_, _| Ok(vec![SearchHit::new("Tokio", "https://tokio.rs", "Runtime")]));

        let provider = Arc::new(MockLlmProvider::constant("ok"));
        let stage = LlmStage::new("s", provider.clone(), "About {task}")
            .with_research(Arc::new(search), "task", 3);

        StageHarness::new()
            .with_field("task", "async rust")
            .run(&stage, &["task"])
            .await;

        let prompt = &provider.prompts()[0];
        assert!(prompt.starts_with("About async rust\n\nResearch notes:\nSource: https://tokio.rs"));
    }

    #[tokio::test]
    async fn test_research_failure_is_tolerated() {
        let mut search = MockWebSearch::new();
        search
            .expect_search()
            .returning(|_, _| Err(SearchError::RequestFailed("offline".to_string())));

        let provider = Arc::new(MockLlmProvider::constant("ok"));
        let stage = LlmStage::new("s", provider.clone(), "About {task}")
            .with_research(Arc::new(search), "task", 3);

        let output = StageHarness::new()
            .with_field("task", "x")
            .run(&stage, &["task"])
            .await;

        assert_output_text(&output, "ok");
        assert_eq!(provider.prompts(), vec!["About x"]);
    }
}
