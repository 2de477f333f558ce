//! Scripted provider for tests and offline runs.

use super::{CompletionRequest, LlmProvider, LlmResponse};
use crate::errors::ProviderError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// A provider that replays scripted replies in order.
///
/// Every request is recorded. When the script runs out the provider either
/// repeats its fallback reply or returns [`ProviderError::Exhausted`].
#[derive(Debug, Default)]
pub struct MockLlmProvider {
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    fallback: Option<String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockLlmProvider {
    /// Creates a provider that answers with `replies` in order.
    #[must_use]
    pub fn new(replies: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            script: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            fallback: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Creates a provider that always answers with the same text.
    #[must_use]
    pub fn constant(reply: impl Into<String>) -> Self {
        Self {
            fallback: Some(reply.into()),
            ..Self::default()
        }
    }

    /// Sets the reply used once the script is exhausted.
    #[must_use]
    pub fn with_fallback(mut self, reply: impl Into<String>) -> Self {
        self.fallback = Some(reply.into());
        self
    }

    /// Appends a reply to the script.
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.script.lock().push_back(Ok(reply.into()));
    }

    /// Appends an error to the script.
    pub fn push_error(&self, error: ProviderError) {
        self.script.lock().push_back(Err(error));
    }

    /// Returns the number of requests served.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Returns the recorded requests.
    #[must_use]
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }

    /// Returns the user prompt of each recorded request.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .iter()
            .map(|r| r.prompt().unwrap_or_default().to_string())
            .collect()
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<LlmResponse, ProviderError> {
        let calls = {
            let mut requests = self.requests.lock();
            requests.push(request);
            requests.len()
        };

        let next = self.script.lock().pop_front();
        let content = match next {
            Some(reply) => reply?,
            None => self
                .fallback
                .clone()
                .ok_or(ProviderError::Exhausted { calls: calls - 1 })?,
        };

        Ok(LlmResponse {
            content,
            model: "mock".to_string(),
            prompt_tokens: None,
            completion_tokens: None,
        })
    }
}
