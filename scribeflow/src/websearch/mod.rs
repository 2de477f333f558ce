//! Web search used to ground prompts in current sources.
//!
//! This module provides:
//! - The [`WebSearch`] trait and its [`SearchHit`] result type
//! - Rendering of hits into a research digest for prompts
//! - A DuckDuckGo HTML backend (feature `websearch`)

mod config;
#[cfg(feature = "websearch")]
mod duckduckgo;

pub use config::WebSearchConfig;
#[cfg(feature = "websearch")]
pub use duckduckgo::{parse_results, DuckDuckGoSearch};

use crate::errors::SearchError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Result title.
    pub title: String,
    /// Target URL.
    pub link: String,
    /// Short excerpt.
    pub snippet: String,
}

impl SearchHit {
    /// Creates a hit.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            snippet: snippet.into(),
        }
    }
}

/// Trait for search backends.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Returns at most `max_results` hits for `query`, best first.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError>;
}

/// Renders hits as `Source/Title/Snippet` blocks separated by blank lines.
#[must_use]
pub fn format_research(hits: &[SearchHit], max_results: usize) -> String {
    hits.iter()
        .take(max_results)
        .map(|h| format!("Source: {}\nTitle: {}\nSnippet: {}", h.link, h.title, h.snippet))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Searches for a topic and renders the research digest.
///
/// # Errors
///
/// Returns the backend's error when the search fails.
pub async fn research_topic(
    search: &dyn WebSearch,
    topic: &str,
    max_results: usize,
) -> Result<String, SearchError> {
    let hits = search.search(topic, max_results).await?;
    tracing::debug!(topic = %topic, hits = hits.len(), "Research completed");
    Ok(format_research(&hits, max_results))
}
