//! DuckDuckGo HTML search backend.

use super::{SearchHit, WebSearch, WebSearchConfig};
use crate::errors::SearchError;
use async_trait::async_trait;
use reqwest::{Client, Url};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Searches through DuckDuckGo's JavaScript-free HTML endpoint.
#[derive(Debug, Clone)]
pub struct DuckDuckGoSearch {
    client: Client,
    config: WebSearchConfig,
}

impl DuckDuckGoSearch {
    /// Creates a backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: WebSearchConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &WebSearchConfig {
        &self.config
    }
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .form(&[("q", query)])
            .send()
            .await
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;

        let hits = parse_results(&body, max_results)?;
        debug!(query = %query, hits = hits.len(), "DuckDuckGo search completed");
        Ok(hits)
    }
}

fn selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css).map_err(|e| SearchError::Parse(format!("{css}: {e}")))
}

fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves DuckDuckGo's `/l/?uddg=` redirect links to their target.
fn resolve_link(href: &str) -> String {
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };

    Url::parse(&absolute)
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(k, _)| k == "uddg")
                .map(|(_, v)| v.into_owned())
        })
        .unwrap_or(absolute)
}

/// Extracts hits from a DuckDuckGo HTML results page.
///
/// # Errors
///
/// Returns an error only if a selector is invalid; a page without results
/// yields an empty list.
pub fn parse_results(html: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
    let result_sel = selector(".result")?;
    let link_sel = selector("a.result__a")?;
    let snippet_sel = selector(".result__snippet")?;

    let document = Html::parse_document(html);
    let hits = document
        .select(&result_sel)
        .filter_map(|result| {
            let anchor = result.select(&link_sel).next()?;
            let href = anchor.value().attr("href")?;
            let snippet = result.select(&snippet_sel).next().map(text_of).unwrap_or_default();
            Some(SearchHit::new(text_of(anchor), resolve_link(href), snippet))
        })
        .take(max_results)
        .collect();

    Ok(hits)
}
