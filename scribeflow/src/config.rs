//! Application configuration shared by the binaries.
//!
//! Values come from the environment (after loading `.env`), falling back to
//! the defaults below. Command-line flags override individual fields.

use crate::errors::{ProviderError, ScribeflowError, SearchError};
use crate::providers::OpenAiCompatibleProvider;
use crate::tools::OutputDir;
use crate::websearch::WebSearch;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Model name variable.
pub const ENV_MODEL: &str = "SCRIBEFLOW_MODEL";
/// API base URL variable.
pub const ENV_API_BASE: &str = "SCRIBEFLOW_API_BASE";
/// API key variable.
pub const ENV_API_KEY: &str = "SCRIBEFLOW_API_KEY";
/// API key variable used when [`ENV_API_KEY`] is unset.
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Blog output directory variable.
pub const ENV_OUTPUT_DIR: &str = "SCRIBEFLOW_OUTPUT_DIR";
/// Planner output directory variable.
pub const ENV_PLANNER_OUTPUT_DIR: &str = "SCRIBEFLOW_PLANNER_OUTPUT_DIR";
/// Research hits per query variable. `0` disables web research.
pub const ENV_SEARCH_RESULTS: &str = "SCRIBEFLOW_SEARCH_RESULTS";
/// Request timeout variable, in seconds.
pub const ENV_TIMEOUT_SECS: &str = "SCRIBEFLOW_TIMEOUT_SECS";

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Model identifier sent to the provider.
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Bearer token, if the endpoint needs one.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Where blog posts and the roadmap are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Where the agent system plan is written.
    #[serde(default = "default_planner_output_dir")]
    pub planner_output_dir: PathBuf,
    /// Research hits per query.
    #[serde(default = "default_search_results")]
    pub search_results: usize,
    /// Provider request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_planner_output_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_search_results() -> usize {
    5
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: default_api_base(),
            api_key: None,
            output_dir: default_output_dir(),
            planner_output_dir: default_planner_output_dir(),
            search_results: default_search_results(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self, ScribeflowError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ScribeflowError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(model) = get(ENV_MODEL) {
            config.model = model;
        }
        if let Some(base) = get(ENV_API_BASE) {
            config.api_base = base;
        }
        config.api_key = get(ENV_API_KEY).or_else(|| get(ENV_OPENAI_API_KEY));
        if let Some(dir) = get(ENV_OUTPUT_DIR) {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get(ENV_PLANNER_OUTPUT_DIR) {
            config.planner_output_dir = PathBuf::from(dir);
        }
        if let Some(raw) = get(ENV_SEARCH_RESULTS) {
            config.search_results = parse_number(ENV_SEARCH_RESULTS, &raw)?;
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            config.timeout_secs = parse_number(ENV_TIMEOUT_SECS, &raw)?;
        }

        Ok(config)
    }

    /// Overrides the model, ignoring `None`.
    #[must_use]
    pub fn with_model(mut self, model: Option<String>) -> Self {
        if let Some(model) = model {
            self.model = model;
        }
        self
    }

    /// Overrides the blog output directory, ignoring `None`.
    #[must_use]
    pub fn with_output_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.output_dir = dir;
        }
        self
    }

    /// Overrides the planner output directory, ignoring `None`.
    #[must_use]
    pub fn with_planner_output_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.planner_output_dir = dir;
        }
        self
    }

    /// Returns true if stages should consult web search.
    #[must_use]
    pub fn research_enabled(&self) -> bool {
        self.search_results > 0
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Blog output directory.
    #[must_use]
    pub fn output(&self) -> OutputDir {
        OutputDir::new(&self.output_dir)
    }

    /// Planner output directory.
    #[must_use]
    pub fn planner_output(&self) -> OutputDir {
        OutputDir::new(&self.planner_output_dir)
    }

    /// Builds the HTTP provider described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn provider(&self) -> Result<OpenAiCompatibleProvider, ProviderError> {
        OpenAiCompatibleProvider::new(
            self.api_base.clone(),
            self.api_key.clone(),
            self.model.clone(),
            self.timeout(),
        )
    }

    /// Builds the search backend, or `None` when research is disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn search_backend(&self) -> Result<Option<Arc<dyn WebSearch>>, SearchError> {
        if !self.research_enabled() {
            return Ok(None);
        }
        #[cfg(feature = "websearch")]
        {
            use crate::websearch::{DuckDuckGoSearch, WebSearchConfig};

            let config = WebSearchConfig::new().with_max_results(self.search_results);
            Ok(Some(Arc::new(DuckDuckGoSearch::new(config)?)))
        }
        #[cfg(not(feature = "websearch"))]
        {
            tracing::warn!("Web research requested but the websearch feature is disabled");
            Ok(None)
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ScribeflowError> {
    raw.trim()
        .parse()
        .map_err(|_| ScribeflowError::Config(format!("{key} must be a non-negative integer, got '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.planner_output_dir, PathBuf::from("data"));
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert!(config.research_enabled());
    }

    #[test]
    fn test_environment_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_MODEL, "llama3"),
            (ENV_API_BASE, "http://localhost:11434/v1"),
            (ENV_OUTPUT_DIR, "posts"),
            (ENV_SEARCH_RESULTS, "0"),
            (ENV_TIMEOUT_SECS, "30"),
        ]))
        .unwrap();

        assert_eq!(config.model, "llama3");
        assert_eq!(config.api_base, "http://localhost:11434/v1");
        assert_eq!(config.output().root(), std::path::Path::new("posts"));
        assert!(!config.research_enabled());
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_api_key_fallback() {
        let config = AppConfig::from_lookup(lookup(&[(ENV_OPENAI_API_KEY, "sk-openai")])).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-openai"));

        let config = AppConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "sk-own"),
            (ENV_OPENAI_API_KEY, "sk-openai"),
        ]))
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-own"));

        let config = AppConfig::from_lookup(lookup(&[(ENV_API_KEY, "  ")])).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_invalid_number() {
        let err = AppConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert!(err.to_string().contains(ENV_TIMEOUT_SECS));
    }

    #[test]
    fn test_cli_overrides() {
        let config = AppConfig::default()
            .with_model(Some("gpt-4o".to_string()))
            .with_model(None)
            .with_planner_output_dir(Some(PathBuf::from("plans")));

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.planner_output().root(), std::path::Path::new("plans"));
    }

    #[test]
    fn test_api_key_not_serialized() {
        let config = AppConfig {
            api_key: Some("secret".to_string()),
            ..AppConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));

        let parsed: AppConfig = serde_json::from_str(r#"{"model": "m"}"#).unwrap();
        assert_eq!(parsed.model, "m");
        assert_eq!(parsed.search_results, 5);
    }

    #[test]
    fn test_provider_uses_model() {
        let provider = AppConfig::default().with_model(Some("m1".to_string())).provider().unwrap();
        assert_eq!(provider.model(), "m1");
    }

    #[test]
    fn test_search_backend_disabled() {
        let config = AppConfig {
            search_results: 0,
            ..AppConfig::default()
        };
        assert!(config.search_backend().unwrap().is_none());
    }
}
