//! Subscriber setup shared by the binaries.

use crate::errors::ScribeflowError;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Console output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Lowers the default level from `info` to `debug`.
    #[serde(default)]
    pub verbose: bool,
    /// Console format.
    #[serde(default)]
    pub format: LogFormat,
    /// Optional log file, appended to in plain text.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl LogConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets verbose output.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sets the console format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Also writes logs to `path`.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// The filter used when `RUST_LOG` is unset.
    #[must_use]
    pub fn default_directive(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over [`LogConfig::verbose`].
///
/// # Errors
///
/// Fails if the log file cannot be opened or a subscriber is already set.
pub fn init_logging(config: &LogConfig) -> Result<(), ScribeflowError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    let file_layer = match &config.file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let json = config.format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(filter)
        .with((!json).then(|| fmt::layer().with_target(false)))
        .with(json.then(|| fmt::layer().json()))
        .with(file_layer)
        .try_init()
        .map_err(|e| ScribeflowError::Config(format!("logging already initialized: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(LogConfig::new().default_directive(), "info");
        assert_eq!(LogConfig::new().with_verbose(true).default_directive(), "debug");
    }

    #[test]
    fn test_config_from_json() {
        let config: LogConfig =
            serde_json::from_str(r#"{"format": "json", "file": "out/run.log"}"#).unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.file, Some(PathBuf::from("out/run.log")));
        assert!(!config.verbose);
    }

    #[test]
    fn test_init_creates_log_file_once() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("logs").join("blog_generation.log");
        let config = LogConfig::new().with_file(&path);

        assert!(init_logging(&config).is_ok());
        tracing::info!("written to file");
        assert!(path.exists());

        assert!(matches!(
            init_logging(&LogConfig::new()),
            Err(ScribeflowError::Config(_))
        ));
    }
}
