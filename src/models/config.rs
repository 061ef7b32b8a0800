//! Configuration data model and validation

use crate::types::{AppError, Result, Strategy};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Target URL to analyze
    pub target_url: String,

    /// Strategies to run; one entry for mobile/desktop, two for both
    #[serde(default = "default_strategies")]
    pub strategies: Vec<Strategy>,

    /// PageSpeed Insights API key (higher quota when set)
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Request timeout duration
    #[serde(default = "default_timeout_secs")]
    pub timeout_seconds: u64,

    /// Path to a project-context JSON file written by a stack detector
    #[serde(default)]
    pub project_context_path: Option<PathBuf>,

    /// Emit the report as JSON instead of formatted text
    #[serde(default)]
    pub json_output: bool,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_url: String::new(),
            strategies: default_strategies(),
            api_key: None,
            timeout_seconds: default_timeout_secs(),
            project_context_path: None,
            json_output: false,
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.target_url.is_empty() {
            return Err(AppError::config("Target URL cannot be empty"));
        }

        match url::Url::parse(&self.target_url) {
            Ok(parsed) => {
                if parsed.scheme() != "http" && parsed.scheme() != "https" {
                    return Err(AppError::config(format!(
                        "Target URL must use http or https: {}",
                        self.target_url
                    )));
                }
            }
            Err(e) => {
                return Err(AppError::config(format!(
                    "Invalid target URL '{}': {}",
                    self.target_url, e
                )));
            }
        }

        if self.strategies.is_empty() {
            return Err(AppError::config("At least one strategy must be selected"));
        }

        if self.timeout_seconds == 0 {
            return Err(AppError::config("Timeout must be greater than 0"));
        }

        if self.timeout_seconds > 600 {
            return Err(AppError::config("Timeout cannot exceed 600 seconds"));
        }

        Ok(())
    }
}

fn default_strategies() -> Vec<Strategy> {
    vec![Strategy::Mobile]
}

fn default_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_TIMEOUT.as_secs()
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
