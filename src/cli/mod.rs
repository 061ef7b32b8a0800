//! Command-line interface module

use clap::Parser;
use std::path::PathBuf;

/// Web Vitals Auditor - turn PageSpeed Insights audits into actionable reports
#[derive(Parser, Debug, Clone)]
#[command(name = "wva")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Target URL to analyze
    pub url: String,

    /// Analysis strategy: mobile, desktop, or both
    #[arg(short, long, default_value = "mobile")]
    pub strategy: String,

    /// PageSpeed Insights API key (higher quota when set)
    #[arg(long, env = "PSI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(short, long, default_value_t = crate::defaults::DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Path to a project-context JSON file from a stack detector
    #[arg(long, value_name = "FILE")]
    pub project_context: Option<PathBuf>,

    /// Emit the full report as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.url.trim().is_empty() {
            return Err("A target URL is required".to_string());
        }

        match self.strategy.to_lowercase().as_str() {
            "mobile" | "desktop" | "both" => {}
            other => {
                return Err(format!(
                    "Invalid strategy '{}': expected mobile, desktop, or both",
                    other
                ));
            }
        }

        if self.timeout == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}
