//! Web Vitals Auditor
//!
//! A performance auditing toolkit that wraps the PageSpeed Insights API,
//! extracts structured insights from its audit output, and synthesizes
//! prioritized, framework-aware remediation reports for CI pipelines and
//! tooling authors.

pub mod analysis;
pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod types;

// Re-export commonly used types
pub use analysis::{
    generate_report, ActionableReport, DetailedInsights, DiagnosticItem, EnhancedLcpElement,
    KeyOpportunity,
};
pub use client::{PageSpeedClient, PerformanceApi};
pub use error::{AppError, Result};
pub use models::{Config, PerformanceResult, ProjectContext};
pub use output::{ColoredFormatter, OutputCoordinator, OutputFormatter, OutputFormatterFactory, PlainFormatter};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    /// Full audits routinely take 30-60 seconds at the API
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
