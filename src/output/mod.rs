//! Output formatting and display system
//!
//! A flexible formatting layer over the actionable report, supporting
//! colored terminal output, plain text for logs/CI, and raw JSON.

mod colored;
mod formatter;

pub use colored::{ColorScheme, ColoredFormatter};
pub use formatter::{FormattingOptions, OutputFormatter, PlainFormatter};

use crate::{
    analysis::report::ActionableReport,
    error::{AppError, Result},
    models::Config,
};

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
            ..FormattingOptions::default()
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    /// Create a formatter from the application configuration
    pub fn from_config(config: &Config) -> Box<dyn OutputFormatter> {
        Self::create_formatter(config.enable_color, config.verbose)
    }
}

/// Main output coordinator that renders reports in the configured mode
pub struct OutputCoordinator {
    formatter: Box<dyn OutputFormatter>,
    json_output: bool,
}

impl OutputCoordinator {
    /// Create a new output coordinator from configuration
    pub fn new(config: &Config) -> Self {
        Self {
            formatter: OutputFormatterFactory::from_config(config),
            json_output: config.json_output,
        }
    }

    /// Render one report to a string in the configured output mode
    pub fn render(&self, report: &ActionableReport) -> Result<String> {
        if self.json_output {
            serde_json::to_string_pretty(report)
                .map_err(|e| AppError::report(format!("failed to serialize report: {}", e)))
        } else {
            self.formatter.format_report(report)
        }
    }

    /// Render and print one report
    pub fn display(&self, report: &ActionableReport) -> Result<()> {
        println!("{}", self.render(report)?);
        Ok(())
    }

    /// Print a warning line through the active formatter
    pub fn display_warning(&self, warning: &str) -> Result<()> {
        eprint!("{}", self.formatter.format_warning(warning)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::report::generate_report;
    use crate::models::audit::AuditMap;
    use crate::models::result::{CategoryScores, CoreWebVitals, MetricValue, PerformanceResult};
    use crate::types::Strategy;

    fn minimal_result() -> PerformanceResult {
        PerformanceResult {
            url: "https://example.com".to_string(),
            strategy: Strategy::Desktop,
            timestamp: chrono::Utc::now(),
            scores: CategoryScores { performance: Some(92), ..CategoryScores::default() },
            metrics: CoreWebVitals {
                lcp: MetricValue::from_score(1800.0, "1.8 s", 0.95),
                fcp: MetricValue::from_score(900.0, "0.9 s", 0.97),
                cls: MetricValue::from_score(0.02, "0.02", 0.99),
                tbt: MetricValue::from_score(80.0, "80 ms", 0.96),
                speed_index: MetricValue::from_score(2000.0, "2.0 s", 0.93),
                ttfb: None,
            },
            lcp_element: None,
            opportunities: vec![],
            diagnostics: vec![],
            insights: None,
            field_data: None,
            raw_audits: AuditMap::new(),
        }
    }

    #[test]
    fn test_json_mode_produces_valid_json() {
        let config = Config {
            target_url: "https://example.com".to_string(),
            json_output: true,
            enable_color: false,
            ..Config::default()
        };
        let coordinator = OutputCoordinator::new(&config);
        let report = generate_report(minimal_result(), None);

        let rendered = coordinator.render(&report).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["performanceResult"]["url"], "https://example.com");
        assert_eq!(parsed["summary"]["healthStatus"], "healthy");
    }

    #[test]
    fn test_text_mode_produces_sections() {
        let config = Config {
            target_url: "https://example.com".to_string(),
            enable_color: false,
            ..Config::default()
        };
        let coordinator = OutputCoordinator::new(&config);
        let report = generate_report(minimal_result(), None);

        let rendered = coordinator.render(&report).unwrap();
        assert!(rendered.contains("Core Web Vitals"));
        assert!(rendered.contains("Next steps"));
    }
}
