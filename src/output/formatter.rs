//! Core formatting traits and implementations
//!
//! This module defines the output formatting interface and provides
//! a plain text implementation suitable for logs and CI output.

use crate::{
    analysis::diagnostics::DiagnosticItem,
    analysis::format::{format_bytes, truncate_url, URL_MAX_LENGTH},
    analysis::lcp::EnhancedLcpElement,
    analysis::opportunities::KeyOpportunity,
    analysis::report::{ActionableReport, NextStep, ReportSummary},
    error::Result,
    models::result::{CoreWebVitals, MetricValue, PerformanceResult},
    types::{HealthStatus, Urgency},
};
use std::fmt::Write as _;

/// Main trait for report formatting
pub trait OutputFormatter {
    /// Format a header section
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format the executive summary
    fn format_summary(&self, summary: &ReportSummary, result: &PerformanceResult) -> Result<String>;

    /// Format the Core Web Vitals block
    fn format_metrics(&self, metrics: &CoreWebVitals) -> Result<String>;

    /// Format the diagnostics table
    fn format_diagnostics(&self, diagnostics: &[DiagnosticItem]) -> Result<String>;

    /// Format the key opportunities
    fn format_opportunities(&self, opportunities: &[KeyOpportunity]) -> Result<String>;

    /// Format the LCP element analysis
    fn format_lcp(&self, lcp: &EnhancedLcpElement) -> Result<String>;

    /// Format the next steps
    fn format_next_steps(&self, steps: &[NextStep]) -> Result<String>;

    /// Format error messages
    fn format_error(&self, error: &str) -> Result<String>;

    /// Format warning messages
    fn format_warning(&self, warning: &str) -> Result<String>;

    /// Format success messages
    fn format_success(&self, message: &str) -> Result<String>;

    /// Format a complete report by composing the section formatters
    fn format_report(&self, report: &ActionableReport) -> Result<String> {
        let mut out = String::new();
        out.push_str(&self.format_header(&format!(
            "Performance report for {} ({})",
            report.performance_result.url, report.performance_result.strategy
        ))?);
        out.push_str(&self.format_summary(&report.summary, &report.performance_result)?);
        out.push_str(&self.format_metrics(&report.performance_result.metrics)?);
        if let Some(lcp) = &report.enhanced_lcp {
            out.push_str(&self.format_lcp(lcp)?);
        }
        out.push_str(&self.format_opportunities(&report.key_opportunities)?);
        out.push_str(&self.format_diagnostics(&report.diagnostics_table)?);
        out.push_str(&self.format_next_steps(&report.next_steps)?);
        Ok(out)
    }
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Enable verbose mode with detailed information
    pub verbose_mode: bool,
    /// Maximum items shown per diagnostics row
    pub max_items_shown: usize,
    /// Maximum output width
    pub max_width: usize,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
            max_items_shown: 3,
            max_width: 100,
        }
    }
}

/// Human label for a health status
pub fn health_label(status: HealthStatus) -> &'static str {
    match status {
        HealthStatus::Healthy => "Healthy",
        HealthStatus::NeedsAttention => "Needs attention",
        HealthStatus::Critical => "Critical",
    }
}

/// Human label for an urgency
pub fn urgency_label(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Immediate => "immediate",
        Urgency::Soon => "soon",
        Urgency::WhenPossible => "when possible",
    }
}

fn metric_line(name: &str, metric: &MetricValue) -> String {
    format!("  {:<14} {:>10}   [{:?}]\n", name, metric.display_value, metric.rating)
}

/// Plain text formatter without colors
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    /// Create a new plain formatter
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let line = "=".repeat(title.len().min(self.options.max_width));
        Ok(format!("\n{}\n{}\n", title, line))
    }

    fn format_summary(&self, summary: &ReportSummary, result: &PerformanceResult) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "\nSummary").ok();
        if let Some(score) = result.scores.performance {
            writeln!(out, "  Performance score: {}/100", score).ok();
        } else {
            writeln!(out, "  Performance score: not available").ok();
        }
        writeln!(out, "  Health: {}", health_label(summary.health_status)).ok();
        writeln!(out, "  Quick wins available: {}", summary.quick_wins_count).ok();
        writeln!(
            out,
            "  Potential savings: {} and {} ms",
            format_bytes(summary.potential_savings.size_bytes),
            summary.potential_savings.time_ms.round()
        )
        .ok();
        if !summary.top_priorities.is_empty() {
            writeln!(out, "  Top priorities:").ok();
            for (index, title) in summary.top_priorities.iter().enumerate() {
                writeln!(out, "    {}. {}", index + 1, title).ok();
            }
        }
        Ok(out)
    }

    fn format_metrics(&self, metrics: &CoreWebVitals) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "\nCore Web Vitals").ok();
        out.push_str(&metric_line("LCP", &metrics.lcp));
        out.push_str(&metric_line("FCP", &metrics.fcp));
        out.push_str(&metric_line("CLS", &metrics.cls));
        out.push_str(&metric_line("TBT", &metrics.tbt));
        out.push_str(&metric_line("Speed Index", &metrics.speed_index));
        if let Some(ttfb) = &metrics.ttfb {
            out.push_str(&metric_line("TTFB", ttfb));
        }
        Ok(out)
    }

    fn format_diagnostics(&self, diagnostics: &[DiagnosticItem]) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "\nDiagnostics ({} issue categories)", diagnostics.len()).ok();
        for item in diagnostics {
            writeln!(
                out,
                "  [{:?}] {} - {}",
                item.severity, item.title, item.display_value
            )
            .ok();
            for entry in item.items.iter().take(self.options.max_items_shown) {
                if let Some(url) = entry.get("url").and_then(|v| v.as_str()) {
                    writeln!(out, "      {}", truncate_url(url, URL_MAX_LENGTH)).ok();
                } else if let Some(entity) = entry.get("entity").and_then(|v| v.as_str()) {
                    writeln!(out, "      {}", entity).ok();
                }
            }
        }
        Ok(out)
    }

    fn format_opportunities(&self, opportunities: &[KeyOpportunity]) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "\nKey opportunities ({})", opportunities.len()).ok();
        for op in opportunities {
            writeln!(out, "  {}. {} [{:?} impact]", op.priority, op.title, op.impact.level).ok();
            writeln!(out, "     {}", op.impact.description).ok();
            for step in &op.steps {
                let time = step
                    .estimated_time
                    .as_deref()
                    .map(|t| format!(" ({})", t))
                    .unwrap_or_default();
                writeln!(out, "     {}. {}{}", step.order, step.action, time).ok();
                if self.options.verbose_mode {
                    if let Some(details) = &step.details {
                        writeln!(out, "        {}", details).ok();
                    }
                    if let Some(code) = &step.code_example {
                        for line in code.lines() {
                            writeln!(out, "        | {}", line).ok();
                        }
                    }
                }
            }
            if let Some(notes) = &op.framework_notes {
                writeln!(out, "     Framework: {}", notes).ok();
            }
        }
        Ok(out)
    }

    fn format_lcp(&self, lcp: &EnhancedLcpElement) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "\nLCP element").ok();
        writeln!(
            out,
            "  Type: {:?}, loading: {:?}",
            lcp.element_type, lcp.loading_mechanism
        )
        .ok();
        if let Some(url) = &lcp.element.url {
            writeln!(out, "  Resource: {}", truncate_url(url, URL_MAX_LENGTH)).ok();
        }
        for rec in &lcp.recommendations {
            writeln!(out, "  - {} [{:?} impact, {:?} effort]", rec.title, rec.impact, rec.effort).ok();
        }
        Ok(out)
    }

    fn format_next_steps(&self, steps: &[NextStep]) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "\nNext steps").ok();
        for step in steps {
            writeln!(out, "  {}. {} [{}]", step.order, step.action, urgency_label(step.urgency)).ok();
        }
        Ok(out)
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("ERROR: {}\n", error))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("WARNING: {}\n", warning))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("OK: {}\n", message))
    }
}
