//! Colored formatter implementation with terminal color support

use crate::{
    analysis::diagnostics::DiagnosticItem,
    analysis::format::{format_bytes, truncate_url, URL_MAX_LENGTH},
    analysis::lcp::EnhancedLcpElement,
    analysis::opportunities::KeyOpportunity,
    analysis::report::{NextStep, ReportSummary},
    error::Result,
    models::result::{CoreWebVitals, MetricValue, PerformanceResult},
    output::formatter::{health_label, urgency_label, FormattingOptions, OutputFormatter},
    types::{HealthStatus, ImpactLevel, MetricRating, Severity},
};
use colored::*;
use std::fmt::Write as _;

/// Color mapping for ratings, severities, and impact levels
#[derive(Debug, Clone)]
pub struct ColorScheme;

impl ColorScheme {
    pub fn rating_color(rating: MetricRating) -> Color {
        match rating {
            MetricRating::Good => Color::Green,
            MetricRating::NeedsImprovement => Color::Yellow,
            MetricRating::Poor => Color::Red,
        }
    }

    pub fn severity_color(severity: Severity) -> Color {
        match severity {
            Severity::Critical => Color::Red,
            Severity::Serious => Color::Magenta,
            Severity::Moderate => Color::Yellow,
            Severity::Minor => Color::Cyan,
        }
    }

    pub fn impact_color(level: ImpactLevel) -> Color {
        match level {
            ImpactLevel::Critical => Color::Red,
            ImpactLevel::High => Color::Magenta,
            ImpactLevel::Medium => Color::Yellow,
            ImpactLevel::Low => Color::Cyan,
        }
    }

    pub fn health_color(status: HealthStatus) -> Color {
        match status {
            HealthStatus::Healthy => Color::Green,
            HealthStatus::NeedsAttention => Color::Yellow,
            HealthStatus::Critical => Color::Red,
        }
    }
}

/// Rich formatter using ANSI colors
pub struct ColoredFormatter {
    options: FormattingOptions,
}

impl ColoredFormatter {
    /// Create a new colored formatter
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    fn metric_line(&self, name: &str, metric: &MetricValue) -> String {
        let rating = format!("{:?}", metric.rating);
        format!(
            "  {:<14} {:>10}   {}\n",
            name,
            metric.display_value,
            rating.color(ColorScheme::rating_color(metric.rating))
        )
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let line = "═".repeat(title.chars().count().min(self.options.max_width));
        Ok(format!("\n{}\n{}\n", title.bold(), line.dimmed()))
    }

    fn format_summary(&self, summary: &ReportSummary, result: &PerformanceResult) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "\n{}", "Summary".bold()).ok();
        match result.scores.performance {
            Some(score) => {
                let rendered = format!("{}/100", score);
                let colored_score = match score {
                    s if s >= 90 => rendered.green(),
                    s if s >= 50 => rendered.yellow(),
                    _ => rendered.red(),
                };
                writeln!(out, "  Performance score: {}", colored_score.bold()).ok();
            }
            None => {
                writeln!(out, "  Performance score: {}", "not available".dimmed()).ok();
            }
        }
        writeln!(
            out,
            "  Health: {}",
            health_label(summary.health_status)
                .color(ColorScheme::health_color(summary.health_status))
                .bold()
        )
        .ok();
        writeln!(out, "  Quick wins available: {}", summary.quick_wins_count).ok();
        writeln!(
            out,
            "  Potential savings: {} and {} ms",
            format_bytes(summary.potential_savings.size_bytes).cyan(),
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
        writeln!(out, "\n{}", "Core Web Vitals".bold()).ok();
        out.push_str(&self.metric_line("LCP", &metrics.lcp));
        out.push_str(&self.metric_line("FCP", &metrics.fcp));
        out.push_str(&self.metric_line("CLS", &metrics.cls));
        out.push_str(&self.metric_line("TBT", &metrics.tbt));
        out.push_str(&self.metric_line("Speed Index", &metrics.speed_index));
        if let Some(ttfb) = &metrics.ttfb {
            out.push_str(&self.metric_line("TTFB", ttfb));
        }
        Ok(out)
    }

    fn format_diagnostics(&self, diagnostics: &[DiagnosticItem]) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "\n{} ({} issue categories)", "Diagnostics".bold(), diagnostics.len()).ok();
        for item in diagnostics {
            let severity = format!("{:?}", item.severity);
            writeln!(
                out,
                "  [{}] {} - {}",
                severity.color(ColorScheme::severity_color(item.severity)).bold(),
                item.title,
                item.display_value
            )
            .ok();
            for entry in item.items.iter().take(self.options.max_items_shown) {
                if let Some(url) = entry.get("url").and_then(|v| v.as_str()) {
                    writeln!(out, "      {}", truncate_url(url, URL_MAX_LENGTH).dimmed()).ok();
                } else if let Some(entity) = entry.get("entity").and_then(|v| v.as_str()) {
                    writeln!(out, "      {}", entity.dimmed()).ok();
                }
            }
        }
        Ok(out)
    }

    fn format_opportunities(&self, opportunities: &[KeyOpportunity]) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "\n{} ({})", "Key opportunities".bold(), opportunities.len()).ok();
        for op in opportunities {
            let impact = format!("{:?} impact", op.impact.level);
            writeln!(
                out,
                "  {}. {} [{}]",
                op.priority,
                op.title.bold(),
                impact.color(ColorScheme::impact_color(op.impact.level))
            )
            .ok();
            writeln!(out, "     {}", op.impact.description.dimmed()).ok();
            for step in &op.steps {
                let time = step
                    .estimated_time
                    .as_deref()
                    .map(|t| format!(" ({})", t))
                    .unwrap_or_default();
                writeln!(out, "     {}. {}{}", step.order, step.action, time.dimmed()).ok();
                if self.options.verbose_mode {
                    if let Some(details) = &step.details {
                        writeln!(out, "        {}", details.dimmed()).ok();
                    }
                    if let Some(code) = &step.code_example {
                        for line in code.lines() {
                            writeln!(out, "        {} {}", "|".dimmed(), line.cyan()).ok();
                        }
                    }
                }
            }
            if let Some(notes) = &op.framework_notes {
                writeln!(out, "     {} {}", "Framework:".blue().bold(), notes).ok();
            }
        }
        Ok(out)
    }

    fn format_lcp(&self, lcp: &EnhancedLcpElement) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "\n{}", "LCP element".bold()).ok();
        writeln!(
            out,
            "  Type: {:?}, loading: {:?}",
            lcp.element_type, lcp.loading_mechanism
        )
        .ok();
        if let Some(url) = &lcp.element.url {
            writeln!(out, "  Resource: {}", truncate_url(url, URL_MAX_LENGTH).dimmed()).ok();
        }
        for rec in &lcp.recommendations {
            let impact = format!("{:?} impact", rec.impact);
            writeln!(
                out,
                "  - {} [{}, {:?} effort]",
                rec.title,
                impact.color(ColorScheme::impact_color(rec.impact)),
                rec.effort
            )
            .ok();
        }
        Ok(out)
    }

    fn format_next_steps(&self, steps: &[NextStep]) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "\n{}", "Next steps".bold()).ok();
        for step in steps {
            writeln!(
                out,
                "  {}. {} [{}]",
                step.order,
                step.action,
                urgency_label(step.urgency).italic()
            )
            .ok();
        }
        Ok(out)
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("{} {}\n", "ERROR:".red().bold(), error))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("{} {}\n", "WARNING:".yellow().bold(), warning))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("{} {}\n", "OK:".green().bold(), message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_colors_distinct_by_rank() {
        assert_eq!(ColorScheme::severity_color(Severity::Critical), Color::Red);
        assert_ne!(
            ColorScheme::severity_color(Severity::Critical),
            ColorScheme::severity_color(Severity::Minor)
        );
    }

    #[test]
    fn test_header_contains_title() {
        let formatter = ColoredFormatter::new(FormattingOptions::default());
        let header = formatter.format_header("Report").unwrap();
        assert!(header.contains("Report"));
    }
}
