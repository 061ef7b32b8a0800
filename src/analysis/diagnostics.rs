//! Diagnostics table builder
//!
//! Maps `DetailedInsights` into a severity-ranked, UI-ready list with one
//! entry per issue category that has data. Categories are checked in a
//! fixed order (unused JS, unused CSS, long tasks, render-blocking, third
//! parties, cache, images, legacy JS); the final table is sorted by
//! severity rank with ties left in that insertion order.

use crate::analysis::format::{calculate_score, format_bytes, severity_by_bytes, severity_by_time};
use crate::analysis::insights::DetailedInsights;
use crate::types::Severity;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Broad grouping used by report UIs to cluster diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Javascript,
    Resource,
    Network,
    Rendering,
    Performance,
}

/// Estimated savings attached to a diagnostic
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Savings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
}

/// One row of the diagnostics table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticItem {
    pub id: String,
    pub title: String,
    /// Human summary line ("Potential savings of 240 KiB")
    pub display_value: String,
    /// Normalized 0-1 score, `None` for purely informational rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings: Option<Savings>,
    /// Up to [`MAX_DIAGNOSTIC_ITEMS`] serialized issue records, in the
    /// extractor's descending-magnitude order (so "first 10" = largest 10)
    pub items: Vec<Value>,
    pub category: DiagnosticCategory,
}

/// Cap on serialized issue records per diagnostic row
pub const MAX_DIAGNOSTIC_ITEMS: usize = 10;

fn serialize_items<T: Serialize>(items: &[T]) -> Vec<Value> {
    items
        .iter()
        .take(MAX_DIAGNOSTIC_ITEMS)
        .filter_map(|item| serde_json::to_value(item).ok())
        .collect()
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Build the severity-ranked diagnostics table.
pub fn build_diagnostics_table(insights: &DetailedInsights) -> Vec<DiagnosticItem> {
    let mut table: Vec<DiagnosticItem> = Vec::new();

    if !insights.unused_javascript.is_empty() {
        let waste = insights.unused_js_waste();
        table.push(DiagnosticItem {
            id: "unused-javascript".to_string(),
            title: "Reduce unused JavaScript".to_string(),
            display_value: format!("Potential savings of {}", format_bytes(waste)),
            score: Some(calculate_score(waste as f64, 150_000.0, 500_000.0)),
            severity: severity_by_bytes(waste),
            savings: Some(Savings { time_ms: None, bytes: Some(waste) }),
            items: serialize_items(&insights.unused_javascript),
            category: DiagnosticCategory::Javascript,
        });
    }

    if !insights.unused_css.is_empty() {
        let waste: u64 = insights.unused_css.iter().map(|i| i.wasted_bytes).sum();
        table.push(DiagnosticItem {
            id: "unused-css-rules".to_string(),
            title: "Reduce unused CSS".to_string(),
            display_value: format!("Potential savings of {}", format_bytes(waste)),
            score: Some(calculate_score(waste as f64, 50_000.0, 200_000.0)),
            severity: severity_by_bytes(waste),
            savings: Some(Savings { time_ms: None, bytes: Some(waste) }),
            items: serialize_items(&insights.unused_css),
            category: DiagnosticCategory::Resource,
        });
    }

    if !insights.long_tasks.is_empty() {
        let count = insights.long_tasks.len();
        // Count-based bands, exclusive bounds per the scoring contract
        let severity = if count > 5 {
            Severity::Critical
        } else if count > 3 {
            Severity::Serious
        } else if count > 1 {
            Severity::Moderate
        } else {
            Severity::Minor
        };
        table.push(DiagnosticItem {
            id: "long-tasks".to_string(),
            title: "Avoid long main-thread tasks".to_string(),
            display_value: format!("{} found", plural(count, "long task", "long tasks")),
            score: Some(calculate_score(count as f64, 2.0, 5.0)),
            severity,
            savings: None,
            items: serialize_items(&insights.long_tasks),
            category: DiagnosticCategory::Performance,
        });
    }

    if !insights.render_blocking.is_empty() {
        let wasted = insights.render_blocking_waste();
        let count = insights.render_blocking.len();
        table.push(DiagnosticItem {
            id: "render-blocking-resources".to_string(),
            title: "Eliminate render-blocking resources".to_string(),
            display_value: format!(
                "{} found",
                plural(count, "render-blocking resource", "render-blocking resources")
            ),
            score: Some(calculate_score(wasted, 500.0, 1500.0)),
            severity: severity_by_time(wasted),
            savings: Some(Savings { time_ms: Some(wasted), bytes: None }),
            items: serialize_items(&insights.render_blocking),
            category: DiagnosticCategory::Rendering,
        });
    }

    if !insights.third_parties.is_empty() {
        let blocking = insights.third_party_blocking();
        let count = insights.third_parties.len();
        // Exclusive bands; presence alone is at least moderate
        let severity = if blocking > 1000.0 {
            Severity::Critical
        } else if blocking > 500.0 {
            Severity::Serious
        } else {
            Severity::Moderate
        };
        table.push(DiagnosticItem {
            id: "third-party-summary".to_string(),
            title: "Reduce third-party impact".to_string(),
            display_value: format!("{} found", plural(count, "third party", "third parties")),
            score: Some(calculate_score(blocking, 250.0, 1000.0)),
            severity,
            savings: Some(Savings { time_ms: Some(blocking), bytes: None }),
            items: serialize_items(&insights.third_parties),
            category: DiagnosticCategory::Network,
        });
    }

    if !insights.cache_issues.is_empty() {
        let waste: u64 = insights.cache_issues.iter().map(|i| i.wasted_bytes).sum();
        let count = insights.cache_issues.len();
        table.push(DiagnosticItem {
            id: "cache-policy".to_string(),
            title: "Serve static assets with an efficient cache policy".to_string(),
            display_value: format!(
                "{} with an inefficient cache policy",
                plural(count, "resource", "resources")
            ),
            score: Some(calculate_score(waste as f64, 100_000.0, 500_000.0)),
            severity: severity_by_bytes(waste),
            savings: Some(Savings { time_ms: None, bytes: Some(waste) }),
            items: serialize_items(&insights.cache_issues),
            category: DiagnosticCategory::Network,
        });
    }

    if !insights.image_issues.is_empty() {
        let waste = insights.image_waste();
        table.push(DiagnosticItem {
            id: "image-optimization".to_string(),
            title: "Optimize images".to_string(),
            display_value: format!("Potential savings of {}", format_bytes(waste)),
            score: Some(calculate_score(waste as f64, 100_000.0, 500_000.0)),
            severity: severity_by_bytes(waste),
            savings: Some(Savings { time_ms: None, bytes: Some(waste) }),
            items: serialize_items(&insights.image_issues),
            category: DiagnosticCategory::Resource,
        });
    }

    if !insights.legacy_javascript.is_empty() {
        let waste: u64 = insights.legacy_javascript.iter().map(|i| i.wasted_bytes).sum();
        table.push(DiagnosticItem {
            id: "legacy-javascript".to_string(),
            title: "Avoid serving legacy JavaScript to modern browsers".to_string(),
            display_value: format!("Potential savings of {}", format_bytes(waste)),
            score: Some(calculate_score(waste as f64, 30_000.0, 100_000.0)),
            severity: severity_by_bytes(waste),
            savings: Some(Savings { time_ms: None, bytes: Some(waste) }),
            items: serialize_items(&insights.legacy_javascript),
            category: DiagnosticCategory::Javascript,
        });
    }

    // Stable sort keeps insertion order among equal severities
    table.sort_by_key(|item| item.severity.rank());
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::entity::ThirdPartyCategory;
    use crate::analysis::insights::{LongTask, ThirdPartyIssue, UnusedCodeIssue};

    fn unused_issue(url: &str, wasted: u64) -> UnusedCodeIssue {
        UnusedCodeIssue {
            url: url.to_string(),
            wasted_bytes: wasted,
            total_bytes: wasted * 2,
            wasted_percent: 50,
            entity: None,
            is_first_party: true,
        }
    }

    fn third_party(entity: &str, blocking: f64) -> ThirdPartyIssue {
        ThirdPartyIssue {
            entity: entity.to_string(),
            category: ThirdPartyCategory::Other,
            blocking_time: blocking,
            main_thread_time: blocking * 1.5,
            transfer_size: 10_000,
            request_count: 1,
            urls: vec![],
        }
    }

    #[test]
    fn test_empty_insights_empty_table() {
        assert!(build_diagnostics_table(&DetailedInsights::default()).is_empty());
    }

    #[test]
    fn test_table_sorted_by_severity_rank() {
        let insights = DetailedInsights {
            // 40k waste: minor
            unused_javascript: vec![unused_issue("https://example.com/a.js", 40_000)],
            // 1500ms blocking: critical
            third_parties: vec![third_party("Widget Vendor", 1500.0)],
            // 2 long tasks: moderate
            long_tasks: vec![
                LongTask { duration: 120.0, start_time: 0.0, url: None, attribution: None },
                LongTask { duration: 90.0, start_time: 500.0, url: None, attribution: None },
            ],
            ..DetailedInsights::default()
        };

        let table = build_diagnostics_table(&insights);
        assert_eq!(table.len(), 3);
        assert_eq!(table[0].id, "third-party-summary");
        assert_eq!(table[0].severity, Severity::Critical);
        assert_eq!(table[1].id, "long-tasks");
        assert_eq!(table[2].id, "unused-javascript");
    }

    #[test]
    fn test_third_party_critical_band_boundary() {
        // Exactly 1000 ms is serious, not critical
        let insights = DetailedInsights {
            third_parties: vec![third_party("Vendor", 1000.0)],
            ..DetailedInsights::default()
        };
        let table = build_diagnostics_table(&insights);
        assert_eq!(table[0].severity, Severity::Serious);
    }

    #[test]
    fn test_long_task_display_grammar() {
        let one = DetailedInsights {
            long_tasks: vec![LongTask { duration: 60.0, start_time: 0.0, url: None, attribution: None }],
            ..DetailedInsights::default()
        };
        let table = build_diagnostics_table(&one);
        assert_eq!(table[0].display_value, "1 long task found");

        let three = DetailedInsights {
            long_tasks: vec![
                LongTask { duration: 60.0, start_time: 0.0, url: None, attribution: None },
                LongTask { duration: 70.0, start_time: 0.0, url: None, attribution: None },
                LongTask { duration: 80.0, start_time: 0.0, url: None, attribution: None },
            ],
            ..DetailedInsights::default()
        };
        let table = build_diagnostics_table(&three);
        assert_eq!(table[0].display_value, "3 long tasks found");
    }

    #[test]
    fn test_items_capped_at_ten() {
        let issues: Vec<UnusedCodeIssue> = (0..15)
            .map(|i| unused_issue(&format!("https://example.com/{i}.js"), 10_000))
            .collect();
        let insights = DetailedInsights { unused_javascript: issues, ..DetailedInsights::default() };

        let table = build_diagnostics_table(&insights);
        assert_eq!(table[0].items.len(), MAX_DIAGNOSTIC_ITEMS);
    }

    #[test]
    fn test_score_interpolation_for_unused_js() {
        // 325k sits halfway between 150k and 500k
        let insights = DetailedInsights {
            unused_javascript: vec![unused_issue("https://example.com/a.js", 325_000)],
            ..DetailedInsights::default()
        };
        let table = build_diagnostics_table(&insights);
        assert_eq!(table[0].score, Some(0.5));
        assert_eq!(table[0].severity, Severity::Serious);
    }
}
