//! Measurement result data models
//!
//! `PerformanceResult` is the typed hand-off between the API client and the
//! analysis pipeline: category scores, Core Web Vitals, the LCP element, and
//! the raw named-audit map the insight extractors read.

use crate::analysis::insights::DetailedInsights;
use crate::models::audit::AuditMap;
use crate::types::{MetricRating, Strategy};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single metric with its raw value, display string, and rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricValue {
    /// Raw value; milliseconds for timing metrics, unitless for CLS
    pub value: f64,
    /// Human-readable form supplied upstream (e.g. "2.5 s")
    pub display_value: String,
    /// Rating derived upstream from the 0-1 audit score
    pub rating: MetricRating,
}

impl MetricValue {
    /// Build a metric from a raw value, display string, and 0-1 score.
    pub fn from_score(value: f64, display_value: impl Into<String>, score: f64) -> Self {
        Self {
            value,
            display_value: display_value.into(),
            rating: MetricRating::from_score(score),
        }
    }
}

/// Core Web Vitals and supporting lab metrics for one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreWebVitals {
    /// Largest Contentful Paint (ms)
    pub lcp: MetricValue,
    /// First Contentful Paint (ms)
    pub fcp: MetricValue,
    /// Cumulative Layout Shift (unitless)
    pub cls: MetricValue,
    /// Total Blocking Time (ms)
    pub tbt: MetricValue,
    /// Speed Index (ms)
    pub speed_index: MetricValue,
    /// Time To First Byte (ms), absent when the server-response-time audit
    /// did not run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttfb: Option<MetricValue>,
}

/// Category scores on the 0-100 scale, `None` when a category was not run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScores {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_practices: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<u32>,
}

/// The page element Lighthouse identified as the LCP candidate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LcpElement {
    /// Lowercased tag name (e.g. "img", "div")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Resource URL when the element loads one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Outer-HTML snippet of the element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    /// CSS selector path reported upstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    /// Human label (alt text, truncated text content)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_label: Option<String>,
}

/// Field data (CrUX) pass-through, when the API returned any
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_category: Option<String>,
    /// Raw per-metric percentile records, kept loosely typed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Value>,
}

/// Complete result of one measurement run against one URL/strategy pair
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceResult {
    /// Final URL that was analyzed (after redirects)
    pub url: String,
    /// Strategy the API simulated
    pub strategy: Strategy,
    /// When the measurement was taken
    pub timestamp: DateTime<Utc>,
    /// Category scores (0-100)
    pub scores: CategoryScores,
    /// Lab Core Web Vitals
    pub metrics: CoreWebVitals,
    /// LCP element details, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lcp_element: Option<LcpElement>,
    /// Raw opportunity audit ids flagged upstream (pass-through)
    #[serde(default)]
    pub opportunities: Vec<String>,
    /// Raw diagnostic audit ids flagged upstream (pass-through)
    #[serde(default)]
    pub diagnostics: Vec<String>,
    /// Normalized detailed insights, populated by the aggregator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<DetailedInsights>,
    /// CrUX field data, when available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_data: Option<FieldData>,
    /// Named-audit map retained for the analysis pipeline
    #[serde(default, skip_serializing_if = "AuditMap::is_empty")]
    pub raw_audits: AuditMap,
}

impl PerformanceResult {
    /// Host domain of the analyzed URL, empty string when unparseable.
    /// First-party classification in the extractors keys off this.
    pub fn host_domain(&self) -> String {
        crate::analysis::entity::host_domain(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_value_from_score() {
        let m = MetricValue::from_score(2400.0, "2.4 s", 0.92);
        assert_eq!(m.rating, MetricRating::Good);
        assert_eq!(m.display_value, "2.4 s");
    }

    #[test]
    fn test_metric_value_serializes_camel_case() {
        let m = MetricValue::from_score(4500.0, "4.5 s", 0.2);
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["displayValue"], "4.5 s");
        assert_eq!(json["rating"], "poor");
    }

    #[test]
    fn test_lcp_element_tolerates_missing_fields() {
        let el: LcpElement = serde_json::from_str("{}").unwrap();
        assert!(el.tag.is_none());
        assert!(el.url.is_none());
    }
}
