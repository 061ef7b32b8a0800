//! Normalized insight records and the aggregate insight container
//!
//! Every record here is produced by one extractor in
//! [`crate::analysis::extractors`] and carries the sort contract described
//! there: arrays arrive sorted descending by their primary magnitude field
//! and consumers may rely on that ordering.

use crate::analysis::entity::ThirdPartyCategory;
use crate::analysis::extractors;
use crate::models::audit::AuditMap;
use serde::{Deserialize, Serialize};

/// A resource served with an inefficient cache policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheIssue {
    pub url: String,
    /// Configured cache lifetime in milliseconds
    #[serde(rename = "cacheTTL")]
    pub cache_ttl: u64,
    /// Human form of the TTL ("No cache", "5m", "1d")
    #[serde(rename = "cacheTTLDisplay")]
    pub cache_ttl_display: String,
    pub transfer_size: u64,
    pub wasted_bytes: u64,
    /// Recognized entity serving the resource, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
}

/// What kind of image problem an [`ImageIssue`] describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageIssueKind {
    /// Legacy format; modern formats would be smaller
    Format,
    /// Served larger than its displayed size
    Oversized,
    /// Loaded eagerly while outside the viewport
    Offscreen,
    /// Under-compressed
    Unoptimized,
}

/// A single problematic image resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageIssue {
    pub url: String,
    #[serde(rename = "issueType")]
    pub kind: ImageIssueKind,
    pub wasted_bytes: u64,
    pub total_bytes: u64,
    /// Fixed remediation string for this issue kind
    pub recommendation: String,
}

/// A script or stylesheet shipping unused code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnusedCodeIssue {
    pub url: String,
    pub wasted_bytes: u64,
    pub total_bytes: u64,
    /// Whole-number percentage of the transfer that goes unused
    pub wasted_percent: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    pub is_first_party: bool,
}

/// A bundle serving polyfills modern browsers no longer need
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyJsIssue {
    pub url: String,
    pub wasted_bytes: u64,
    pub total_bytes: u64,
    /// Polyfill/transform signals detected inside the bundle
    #[serde(default)]
    pub polyfills: Vec<String>,
}

/// Aggregated impact of one third-party entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThirdPartyIssue {
    pub entity: String,
    pub category: ThirdPartyCategory,
    /// Main-thread blocking attributable to this entity (ms)
    pub blocking_time: f64,
    /// Total main-thread time (ms)
    pub main_thread_time: f64,
    pub transfer_size: u64,
    pub request_count: usize,
    /// Individual request URLs, when the audit reported them
    #[serde(default)]
    pub urls: Vec<String>,
}

/// A main-thread task exceeding the 50 ms long-task threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongTask {
    /// Task duration (ms)
    pub duration: f64,
    /// Start offset from navigation (ms)
    pub start_time: f64,
    /// Attributed script URL, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Upstream attribution label, passed through as reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
}

/// Classified type of a render-blocking resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Script,
    Stylesheet,
    Other,
}

/// A resource that delays first paint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderBlockingResource {
    pub url: String,
    /// Estimated paint delay this resource causes (ms)
    pub wasted_ms: f64,
    pub total_bytes: u64,
    pub resource_type: ResourceType,
}

/// Phase breakdown of the LCP timing
///
/// When the API does not report a true breakdown this is approximated
/// from TTFB/FCP/LCP; see the extractor for the allocation heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LcpBreakdown {
    /// Server response time (ms)
    pub ttfb: u64,
    /// Delay before the LCP resource starts loading (ms)
    pub resource_load_delay: u64,
    /// Time spent loading the LCP resource (ms)
    pub resource_load_duration: u64,
    /// Remaining delay until the element renders (ms)
    pub element_render_delay: u64,
}

/// Cross-cutting savings totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalSavings {
    /// Sum of render-blocking wasted milliseconds. Long-task and
    /// third-party blocking time are deliberately excluded from this
    /// total; several consumers depend on that exact definition.
    pub time_ms: f64,
    /// Sum of wasted bytes across unused JS, unused CSS, cache issues,
    /// and image issues. Legacy-JS and third-party bytes are reported
    /// separately and excluded here.
    pub size_bytes: u64,
}

/// Every normalized insight extracted from one audit response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedInsights {
    #[serde(default)]
    pub cache_issues: Vec<CacheIssue>,
    #[serde(default)]
    pub image_issues: Vec<ImageIssue>,
    #[serde(default)]
    pub unused_javascript: Vec<UnusedCodeIssue>,
    #[serde(default)]
    pub unused_css: Vec<UnusedCodeIssue>,
    #[serde(default)]
    pub legacy_javascript: Vec<LegacyJsIssue>,
    #[serde(default)]
    pub third_parties: Vec<ThirdPartyIssue>,
    #[serde(default)]
    pub long_tasks: Vec<LongTask>,
    #[serde(default)]
    pub render_blocking: Vec<RenderBlockingResource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lcp_breakdown: Option<LcpBreakdown>,
    #[serde(default)]
    pub total_savings: TotalSavings,
}

impl DetailedInsights {
    /// Summed wasted bytes across the unused-JS insight array.
    pub fn unused_js_waste(&self) -> u64 {
        self.unused_javascript.iter().map(|i| i.wasted_bytes).sum()
    }

    /// Summed wasted bytes across the image insight array.
    pub fn image_waste(&self) -> u64 {
        self.image_issues.iter().map(|i| i.wasted_bytes).sum()
    }

    /// Summed third-party blocking time (ms).
    pub fn third_party_blocking(&self) -> f64 {
        self.third_parties.iter().map(|t| t.blocking_time).sum()
    }

    /// Summed render-blocking wasted time (ms).
    pub fn render_blocking_waste(&self) -> f64 {
        self.render_blocking.iter().map(|r| r.wasted_ms).sum()
    }
}

/// Run every extractor over the named-audit map and compute the savings
/// totals. Pure; an empty audit map yields an empty (but valid) result.
pub fn extract_detailed_insights(audits: &AuditMap, host_domain: &str) -> DetailedInsights {
    let cache_issues = extractors::extract_cache_issues(audits);
    let image_issues = extractors::extract_image_issues(audits);
    let unused_javascript = extractors::extract_unused_code(audits, "unused-javascript", host_domain);
    let unused_css = extractors::extract_unused_code(audits, "unused-css-rules", host_domain);
    let legacy_javascript = extractors::extract_legacy_javascript(audits);
    let third_parties = extractors::extract_third_parties(audits);
    let long_tasks = extractors::extract_long_tasks(audits);
    let render_blocking = extractors::extract_render_blocking(audits);
    let lcp_breakdown = extractors::extract_lcp_breakdown(audits);

    // Order-independent summation; the arrays are already sorted but the
    // totals must not depend on that.
    let size_bytes = unused_javascript.iter().map(|i| i.wasted_bytes).sum::<u64>()
        + unused_css.iter().map(|i| i.wasted_bytes).sum::<u64>()
        + cache_issues.iter().map(|i| i.wasted_bytes).sum::<u64>()
        + image_issues.iter().map(|i| i.wasted_bytes).sum::<u64>();
    let time_ms = render_blocking.iter().map(|r| r.wasted_ms).sum::<f64>();

    DetailedInsights {
        cache_issues,
        image_issues,
        unused_javascript,
        unused_css,
        legacy_javascript,
        third_parties,
        long_tasks,
        render_blocking,
        lcp_breakdown,
        total_savings: TotalSavings { time_ms, size_bytes },
    }
}
