//! Insight extraction routines, one per audit category
//!
//! Shared contract: an absent audit or an audit without items produces an
//! empty vector, never an error. Item rows missing their required `url`
//! field are skipped. Output arrays are sorted descending by their primary
//! magnitude field before being returned; downstream consumers rely on
//! that ordering without re-sorting.

use crate::analysis::entity::{categorize_third_party, extract_entity_from_url, is_first_party};
use crate::analysis::format::format_cache_ttl;
use crate::analysis::insights::{
    CacheIssue, ImageIssue, ImageIssueKind, LcpBreakdown, LegacyJsIssue, LongTask,
    RenderBlockingResource, ResourceType, ThirdPartyIssue, UnusedCodeIssue,
};
use crate::models::audit::{audit_items, audit_numeric, item_bytes, item_ms, item_str, sub_items, AuditMap};
use serde_json::Value;
use std::collections::HashSet;

/// Share of the post-FCP window attributed to resource loading when the
/// API provides no true LCP phase breakdown. A fixed allocation, not a
/// measurement.
pub const LCP_LOAD_DURATION_RATIO: f64 = 0.6;

/// Image audits in processing order, with the fixed remediation string
/// attached to each. A URL reported by an earlier audit is not
/// reprocessed by a later one: first occurrence wins.
const IMAGE_AUDITS: &[(&str, ImageIssueKind, &str)] = &[
    ("modern-image-formats", ImageIssueKind::Format, "Convert to WebP or AVIF format"),
    ("uses-responsive-images", ImageIssueKind::Oversized, "Serve appropriately sized images"),
    ("offscreen-images", ImageIssueKind::Offscreen, "Lazy load images below the fold"),
    ("uses-optimized-images", ImageIssueKind::Unoptimized, "Compress image files"),
];

/// Resources served with short or missing cache lifetimes.
pub fn extract_cache_issues(audits: &AuditMap) -> Vec<CacheIssue> {
    let mut issues: Vec<CacheIssue> = audit_items(audits, "uses-long-cache-ttl")
        .iter()
        .filter_map(|item| {
            let url = item_str(item, "url")?;
            let cache_ttl = item_bytes(item, "cacheLifetimeMs");
            Some(CacheIssue {
                url: url.to_string(),
                cache_ttl,
                cache_ttl_display: format_cache_ttl(cache_ttl),
                transfer_size: item_bytes(item, "transferSize"),
                wasted_bytes: item_bytes(item, "wastedBytes"),
                entity: extract_entity_from_url(url).map(str::to_string),
            })
        })
        .collect();

    issues.sort_by(|a, b| b.wasted_bytes.cmp(&a.wasted_bytes));
    issues
}

/// Union of the four image audits, deduplicated by URL.
pub fn extract_image_issues(audits: &AuditMap) -> Vec<ImageIssue> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut issues: Vec<ImageIssue> = Vec::new();

    for (audit_id, kind, recommendation) in IMAGE_AUDITS {
        for item in audit_items(audits, audit_id) {
            let Some(url) = item_str(item, "url") else { continue };
            if !seen.insert(url.to_string()) {
                continue;
            }
            issues.push(ImageIssue {
                url: url.to_string(),
                kind: *kind,
                wasted_bytes: item_bytes(item, "wastedBytes"),
                total_bytes: item_bytes(item, "totalBytes"),
                recommendation: (*recommendation).to_string(),
            });
        }
    }

    issues.sort_by(|a, b| b.wasted_bytes.cmp(&a.wasted_bytes));
    issues
}

/// Unused-code issues for one of the two code audits
/// (`unused-javascript` or `unused-css-rules`).
pub fn extract_unused_code(audits: &AuditMap, audit_id: &str, host_domain: &str) -> Vec<UnusedCodeIssue> {
    let mut issues: Vec<UnusedCodeIssue> = audit_items(audits, audit_id)
        .iter()
        .filter_map(|item| {
            let url = item_str(item, "url")?;
            let wasted_bytes = item_bytes(item, "wastedBytes");
            let total_bytes = item_bytes(item, "totalBytes");
            let wasted_percent = if total_bytes == 0 {
                0
            } else {
                ((wasted_bytes as f64 / total_bytes as f64) * 100.0).round() as u32
            };
            Some(UnusedCodeIssue {
                url: url.to_string(),
                wasted_bytes,
                total_bytes,
                wasted_percent,
                entity: extract_entity_from_url(url).map(str::to_string),
                is_first_party: is_first_party(url, host_domain),
            })
        })
        .collect();

    issues.sort_by(|a, b| b.wasted_bytes.cmp(&a.wasted_bytes));
    issues
}

/// Bundles still shipping legacy polyfills and transforms.
pub fn extract_legacy_javascript(audits: &AuditMap) -> Vec<LegacyJsIssue> {
    let mut issues: Vec<LegacyJsIssue> = audit_items(audits, "legacy-javascript")
        .iter()
        .filter_map(|item| {
            let url = item_str(item, "url")?;
            let polyfills = sub_items(item)
                .iter()
                .filter_map(|sub| item_str(sub, "signal").map(str::to_string))
                .collect();
            Some(LegacyJsIssue {
                url: url.to_string(),
                wasted_bytes: item_bytes(item, "wastedBytes"),
                total_bytes: item_bytes(item, "totalBytes"),
                polyfills,
            })
        })
        .collect();

    issues.sort_by(|a, b| b.wasted_bytes.cmp(&a.wasted_bytes));
    issues
}

/// Entity name of a third-party summary row. Upstream emits either a bare
/// string or an object with a `text` field.
fn third_party_entity(item: &Value) -> String {
    match item.get("entity") {
        Some(Value::String(name)) => name.clone(),
        Some(other) => other
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_string(),
        None => "Unknown".to_string(),
    }
}

/// Third-party entities and their main-thread cost.
pub fn extract_third_parties(audits: &AuditMap) -> Vec<ThirdPartyIssue> {
    let mut issues: Vec<ThirdPartyIssue> = audit_items(audits, "third-party-summary")
        .iter()
        .map(|item| {
            let entity = third_party_entity(item);
            let urls: Vec<String> = sub_items(item)
                .iter()
                .filter_map(|sub| item_str(sub, "url").map(str::to_string))
                .collect();
            ThirdPartyIssue {
                category: categorize_third_party(&entity),
                entity,
                blocking_time: item_ms(item, "blockingTime"),
                main_thread_time: item_ms(item, "mainThreadTime"),
                transfer_size: item_bytes(item, "transferSize"),
                request_count: urls.len(),
                urls,
            }
        })
        .collect();

    issues.sort_by(|a, b| {
        b.blocking_time
            .partial_cmp(&a.blocking_time)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    issues
}

/// Main-thread long tasks, passed through as reported.
pub fn extract_long_tasks(audits: &AuditMap) -> Vec<LongTask> {
    let mut tasks: Vec<LongTask> = audit_items(audits, "long-tasks")
        .iter()
        .map(|item| LongTask {
            duration: item_ms(item, "duration"),
            start_time: item_ms(item, "startTime"),
            url: item_str(item, "url").map(str::to_string),
            attribution: item_str(item, "attribution").map(str::to_string),
        })
        .collect();

    tasks.sort_by(|a, b| {
        b.duration
            .partial_cmp(&a.duration)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    tasks
}

/// Classify a render-blocking resource by its URL. The substring check
/// mirrors upstream behavior; a URL like `data.json` therefore counts as
/// a script, which is preserved for compatibility.
fn classify_resource(url: &str) -> ResourceType {
    if url.contains(".js") {
        ResourceType::Script
    } else if url.contains(".css") {
        ResourceType::Stylesheet
    } else {
        ResourceType::Other
    }
}

/// Resources delaying first paint.
pub fn extract_render_blocking(audits: &AuditMap) -> Vec<RenderBlockingResource> {
    let mut resources: Vec<RenderBlockingResource> = audit_items(audits, "render-blocking-resources")
        .iter()
        .filter_map(|item| {
            let url = item_str(item, "url")?;
            Some(RenderBlockingResource {
                url: url.to_string(),
                wasted_ms: item_ms(item, "wastedMs"),
                total_bytes: item_bytes(item, "totalBytes"),
                resource_type: classify_resource(url),
            })
        })
        .collect();

    resources.sort_by(|a, b| {
        b.wasted_ms
            .partial_cmp(&a.wasted_ms)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    resources
}

/// Approximate LCP phase breakdown from TTFB/FCP/LCP.
///
/// Returns `None` when no numeric LCP value exists. The resource-load
/// window is allocated [`LCP_LOAD_DURATION_RATIO`] of the post-FCP time;
/// the render delay absorbs the remainder. All phases are clamped
/// non-negative and rounded to whole milliseconds.
pub fn extract_lcp_breakdown(audits: &AuditMap) -> Option<LcpBreakdown> {
    let lcp = audit_numeric(audits, "largest-contentful-paint")?;
    let fcp = audit_numeric(audits, "first-contentful-paint").unwrap_or(0.0);
    let ttfb = audit_numeric(audits, "server-response-time").unwrap_or(0.0);

    let resource_load_delay = (fcp - ttfb).max(0.0);
    let resource_load_duration = ((lcp - fcp) * LCP_LOAD_DURATION_RATIO).max(0.0);
    let element_render_delay = (lcp - ttfb - resource_load_delay - resource_load_duration).max(0.0);

    Some(LcpBreakdown {
        ttfb: ttfb.round() as u64,
        resource_load_delay: resource_load_delay.round() as u64,
        resource_load_duration: resource_load_duration.round() as u64,
        element_render_delay: element_render_delay.round() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::entity::ThirdPartyCategory;
    use crate::models::audit::Audit;
    use serde_json::json;

    fn table_audit(items: serde_json::Value) -> Audit {
        serde_json::from_value(json!({"details": {"type": "table", "items": items}})).unwrap()
    }

    fn numeric_audit(value: f64) -> Audit {
        serde_json::from_value(json!({"numericValue": value})).unwrap()
    }

    #[test]
    fn test_cache_issues_sorted_and_resolved() {
        let mut audits = AuditMap::new();
        audits.insert(
            "uses-long-cache-ttl".to_string(),
            table_audit(json!([
                {"url": "https://example.com/a.png", "cacheLifetimeMs": 0,
                 "transferSize": 10_000, "wastedBytes": 10_000},
                {"url": "https://fonts.gstatic.com/f.woff2", "cacheLifetimeMs": 3_600_000,
                 "transferSize": 60_000, "wastedBytes": 45_000}
            ])),
        );

        let issues = extract_cache_issues(&audits);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].wasted_bytes, 45_000);
        assert_eq!(issues[0].entity.as_deref(), Some("Google Static"));
        assert_eq!(issues[0].cache_ttl_display, "1h");
        assert_eq!(issues[1].cache_ttl_display, "No cache");
    }

    #[test]
    fn test_cache_issues_skip_urlless_items() {
        let mut audits = AuditMap::new();
        audits.insert(
            "uses-long-cache-ttl".to_string(),
            table_audit(json!([{"wastedBytes": 99_999}])),
        );
        assert!(extract_cache_issues(&audits).is_empty());
    }

    #[test]
    fn test_image_dedup_first_seen_wins() {
        let mut audits = AuditMap::new();
        audits.insert(
            "modern-image-formats".to_string(),
            table_audit(json!([
                {"url": "https://example.com/hero.jpg", "totalBytes": 500_000, "wastedBytes": 300_000}
            ])),
        );
        audits.insert(
            "uses-responsive-images".to_string(),
            table_audit(json!([
                {"url": "https://example.com/hero.jpg", "totalBytes": 500_000, "wastedBytes": 120_000},
                {"url": "https://example.com/banner.png", "totalBytes": 200_000, "wastedBytes": 90_000}
            ])),
        );

        let issues = extract_image_issues(&audits);
        assert_eq!(issues.len(), 2);

        let hero = issues.iter().find(|i| i.url.ends_with("hero.jpg")).unwrap();
        // modern-image-formats processes first, so its figures stick
        assert_eq!(hero.kind, ImageIssueKind::Format);
        assert_eq!(hero.wasted_bytes, 300_000);
        assert_eq!(hero.recommendation, "Convert to WebP or AVIF format");
    }

    #[test]
    fn test_image_issues_sorted_after_merge() {
        let mut audits = AuditMap::new();
        audits.insert(
            "offscreen-images".to_string(),
            table_audit(json!([
                {"url": "https://example.com/small.jpg", "totalBytes": 40_000, "wastedBytes": 30_000}
            ])),
        );
        audits.insert(
            "uses-optimized-images".to_string(),
            table_audit(json!([
                {"url": "https://example.com/big.jpg", "totalBytes": 900_000, "wastedBytes": 700_000}
            ])),
        );

        let issues = extract_image_issues(&audits);
        assert_eq!(issues[0].url, "https://example.com/big.jpg");
        assert_eq!(issues[1].url, "https://example.com/small.jpg");
    }

    #[test]
    fn test_unused_code_percent_and_party() {
        let mut audits = AuditMap::new();
        audits.insert(
            "unused-javascript".to_string(),
            table_audit(json!([
                {"url": "https://example.com/bundle.js", "totalBytes": 200_000, "wastedBytes": 150_000},
                {"url": "https://www.google-analytics.com/analytics.js", "totalBytes": 50_000, "wastedBytes": 30_000},
                {"url": "https://example.com/zero.js", "totalBytes": 0, "wastedBytes": 0}
            ])),
        );

        let issues = extract_unused_code(&audits, "unused-javascript", "example.com");
        assert_eq!(issues.len(), 3);
        assert_eq!(issues[0].wasted_percent, 75);
        assert!(issues[0].is_first_party);
        assert!(issues[0].entity.is_none());

        let ga = issues.iter().find(|i| i.url.contains("google-analytics")).unwrap();
        assert_eq!(ga.entity.as_deref(), Some("Google Analytics"));
        assert!(!ga.is_first_party);

        let zero = issues.iter().find(|i| i.url.contains("zero")).unwrap();
        assert_eq!(zero.wasted_percent, 0);
    }

    #[test]
    fn test_legacy_javascript_signals() {
        let mut audits = AuditMap::new();
        audits.insert(
            "legacy-javascript".to_string(),
            table_audit(json!([
                {"url": "https://example.com/legacy.js", "totalBytes": 80_000, "wastedBytes": 35_000,
                 "subItems": {"items": [
                     {"signal": "Array.prototype.includes"},
                     {"signal": "Object.assign"},
                     {"location": "no signal here"}
                 ]}},
                {"url": "https://example.com/plain.js", "wastedBytes": 5_000}
            ])),
        );

        let issues = extract_legacy_javascript(&audits);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].polyfills, vec!["Array.prototype.includes", "Object.assign"]);
        assert!(issues[1].polyfills.is_empty());
    }

    #[test]
    fn test_third_parties_entity_shapes() {
        let mut audits = AuditMap::new();
        audits.insert(
            "third-party-summary".to_string(),
            table_audit(json!([
                {"entity": "Google Analytics", "blockingTime": 120.0, "mainThreadTime": 300.0,
                 "transferSize": 90_000,
                 "subItems": {"items": [
                     {"url": "https://www.google-analytics.com/analytics.js"},
                     {"url": "https://www.google-analytics.com/collect"}
                 ]}},
                {"entity": {"text": "Facebook", "url": "https://facebook.com"},
                 "blockingTime": 450.0, "mainThreadTime": 600.0, "transferSize": 150_000},
                {"blockingTime": 10.0}
            ])),
        );

        let issues = extract_third_parties(&audits);
        assert_eq!(issues.len(), 3);
        // Sorted by blocking time descending
        assert_eq!(issues[0].entity, "Facebook");
        assert_eq!(issues[0].category, ThirdPartyCategory::Social);
        assert_eq!(issues[1].entity, "Google Analytics");
        assert_eq!(issues[1].request_count, 2);
        assert_eq!(issues[2].entity, "Unknown");
    }

    #[test]
    fn test_long_tasks_sorted_by_duration() {
        let mut audits = AuditMap::new();
        audits.insert(
            "long-tasks".to_string(),
            table_audit(json!([
                {"url": "https://example.com/a.js", "duration": 80.0, "startTime": 1000.0},
                {"url": "https://example.com/b.js", "duration": 240.0, "startTime": 400.0},
                {"duration": 55.0, "startTime": 2500.0}
            ])),
        );

        let tasks = extract_long_tasks(&audits);
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].duration, 240.0);
        assert!(tasks[2].url.is_none());
    }

    #[test]
    fn test_render_blocking_classification() {
        let mut audits = AuditMap::new();
        audits.insert(
            "render-blocking-resources".to_string(),
            table_audit(json!([
                {"url": "https://example.com/styles.css", "wastedMs": 600.0, "totalBytes": 20_000},
                {"url": "https://example.com/vendor.js", "wastedMs": 900.0, "totalBytes": 90_000},
                {"url": "https://example.com/font.woff2", "wastedMs": 150.0, "totalBytes": 30_000}
            ])),
        );

        let resources = extract_render_blocking(&audits);
        assert_eq!(resources[0].resource_type, ResourceType::Script);
        assert_eq!(resources[1].resource_type, ResourceType::Stylesheet);
        assert_eq!(resources[2].resource_type, ResourceType::Other);
        assert_eq!(resources[0].wasted_ms, 900.0);
    }

    #[test]
    fn test_lcp_breakdown_requires_lcp() {
        let mut audits = AuditMap::new();
        audits.insert("first-contentful-paint".to_string(), numeric_audit(1200.0));
        assert!(extract_lcp_breakdown(&audits).is_none());
    }

    #[test]
    fn test_lcp_breakdown_allocation() {
        let mut audits = AuditMap::new();
        audits.insert("largest-contentful-paint".to_string(), numeric_audit(3000.0));
        audits.insert("first-contentful-paint".to_string(), numeric_audit(1200.0));
        audits.insert("server-response-time".to_string(), numeric_audit(400.0));

        let breakdown = extract_lcp_breakdown(&audits).unwrap();
        assert_eq!(breakdown.ttfb, 400);
        // fcp - ttfb
        assert_eq!(breakdown.resource_load_delay, 800);
        // (lcp - fcp) * 0.6
        assert_eq!(breakdown.resource_load_duration, 1080);
        // remainder
        assert_eq!(breakdown.element_render_delay, 720);
    }

    #[test]
    fn test_lcp_breakdown_missing_ttfb_defaults_zero() {
        let mut audits = AuditMap::new();
        audits.insert("largest-contentful-paint".to_string(), numeric_audit(2000.0));
        audits.insert("first-contentful-paint".to_string(), numeric_audit(1000.0));

        let breakdown = extract_lcp_breakdown(&audits).unwrap();
        assert_eq!(breakdown.ttfb, 0);
        assert_eq!(breakdown.resource_load_delay, 1000);
        assert_eq!(breakdown.resource_load_duration, 600);
        assert_eq!(breakdown.element_render_delay, 400);
    }

    #[test]
    fn test_lcp_breakdown_clamps_negative_phases() {
        // FCP below TTFB must not produce negative phases
        let mut audits = AuditMap::new();
        audits.insert("largest-contentful-paint".to_string(), numeric_audit(1500.0));
        audits.insert("first-contentful-paint".to_string(), numeric_audit(300.0));
        audits.insert("server-response-time".to_string(), numeric_audit(900.0));

        let breakdown = extract_lcp_breakdown(&audits).unwrap();
        assert_eq!(breakdown.resource_load_delay, 0);
        // (1500 - 300) * 0.6 = 720
        assert_eq!(breakdown.resource_load_duration, 720);
        // 1500 - 900 - 0 - 720 = -120 -> clamped
        assert_eq!(breakdown.element_render_delay, 0);
    }
}
