//! PageSpeed Insights API client and response parsing

use crate::analysis::insights::extract_detailed_insights;
use crate::error::{AppError, Result};
use crate::models::audit::{Audit, AuditMap};
use crate::models::result::{
    CategoryScores, CoreWebVitals, FieldData, LcpElement, MetricValue, PerformanceResult,
};
use crate::models::Config;
use crate::types::{MetricRating, Strategy};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::Client;
use serde_json::Value;
use std::sync::LazyLock;
use std::time::Duration;
use tokio::time::timeout;

/// Production API endpoint
pub const PSI_ENDPOINT: &str = "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";

/// Lighthouse categories requested with every run
const CATEGORIES: &[&str] = &["performance", "accessibility", "best-practices", "seo"];

static SRC_ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"src=["']([^"']+)["']"#).expect("valid pattern"));

/// Measurement API abstraction; implementations must be mock-friendly for
/// tests and alternative backends.
#[async_trait]
pub trait PerformanceApi: Send + Sync {
    /// Run one analysis for a URL/strategy pair.
    async fn analyze(&self, url: &str, strategy: Strategy) -> Result<PerformanceResult>;
}

/// HTTP client for the PageSpeed Insights v5 API
pub struct PageSpeedClient {
    http: Client,
    endpoint: String,
    api_key: Option<String>,
    request_timeout: Duration,
}

impl PageSpeedClient {
    /// Create a client from the application configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("web-vitals-auditor/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: PSI_ENDPOINT.to_string(),
            api_key: config.api_key.clone(),
            request_timeout: config.timeout(),
        })
    }

    /// Point the client at a different endpoint. Used by tests and by
    /// self-hosted API proxies.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn build_query(&self, url: &str, strategy: Strategy) -> Vec<(&'static str, String)> {
        let mut query: Vec<(&'static str, String)> = vec![
            ("url", url.to_string()),
            ("strategy", strategy.as_str().to_string()),
        ];
        for category in CATEGORIES {
            query.push(("category", (*category).to_string()));
        }
        if let Some(key) = &self.api_key {
            query.push(("key", key.clone()));
        }
        query
    }
}

#[async_trait]
impl PerformanceApi for PageSpeedClient {
    async fn analyze(&self, url: &str, strategy: Strategy) -> Result<PerformanceResult> {
        let request = self.http.get(&self.endpoint).query(&self.build_query(url, strategy));

        let response = timeout(self.request_timeout, request.send())
            .await
            .map_err(|_| {
                AppError::timeout(format!(
                    "analysis of {} did not finish within {}s",
                    url,
                    self.request_timeout.as_secs()
                ))
            })??;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = extract_api_error(&body).unwrap_or_else(|| status.to_string());
            // Client-side rejections carry actionable API messages; anything
            // else is a transport-level failure
            return Err(if status.is_client_error() {
                AppError::api(detail)
            } else {
                AppError::http_request(format!("API returned {}: {}", status, detail))
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::parse(format!("invalid API response body: {}", e)))?;

        parse_response(&body, url, strategy)
    }
}

/// Pull the human-readable message out of an API error envelope.
fn extract_api_error(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Convert a raw API response into a `PerformanceResult`.
///
/// A missing `lighthouseResult` is a hard parse error (a failed analysis),
/// while individually missing audits degrade to defaults: absent data is
/// not an error once a result exists.
pub fn parse_response(body: &Value, requested_url: &str, strategy: Strategy) -> Result<PerformanceResult> {
    let lighthouse = body
        .get("lighthouseResult")
        .ok_or_else(|| AppError::parse("response carries no lighthouseResult"))?;

    let url = lighthouse
        .get("finalUrl")
        .or_else(|| lighthouse.get("requestedUrl"))
        .and_then(Value::as_str)
        .unwrap_or(requested_url)
        .to_string();

    let timestamp = lighthouse
        .get("fetchTime")
        .and_then(Value::as_str)
        .and_then(|t| t.parse::<DateTime<Utc>>().ok())
        .unwrap_or_else(Utc::now);

    let raw_audits = parse_audits(lighthouse.get("audits"));
    let scores = parse_scores(lighthouse.get("categories"));
    let metrics = parse_metrics(&raw_audits);
    let lcp_element = parse_lcp_element(&raw_audits);
    let field_data = parse_field_data(body.get("loadingExperience"));
    let (opportunities, diagnostics) = classify_audit_ids(&raw_audits);

    let host = crate::analysis::entity::host_domain(&url);
    let insights = Some(extract_detailed_insights(&raw_audits, &host));

    Ok(PerformanceResult {
        url,
        strategy,
        timestamp,
        scores,
        metrics,
        lcp_element,
        opportunities,
        diagnostics,
        insights,
        field_data,
        raw_audits,
    })
}

fn parse_audits(audits: Option<&Value>) -> AuditMap {
    let Some(Value::Object(map)) = audits else {
        return AuditMap::new();
    };
    map.iter()
        .filter_map(|(id, raw)| {
            // A single malformed audit must not sink the whole response
            serde_json::from_value::<Audit>(raw.clone())
                .ok()
                .map(|audit| (id.clone(), audit))
        })
        .collect()
}

fn category_score(categories: Option<&Value>, name: &str) -> Option<u32> {
    categories?
        .get(name)?
        .get("score")?
        .as_f64()
        .map(|s| (s * 100.0).round() as u32)
}

fn parse_scores(categories: Option<&Value>) -> CategoryScores {
    CategoryScores {
        performance: category_score(categories, "performance"),
        accessibility: category_score(categories, "accessibility"),
        best_practices: category_score(categories, "best-practices"),
        seo: category_score(categories, "seo"),
    }
}

fn metric_from_audit(audits: &AuditMap, id: &str) -> MetricValue {
    match audits.get(id) {
        Some(audit) => MetricValue {
            value: audit.numeric_value.unwrap_or(0.0),
            display_value: audit.display_value.clone().unwrap_or_default(),
            rating: MetricRating::from_score(audit.score.unwrap_or(0.0)),
        },
        None => MetricValue {
            value: 0.0,
            display_value: String::new(),
            rating: MetricRating::Poor,
        },
    }
}

fn parse_metrics(audits: &AuditMap) -> CoreWebVitals {
    CoreWebVitals {
        lcp: metric_from_audit(audits, "largest-contentful-paint"),
        fcp: metric_from_audit(audits, "first-contentful-paint"),
        cls: metric_from_audit(audits, "cumulative-layout-shift"),
        tbt: metric_from_audit(audits, "total-blocking-time"),
        speed_index: metric_from_audit(audits, "speed-index"),
        ttfb: audits.get("server-response-time").map(|_| metric_from_audit(audits, "server-response-time")),
    }
}

/// Tag name from an element snippet like `<img class="hero" src="...">`.
fn tag_from_snippet(snippet: &str) -> Option<String> {
    let rest = snippet.trim_start().strip_prefix('<')?;
    let tag: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    if tag.is_empty() {
        None
    } else {
        Some(tag)
    }
}

fn parse_lcp_element(audits: &AuditMap) -> Option<LcpElement> {
    let item = audits.get("largest-contentful-paint-element")?.items().first()?.clone();
    // The element audit nests the node either directly or one level down
    let node = item.get("node").cloned().or_else(|| {
        item.get("items")
            .and_then(Value::as_array)
            .and_then(|rows| rows.first())
            .and_then(|row| row.get("node"))
            .cloned()
    })?;

    let snippet = node.get("snippet").and_then(Value::as_str).map(str::to_string);
    let tag = snippet.as_deref().and_then(tag_from_snippet);
    let url = node
        .get("url")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| {
            snippet
                .as_deref()
                .and_then(|s| SRC_ATTRIBUTE.captures(s))
                .map(|captures| captures[1].to_string())
        });

    Some(LcpElement {
        tag,
        url,
        snippet,
        selector: node.get("selector").and_then(Value::as_str).map(str::to_string),
        node_label: node.get("nodeLabel").and_then(Value::as_str).map(str::to_string),
    })
}

fn parse_field_data(loading_experience: Option<&Value>) -> Option<FieldData> {
    let experience = loading_experience?;
    Some(FieldData {
        overall_category: experience
            .get("overall_category")
            .and_then(Value::as_str)
            .map(str::to_string),
        metrics: experience.get("metrics").cloned(),
    })
}

/// Split audit ids into upstream opportunity and diagnostic lists; both
/// are pass-through metadata for report consumers.
fn classify_audit_ids(audits: &AuditMap) -> (Vec<String>, Vec<String>) {
    let mut opportunities = Vec::new();
    let mut diagnostics = Vec::new();
    for (id, audit) in audits {
        let Some(details) = &audit.details else { continue };
        match details.detail_type.as_deref() {
            Some("opportunity") => {
                if audit.score.unwrap_or(1.0) < 0.9 {
                    opportunities.push(id.clone());
                }
            }
            Some("table") | Some("debugdata") => {
                if !audit.items().is_empty() {
                    diagnostics.push(id.clone());
                }
            }
            _ => {}
        }
    }
    opportunities.sort();
    diagnostics.sort();
    (opportunities, diagnostics)
}
