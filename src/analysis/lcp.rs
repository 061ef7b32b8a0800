//! LCP element analysis
//!
//! Classifies the rendering type and loading mechanism of the LCP element
//! from tag/URL/snippet heuristics and derives ordered improvement
//! recommendations from the element type, the timing breakdown, and the
//! absolute LCP value.

use crate::analysis::insights::LcpBreakdown;
use crate::models::context::ProjectContext;
use crate::models::result::LcpElement;
use crate::types::ImpactLevel;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Unanchored, case-insensitive: a query string after the extension still
/// counts as an image URL.
static IMAGE_URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png|gif|webp|avif|svg)").expect("valid pattern"));

/// Tags treated as text containers when no image URL is involved
const TEXT_TAGS: &[&str] = &["h1", "h2", "h3", "p", "span", "div"];

/// TTFB above this warrants a server-side recommendation (ms)
const TTFB_SLOW: u64 = 800;
/// Load delay above this warrants a preload recommendation (ms)
const LOAD_DELAY_SLOW: u64 = 500;
/// Render delay above this warrants a critical-path recommendation (ms)
const RENDER_DELAY_SLOW: u64 = 300;
/// The "good" LCP ceiling (ms); beyond it critical-CSS advice applies
const LCP_GOOD: f64 = 2500.0;
/// The "poor" LCP floor (ms); beyond it that advice escalates
const LCP_POOR: f64 = 4000.0;

/// How the LCP element renders its content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LcpElementType {
    Image,
    Text,
    Video,
    BackgroundImage,
    Unknown,
}

/// How the LCP element's resource is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadingMechanism {
    Eager,
    Lazy,
    Priority,
    Deferred,
    Unknown,
}

/// Implementation effort of a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Easy,
    Moderate,
    Hard,
}

/// One LCP improvement recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LcpRecommendation {
    pub title: String,
    pub description: String,
    pub impact: ImpactLevel,
    pub effort: Effort,
}

/// The raw LCP element enriched with derived classification and guidance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedLcpElement {
    #[serde(flatten)]
    pub element: LcpElement,
    #[serde(rename = "type")]
    pub element_type: LcpElementType,
    pub loading_mechanism: LoadingMechanism,
    /// Always true: the LCP element is by definition the largest element
    /// painted during load, so it is treated as above the fold.
    pub is_above_the_fold: bool,
    pub recommendations: Vec<LcpRecommendation>,
}

/// Classify the LCP element's rendering type.
///
/// The URL-based image check runs strictly before the text-tag check: a
/// `div` with an image URL is a background image, a bare `div` is text.
pub fn detect_lcp_type(tag: Option<&str>, url: Option<&str>) -> LcpElementType {
    let tag = tag.map(str::to_lowercase);
    match tag.as_deref() {
        Some("img") | Some("svg") => return LcpElementType::Image,
        Some("video") => return LcpElementType::Video,
        _ => {}
    }
    if let Some(url) = url {
        if IMAGE_URL_PATTERN.is_match(url) {
            return LcpElementType::BackgroundImage;
        }
    }
    match tag.as_deref() {
        Some(t) if TEXT_TAGS.contains(&t) => LcpElementType::Text,
        _ => LcpElementType::Unknown,
    }
}

/// Classify how the element's resource is loaded from its HTML snippet.
pub fn detect_loading_mechanism(snippet: Option<&str>) -> LoadingMechanism {
    let Some(snippet) = snippet else {
        return LoadingMechanism::Unknown;
    };
    let snippet = snippet.to_lowercase();
    if snippet.contains(r#"loading="lazy""#) {
        LoadingMechanism::Lazy
    } else if snippet.contains("fetchpriority") || snippet.contains("priority") {
        LoadingMechanism::Priority
    } else if snippet.contains("defer") {
        LoadingMechanism::Deferred
    } else {
        LoadingMechanism::Eager
    }
}

/// Generate ordered LCP recommendations.
///
/// The five checks are independent and evaluated in a fixed order;
/// several can fire for the same element.
pub fn generate_lcp_recommendations(
    element_type: LcpElementType,
    breakdown: Option<&LcpBreakdown>,
    lcp_value: Option<f64>,
    context: Option<&ProjectContext>,
) -> Vec<LcpRecommendation> {
    let mut recommendations = Vec::new();

    if element_type == LcpElementType::Image {
        recommendations.push(LcpRecommendation {
            title: "Prioritize the LCP image".to_string(),
            description: "Add fetchpriority=\"high\" to the LCP image and remove any \
                          loading=\"lazy\" attribute so the browser requests it immediately."
                .to_string(),
            impact: ImpactLevel::High,
            effort: Effort::Easy,
        });

        if context.is_some_and(ProjectContext::is_next) {
            recommendations.push(LcpRecommendation {
                title: "Use next/image with the priority prop".to_string(),
                description: "Render the LCP image through next/image and set priority so \
                              Next.js preloads it and picks an optimized format automatically."
                    .to_string(),
                impact: ImpactLevel::High,
                effort: Effort::Easy,
            });
        }
    }

    if let Some(breakdown) = breakdown {
        if breakdown.ttfb > TTFB_SLOW {
            recommendations.push(LcpRecommendation {
                title: "Improve server response time".to_string(),
                description: format!(
                    "TTFB is {} ms. Use caching, a CDN, or edge rendering to bring the first \
                     byte under {} ms.",
                    breakdown.ttfb, TTFB_SLOW
                ),
                impact: ImpactLevel::High,
                effort: Effort::Moderate,
            });
        }

        if breakdown.resource_load_delay > LOAD_DELAY_SLOW {
            recommendations.push(LcpRecommendation {
                title: "Preload the LCP resource".to_string(),
                description: format!(
                    "The LCP resource waits {} ms before it starts loading. Add \
                     <link rel=\"preload\"> for it in the document head.",
                    breakdown.resource_load_delay
                ),
                impact: ImpactLevel::Medium,
                effort: Effort::Easy,
            });
        }

        if breakdown.element_render_delay > RENDER_DELAY_SLOW {
            recommendations.push(LcpRecommendation {
                title: "Reduce element render delay".to_string(),
                description: format!(
                    "The element renders {} ms after its resource is available. Check for \
                     render-blocking scripts and client-side rendering waterfalls.",
                    breakdown.element_render_delay
                ),
                impact: ImpactLevel::Medium,
                effort: Effort::Moderate,
            });
        }
    }

    if let Some(lcp) = lcp_value {
        if lcp > LCP_GOOD {
            recommendations.push(LcpRecommendation {
                title: "Inline critical CSS".to_string(),
                description: "Inline above-the-fold CSS and defer the rest so the first paint \
                              is not gated on full stylesheet downloads."
                    .to_string(),
                impact: if lcp > LCP_POOR { ImpactLevel::High } else { ImpactLevel::Medium },
                effort: Effort::Moderate,
            });
        }
    }

    recommendations
}

/// Enrich the raw LCP element with classification and guidance.
pub fn enhance_lcp_element(
    element: &LcpElement,
    breakdown: Option<&LcpBreakdown>,
    lcp_value: Option<f64>,
    context: Option<&ProjectContext>,
) -> EnhancedLcpElement {
    let element_type = detect_lcp_type(element.tag.as_deref(), element.url.as_deref());
    EnhancedLcpElement {
        element: element.clone(),
        element_type,
        loading_mechanism: detect_loading_mechanism(element.snippet.as_deref()),
        is_above_the_fold: true,
        recommendations: generate_lcp_recommendations(element_type, breakdown, lcp_value, context),
    }
}
