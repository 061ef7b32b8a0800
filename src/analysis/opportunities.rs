//! Key opportunity synthesis
//!
//! Six opportunity builders, each with a permanently fixed priority that
//! encodes remediation order (render performance first, then transfer
//! weight, then runtime blocking) rather than measured magnitude. A
//! selection pass applies the applicability gates and sorts the surviving
//! opportunities by that fixed priority, never by impact or savings.

use crate::analysis::insights::{DetailedInsights, LcpBreakdown};
use crate::analysis::lcp::{EnhancedLcpElement, LcpElementType};
use crate::models::context::ProjectContext;
use crate::models::result::{MetricValue, PerformanceResult};
use crate::types::ImpactLevel;
use serde::{Deserialize, Serialize};

/// Unused-JS waste (bytes) that makes the JavaScript opportunity apply
const JS_WASTE_GATE: u64 = 100_000;
/// Image waste (bytes) that makes the image opportunity apply
const IMAGE_WASTE_GATE: u64 = 50_000;
/// Third-party blocking (ms) that makes the third-party opportunity apply
const THIRD_PARTY_BLOCKING_GATE: f64 = 250.0;
/// Render-blocking waste (ms) that makes that opportunity apply
const RENDER_BLOCKING_GATE: f64 = 200.0;

/// The six fixed opportunity identities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpportunityId {
    OptimizeLcp,
    OptimizeJavascript,
    OptimizeImages,
    OptimizeThirdParties,
    EliminateRenderBlocking,
    ImproveCls,
}

impl OpportunityId {
    /// Permanent priority, 1 = fix first. Encodes policy, not magnitude.
    pub fn priority(&self) -> u8 {
        match self {
            OpportunityId::OptimizeLcp => 1,
            OpportunityId::OptimizeJavascript => 2,
            OpportunityId::OptimizeImages => 3,
            OpportunityId::OptimizeThirdParties => 4,
            OpportunityId::EliminateRenderBlocking => 5,
            OpportunityId::ImproveCls => 6,
        }
    }
}

/// One ordered remediation step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionStep {
    /// 1-indexed position within the opportunity
    pub order: u32,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_example: Option<String>,
}

impl ActionStep {
    fn new(order: u32, action: impl Into<String>) -> Self {
        Self { order, action: action.into(), details: None, estimated_time: None, code_example: None }
    }

    fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    fn estimated_time(mut self, time: impl Into<String>) -> Self {
        self.estimated_time = Some(time.into());
        self
    }

    fn code_example(mut self, code: impl Into<String>) -> Self {
        self.code_example = Some(code.into());
        self
    }
}

/// Estimated impact of acting on an opportunity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityImpact {
    pub level: ImpactLevel,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lcp_improvement_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings_ms: Option<f64>,
}

/// A prioritized, actionable remediation bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyOpportunity {
    pub id: OpportunityId,
    /// Fixed per id; duplicated here so serialized reports sort trivially
    pub priority: u8,
    pub title: String,
    pub description: String,
    pub impact: OpportunityImpact,
    pub steps: Vec<ActionStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,
}

/// Build the LCP opportunity. Applies when the LCP rating is not good.
pub fn create_lcp_opportunity(
    lcp: &MetricValue,
    enhanced: Option<&EnhancedLcpElement>,
    breakdown: Option<&LcpBreakdown>,
    context: Option<&ProjectContext>,
) -> KeyOpportunity {
    let level = if lcp.value > 4000.0 { ImpactLevel::Critical } else { ImpactLevel::High };
    let improvement = (lcp.value - 2500.0).max(0.0).round() as u64;

    let mut steps = vec![ActionStep::new(1, "Confirm which element is the LCP candidate")
        .details(match enhanced {
            Some(e) => format!(
                "The measured LCP element is a {:?} element{}",
                e.element_type,
                e.element.url.as_deref().map(|u| format!(" loading {}", u)).unwrap_or_default()
            ),
            None => "Run the audit in a browser profiler to identify the LCP element".to_string(),
        })
        .estimated_time("15 minutes")];

    let mut order = 2;
    if enhanced.is_some_and(|e| e.element_type == LcpElementType::Image) {
        steps.push(
            ActionStep::new(order, "Request the LCP image at high priority")
                .details("Add fetchpriority=\"high\" and drop loading=\"lazy\" on the LCP image")
                .estimated_time("10 minutes")
                .code_example("<img src=\"hero.jpg\" fetchpriority=\"high\" alt=\"...\">"),
        );
        order += 1;
    }
    if let Some(b) = breakdown {
        if b.ttfb > 800 {
            steps.push(
                ActionStep::new(order, "Cut server response time")
                    .details(format!(
                        "TTFB is {} ms; add caching or serve the document from an edge location",
                        b.ttfb
                    ))
                    .estimated_time("2-4 hours"),
            );
            order += 1;
        }
        if b.resource_load_delay > 500 {
            steps.push(
                ActionStep::new(order, "Preload the LCP resource")
                    .details(format!(
                        "The resource sits idle for {} ms before loading starts",
                        b.resource_load_delay
                    ))
                    .estimated_time("20 minutes")
                    .code_example("<link rel=\"preload\" as=\"image\" href=\"hero.jpg\">"),
            );
        }
    }

    KeyOpportunity {
        id: OpportunityId::OptimizeLcp,
        priority: OpportunityId::OptimizeLcp.priority(),
        title: "Optimize Largest Contentful Paint".to_string(),
        description: format!(
            "LCP is {} — users wait too long before the main content appears.",
            lcp.display_value
        ),
        impact: OpportunityImpact {
            level,
            description: format!(
                "Bringing LCP to the 2.5 s target saves roughly {} ms for every visitor",
                improvement
            ),
            lcp_improvement_ms: Some(improvement),
            savings_bytes: None,
            savings_ms: None,
        },
        steps,
        framework_notes: context.filter(|c| c.is_next()).map(|_| {
            "Next.js: serve the LCP image through next/image with the priority prop; the \
             framework emits the preload and fetchpriority attributes for you."
                .to_string()
        }),
        resources: vec!["https://web.dev/articles/optimize-lcp".to_string()],
    }
}

/// Build the JavaScript opportunity. Applies when unused-JS waste exceeds
/// [`JS_WASTE_GATE`].
pub fn create_javascript_opportunity(
    insights: &DetailedInsights,
    context: Option<&ProjectContext>,
) -> KeyOpportunity {
    let waste = insights.unused_js_waste();
    let level = if waste > 500_000 {
        ImpactLevel::Critical
    } else if waste > 200_000 {
        ImpactLevel::High
    } else {
        ImpactLevel::Medium
    };

    let first_party_count = insights.unused_javascript.iter().filter(|i| i.is_first_party).count();
    let steps = vec![
        ActionStep::new(1, "Profile the bundle to locate unused code")
            .details(format!(
                "{} of shipped JavaScript goes unused ({} first-party file(s) involved)",
                crate::analysis::format::format_bytes(waste),
                first_party_count
            ))
            .estimated_time("30 minutes")
            .code_example("npx source-map-explorer dist/assets/*.js"),
        ActionStep::new(2, "Split non-critical code out of the entry bundle")
            .details("Move below-the-fold and route-specific code behind dynamic imports")
            .code_example("const Chart = await import('./chart.js')"),
        ActionStep::new(3, "Remove or replace heavyweight dependencies")
            .details("Check the largest offenders for lighter alternatives or tree-shakeable builds"),
    ];

    KeyOpportunity {
        id: OpportunityId::OptimizeJavascript,
        priority: OpportunityId::OptimizeJavascript.priority(),
        title: "Reduce unused JavaScript".to_string(),
        description: "Large amounts of shipped JavaScript never execute on this page.".to_string(),
        impact: OpportunityImpact {
            level,
            description: format!(
                "Removing unused code saves {} of transfer",
                crate::analysis::format::format_bytes(waste)
            ),
            lcp_improvement_ms: None,
            savings_bytes: Some(waste),
            savings_ms: None,
        },
        steps,
        framework_notes: context.filter(|c| c.is_next()).map(|_| {
            "Next.js: use next/dynamic for client-only components and check that shared \
             modules are not bundled into every route."
                .to_string()
        }),
        resources: vec![
            "https://web.dev/articles/reduce-javascript-payloads-with-code-splitting".to_string()
        ],
    }
}

/// Build the image opportunity. Applies when image waste exceeds
/// [`IMAGE_WASTE_GATE`].
pub fn create_image_opportunity(
    insights: &DetailedInsights,
    context: Option<&ProjectContext>,
) -> KeyOpportunity {
    let waste = insights.image_waste();
    let level = if waste > 500_000 { ImpactLevel::High } else { ImpactLevel::Medium };

    let steps = vec![
        ActionStep::new(1, "Convert legacy-format images to WebP or AVIF")
            .estimated_time("45 minutes")
            .code_example(
                "<picture>\n  <source srcset=\"hero.avif\" type=\"image/avif\">\n  \
                 <img src=\"hero.jpg\" alt=\"...\">\n</picture>",
            ),
        ActionStep::new(2, "Serve responsive sizes")
            .details("Generate srcset variants so small viewports stop downloading desktop images")
            .code_example("<img srcset=\"hero-480.webp 480w, hero-1080.webp 1080w\" sizes=\"100vw\">"),
        ActionStep::new(3, "Lazy-load offscreen images")
            .details("Below-the-fold images should use loading=\"lazy\"; never the LCP image")
            .estimated_time("20 minutes"),
    ];

    KeyOpportunity {
        id: OpportunityId::OptimizeImages,
        priority: OpportunityId::OptimizeImages.priority(),
        title: "Optimize images".to_string(),
        description: "Images ship more bytes than their rendered size requires.".to_string(),
        impact: OpportunityImpact {
            level,
            description: format!(
                "Image optimization saves {} of transfer",
                crate::analysis::format::format_bytes(waste)
            ),
            lcp_improvement_ms: None,
            savings_bytes: Some(waste),
            savings_ms: None,
        },
        steps,
        framework_notes: context.filter(|c| c.is_next()).map(|_| {
            "Next.js: next/image handles format negotiation, resizing, and lazy loading; \
             prefer it over raw <img> tags."
                .to_string()
        }),
        resources: vec!["https://web.dev/articles/fast#optimize_your_images".to_string()],
    }
}

/// Build the third-party opportunity. Applies when summed blocking time
/// exceeds [`THIRD_PARTY_BLOCKING_GATE`].
pub fn create_third_party_opportunity(insights: &DetailedInsights) -> KeyOpportunity {
    let blocking = insights.third_party_blocking();
    let level = if blocking > 1000.0 { ImpactLevel::High } else { ImpactLevel::Medium };

    let worst = insights
        .third_parties
        .first()
        .map(|t| format!("{} alone blocks for {} ms", t.entity, t.blocking_time.round()))
        .unwrap_or_else(|| "No single entity dominates".to_string());

    let steps = vec![
        ActionStep::new(1, "Audit which third-party tags are still needed")
            .details(worst)
            .estimated_time("30 minutes"),
        ActionStep::new(2, "Load remaining tags without blocking the main thread")
            .code_example("<script src=\"https://example-cdn.com/widget.js\" async></script>"),
        ActionStep::new(3, "Replace heavy embeds with click-to-load facades")
            .details("Video and chat widgets can load a lightweight placeholder until interaction"),
    ];

    KeyOpportunity {
        id: OpportunityId::OptimizeThirdParties,
        priority: OpportunityId::OptimizeThirdParties.priority(),
        title: "Reduce third-party impact".to_string(),
        description: "Third-party scripts are blocking the main thread during load.".to_string(),
        impact: OpportunityImpact {
            level,
            description: format!("Third parties block the main thread for {} ms", blocking.round()),
            lcp_improvement_ms: None,
            savings_bytes: None,
            savings_ms: Some(blocking),
        },
        steps,
        framework_notes: None,
        resources: vec!["https://web.dev/articles/controlling-third-party-scripts".to_string()],
    }
}

/// Build the render-blocking opportunity. Applies when summed wasted time
/// exceeds [`RENDER_BLOCKING_GATE`].
pub fn create_render_blocking_opportunity(insights: &DetailedInsights) -> KeyOpportunity {
    let wasted = insights.render_blocking_waste();
    let level = if wasted > 1000.0 { ImpactLevel::High } else { ImpactLevel::Medium };

    let steps = vec![
        ActionStep::new(1, "Defer non-critical scripts")
            .estimated_time("20 minutes")
            .code_example("<script src=\"app.js\" defer></script>"),
        ActionStep::new(2, "Inline critical CSS and defer the rest")
            .details("Extract above-the-fold rules; load full stylesheets with media=\"print\" swap"),
        ActionStep::new(3, "Preconnect to required origins early")
            .code_example("<link rel=\"preconnect\" href=\"https://fonts.gstatic.com\">"),
    ];

    KeyOpportunity {
        id: OpportunityId::EliminateRenderBlocking,
        priority: OpportunityId::EliminateRenderBlocking.priority(),
        title: "Eliminate render-blocking resources".to_string(),
        description: "Stylesheets and scripts delay the first paint.".to_string(),
        impact: OpportunityImpact {
            level,
            description: format!("First paint is delayed by roughly {} ms", wasted.round()),
            lcp_improvement_ms: None,
            savings_bytes: None,
            savings_ms: Some(wasted),
        },
        steps,
        framework_notes: None,
        resources: vec!["https://web.dev/articles/render-blocking-resources".to_string()],
    }
}

/// Build the CLS opportunity. Applies when the CLS rating is not good.
pub fn create_cls_opportunity(cls: &MetricValue) -> KeyOpportunity {
    let level = if cls.value > 0.25 { ImpactLevel::High } else { ImpactLevel::Medium };

    let steps = vec![
        ActionStep::new(1, "Set explicit dimensions on images and video")
            .estimated_time("30 minutes")
            .code_example("<img src=\"hero.jpg\" width=\"1200\" height=\"600\" alt=\"...\">"),
        ActionStep::new(2, "Reserve space for ads, embeds, and dynamic content")
            .details("Give late-loading slots a min-height so surrounding content cannot jump"),
        ActionStep::new(3, "Avoid layout shifts from web fonts")
            .details("Use font-display: optional or size-adjusted fallback fonts"),
    ];

    KeyOpportunity {
        id: OpportunityId::ImproveCls,
        priority: OpportunityId::ImproveCls.priority(),
        title: "Improve visual stability".to_string(),
        description: format!(
            "Cumulative Layout Shift is {} — content moves while users read.",
            cls.display_value
        ),
        impact: OpportunityImpact {
            level,
            description: format!("CLS of {:.3} exceeds the 0.1 good threshold", cls.value),
            lcp_improvement_ms: None,
            savings_bytes: None,
            savings_ms: None,
        },
        steps,
        framework_notes: None,
        resources: vec!["https://web.dev/articles/optimize-cls".to_string()],
    }
}

/// Apply the applicability gates and return the surviving opportunities,
/// sorted ascending by fixed priority.
pub fn select_opportunities(
    result: &PerformanceResult,
    insights: &DetailedInsights,
    enhanced: Option<&EnhancedLcpElement>,
    context: Option<&ProjectContext>,
) -> Vec<KeyOpportunity> {
    let mut opportunities = Vec::new();

    if !result.metrics.lcp.rating.is_good() {
        opportunities.push(create_lcp_opportunity(
            &result.metrics.lcp,
            enhanced,
            insights.lcp_breakdown.as_ref(),
            context,
        ));
    }
    if insights.unused_js_waste() > JS_WASTE_GATE {
        opportunities.push(create_javascript_opportunity(insights, context));
    }
    if insights.image_waste() > IMAGE_WASTE_GATE {
        opportunities.push(create_image_opportunity(insights, context));
    }
    if insights.third_party_blocking() > THIRD_PARTY_BLOCKING_GATE {
        opportunities.push(create_third_party_opportunity(insights));
    }
    if insights.render_blocking_waste() > RENDER_BLOCKING_GATE {
        opportunities.push(create_render_blocking_opportunity(insights));
    }
    if !result.metrics.cls.rating.is_good() {
        opportunities.push(create_cls_opportunity(&result.metrics.cls));
    }

    opportunities.sort_by_key(|o| o.priority);
    opportunities
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::insights::UnusedCodeIssue;

    fn metric(value: f64, display: &str, score: f64) -> MetricValue {
        MetricValue::from_score(value, display, score)
    }

    fn insights_with_js_waste(wasted: u64) -> DetailedInsights {
        DetailedInsights {
            unused_javascript: vec![UnusedCodeIssue {
                url: "https://example.com/bundle.js".to_string(),
                wasted_bytes: wasted,
                total_bytes: wasted * 2,
                wasted_percent: 50,
                entity: None,
                is_first_party: true,
            }],
            ..DetailedInsights::default()
        }
    }

    #[test]
    fn test_lcp_opportunity_critical_above_4000() {
        let lcp = metric(4500.0, "4.5 s", 0.1);
        let op = create_lcp_opportunity(&lcp, None, None, None);
        assert_eq!(op.impact.level, ImpactLevel::Critical);
        assert_eq!(op.impact.lcp_improvement_ms, Some(2000));
        assert_eq!(op.priority, 1);
    }

    #[test]
    fn test_lcp_opportunity_high_below_4000() {
        let lcp = metric(3200.0, "3.2 s", 0.4);
        let op = create_lcp_opportunity(&lcp, None, None, None);
        assert_eq!(op.impact.level, ImpactLevel::High);
        assert_eq!(op.impact.lcp_improvement_ms, Some(700));
    }

    #[test]
    fn test_javascript_impact_levels() {
        assert_eq!(
            create_javascript_opportunity(&insights_with_js_waste(600_000), None).impact.level,
            ImpactLevel::Critical
        );
        assert_eq!(
            create_javascript_opportunity(&insights_with_js_waste(300_000), None).impact.level,
            ImpactLevel::High
        );
        // Exactly 200k is not above the high threshold
        assert_eq!(
            create_javascript_opportunity(&insights_with_js_waste(200_000), None).impact.level,
            ImpactLevel::Medium
        );
    }

    #[test]
    fn test_steps_are_one_indexed_and_ordered() {
        let op = create_javascript_opportunity(&insights_with_js_waste(300_000), None);
        let orders: Vec<u32> = op.steps.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[test]
    fn test_framework_notes_only_for_next() {
        let next = crate::models::context::ProjectContext {
            framework: Some(crate::models::context::Framework {
                name: "next".to_string(),
                version: None,
                router_type: None,
                rendering_mode: None,
                features: vec![],
            }),
            package_manager: "npm".to_string(),
            build_tool: None,
            ui_library: None,
            css_solution: None,
            is_type_script: false,
            image_optimization: None,
            analytics: vec![],
            third_party_integrations: vec![],
            dependencies: Default::default(),
        };
        let mut nuxt = next.clone();
        nuxt.framework.as_mut().unwrap().name = "nuxt".to_string();

        let insights = insights_with_js_waste(300_000);
        assert!(create_javascript_opportunity(&insights, Some(&next)).framework_notes.is_some());
        assert!(create_javascript_opportunity(&insights, Some(&nuxt)).framework_notes.is_none());
        assert!(create_javascript_opportunity(&insights, None).framework_notes.is_none());
    }

    #[test]
    fn test_cls_impact_threshold() {
        assert_eq!(
            create_cls_opportunity(&metric(0.3, "0.3", 0.1)).impact.level,
            ImpactLevel::High
        );
        assert_eq!(
            create_cls_opportunity(&metric(0.15, "0.15", 0.6)).impact.level,
            ImpactLevel::Medium
        );
    }
}
