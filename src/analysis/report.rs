//! Actionable report generation
//!
//! Top-level orchestrator over the diagnostics builder, the LCP analyzer,
//! and the opportunity synthesizer. Everything here is a pure function of
//! its inputs except the `generated_at` timestamp.

use crate::analysis::diagnostics::{build_diagnostics_table, DiagnosticItem};
use crate::analysis::insights::{extract_detailed_insights, DetailedInsights, TotalSavings};
use crate::analysis::lcp::{enhance_lcp_element, EnhancedLcpElement};
use crate::analysis::opportunities::{select_opportunities, KeyOpportunity};
use crate::models::context::ProjectContext;
use crate::models::result::PerformanceResult;
use crate::types::{HealthStatus, ImpactLevel, Urgency};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hard cap on the next-steps list
pub const MAX_NEXT_STEPS: usize = 5;
/// Performance score below which a testing step is recommended
const TESTING_SCORE_GATE: u32 = 90;

/// One recommended follow-up action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextStep {
    /// 1-indexed position
    pub order: u32,
    pub action: String,
    pub urgency: Urgency,
}

/// Executive summary of one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub health_status: HealthStatus,
    /// Opportunities with at least one quick-win step (a step measured in
    /// minutes, or one carrying a code example)
    pub quick_wins_count: usize,
    pub potential_savings: TotalSavings,
    /// Titles of the first three opportunities in priority order
    pub top_priorities: Vec<String>,
}

/// The complete machine-readable report handed to formatters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionableReport {
    pub performance_result: PerformanceResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_context: Option<ProjectContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhanced_lcp: Option<EnhancedLcpElement>,
    pub diagnostics_table: Vec<DiagnosticItem>,
    pub key_opportunities: Vec<KeyOpportunity>,
    pub next_steps: Vec<NextStep>,
    pub summary: ReportSummary,
    pub generated_at: DateTime<Utc>,
}

/// Generate the full actionable report for one measurement.
///
/// When the result does not already carry `insights`, they are computed
/// from the retained raw-audit map; when neither exists the report
/// degrades to empty tables rather than failing.
pub fn generate_report(
    result: PerformanceResult,
    project_context: Option<ProjectContext>,
) -> ActionableReport {
    let insights: Option<DetailedInsights> = match &result.insights {
        Some(existing) => Some(existing.clone()),
        None if !result.raw_audits.is_empty() => {
            Some(extract_detailed_insights(&result.raw_audits, &result.host_domain()))
        }
        None => None,
    };
    let empty = DetailedInsights::default();
    let insight_ref = insights.as_ref().unwrap_or(&empty);

    let diagnostics_table = build_diagnostics_table(insight_ref);

    let enhanced_lcp = result.lcp_element.as_ref().map(|element| {
        enhance_lcp_element(
            element,
            insight_ref.lcp_breakdown.as_ref(),
            Some(result.metrics.lcp.value),
            project_context.as_ref(),
        )
    });

    let key_opportunities =
        select_opportunities(&result, insight_ref, enhanced_lcp.as_ref(), project_context.as_ref());

    let next_steps = build_next_steps(&key_opportunities, result.scores.performance);

    let summary = ReportSummary {
        health_status: HealthStatus::from_performance_score(result.scores.performance),
        quick_wins_count: count_quick_wins(&key_opportunities),
        potential_savings: potential_savings(insights.as_ref(), &diagnostics_table),
        top_priorities: key_opportunities.iter().take(3).map(|o| o.title.clone()).collect(),
    };

    ActionableReport {
        performance_result: result,
        project_context,
        enhanced_lcp,
        diagnostics_table,
        key_opportunities,
        next_steps,
        summary,
        generated_at: Utc::now(),
    }
}

/// Derive the ordered next-steps list, capped at [`MAX_NEXT_STEPS`].
fn build_next_steps(opportunities: &[KeyOpportunity], performance_score: Option<u32>) -> Vec<NextStep> {
    let mut steps: Vec<NextStep> = Vec::new();

    for opportunity in opportunities.iter().take(3) {
        if opportunity.impact.level.is_actionable() {
            steps.push(NextStep {
                order: steps.len() as u32 + 1,
                action: format!("Start code changes for: {}", opportunity.title),
                urgency: if opportunity.impact.level == ImpactLevel::Critical {
                    Urgency::Immediate
                } else {
                    Urgency::Soon
                },
            });
        }
    }

    steps.push(NextStep {
        order: steps.len() as u32 + 1,
        action: "Set up continuous performance monitoring in CI".to_string(),
        urgency: Urgency::WhenPossible,
    });

    if performance_score.unwrap_or(0) < TESTING_SCORE_GATE {
        steps.push(NextStep {
            order: steps.len() as u32 + 1,
            action: "Add performance regression testing to the development workflow".to_string(),
            urgency: Urgency::Soon,
        });
    }

    steps.truncate(MAX_NEXT_STEPS);
    steps
}

/// An opportunity counts as a quick win when any step is measured in
/// minutes or ships a ready-made code example.
fn count_quick_wins(opportunities: &[KeyOpportunity]) -> usize {
    opportunities
        .iter()
        .filter(|op| {
            op.steps.iter().any(|step| {
                step.estimated_time.as_deref().is_some_and(|t| t.contains("minute"))
                    || step.code_example.is_some()
            })
        })
        .count()
}

/// Prefer the aggregated insight totals; fall back to summing whatever
/// the diagnostics table reported.
fn potential_savings(
    insights: Option<&DetailedInsights>,
    diagnostics: &[DiagnosticItem],
) -> TotalSavings {
    if let Some(insights) = insights {
        return insights.total_savings;
    }
    let mut savings = TotalSavings::default();
    for item in diagnostics {
        if let Some(s) = &item.savings {
            savings.time_ms += s.time_ms.unwrap_or(0.0);
            savings.size_bytes += s.bytes.unwrap_or(0);
        }
    }
    savings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::opportunities::{ActionStep, OpportunityId, OpportunityImpact};

    fn opportunity(id: OpportunityId, level: ImpactLevel, steps: Vec<ActionStep>) -> KeyOpportunity {
        KeyOpportunity {
            id,
            priority: id.priority(),
            title: format!("{:?}", id),
            description: String::new(),
            impact: OpportunityImpact {
                level,
                description: String::new(),
                lcp_improvement_ms: None,
                savings_bytes: None,
                savings_ms: None,
            },
            steps,
            framework_notes: None,
            resources: vec![],
        }
    }

    fn plain_step(order: u32) -> ActionStep {
        serde_json::from_value(serde_json::json!({"order": order, "action": "do the thing"})).unwrap()
    }

    fn quick_step(order: u32) -> ActionStep {
        serde_json::from_value(serde_json::json!({
            "order": order, "action": "do the quick thing", "estimatedTime": "10 minutes"
        }))
        .unwrap()
    }

    #[test]
    fn test_next_steps_cap() {
        let ops = vec![
            opportunity(OpportunityId::OptimizeLcp, ImpactLevel::Critical, vec![]),
            opportunity(OpportunityId::OptimizeJavascript, ImpactLevel::High, vec![]),
            opportunity(OpportunityId::OptimizeImages, ImpactLevel::High, vec![]),
            opportunity(OpportunityId::OptimizeThirdParties, ImpactLevel::High, vec![]),
        ];
        let steps = build_next_steps(&ops, Some(40));
        assert_eq!(steps.len(), MAX_NEXT_STEPS);
        // 4th opportunity is outside the top-3 window
        assert!(!steps.iter().any(|s| s.action.contains("OptimizeThirdParties")));
    }

    #[test]
    fn test_next_steps_urgency_mapping() {
        let ops = vec![
            opportunity(OpportunityId::OptimizeLcp, ImpactLevel::Critical, vec![]),
            opportunity(OpportunityId::OptimizeJavascript, ImpactLevel::High, vec![]),
            opportunity(OpportunityId::ImproveCls, ImpactLevel::Medium, vec![]),
        ];
        let steps = build_next_steps(&ops, Some(95));
        // medium-impact opportunity emits no code-change step; score >= 90
        // skips the testing step
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].urgency, Urgency::Immediate);
        assert_eq!(steps[1].urgency, Urgency::Soon);
        assert_eq!(steps[2].urgency, Urgency::WhenPossible);
        assert!(steps[2].action.contains("monitoring"));
    }

    #[test]
    fn test_next_steps_missing_score_includes_testing() {
        let steps = build_next_steps(&[], None);
        assert_eq!(steps.len(), 2);
        assert!(steps[1].action.contains("regression testing"));
    }

    #[test]
    fn test_quick_wins_counting() {
        let ops = vec![
            opportunity(OpportunityId::OptimizeLcp, ImpactLevel::High, vec![quick_step(1)]),
            opportunity(OpportunityId::OptimizeJavascript, ImpactLevel::High, vec![plain_step(1)]),
        ];
        assert_eq!(count_quick_wins(&ops), 1);
    }

    #[test]
    fn test_potential_savings_prefers_insights() {
        let insights = DetailedInsights {
            total_savings: TotalSavings { time_ms: 500.0, size_bytes: 123_456 },
            ..DetailedInsights::default()
        };
        let savings = potential_savings(Some(&insights), &[]);
        assert_eq!(savings.size_bytes, 123_456);
        assert_eq!(savings.time_ms, 500.0);
    }
}
