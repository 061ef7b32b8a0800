//! Type definitions and aliases

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Analysis strategy requested from the measurement API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Simulated mobile device with throttled network and CPU
    Mobile,
    /// Desktop viewport without device throttling
    Desktop,
}

impl Strategy {
    /// Query-parameter value expected by the PageSpeed Insights API
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Mobile => "mobile",
            Strategy::Desktop => "desktop",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mobile" => Ok(Strategy::Mobile),
            "desktop" => Ok(Strategy::Desktop),
            other => Err(format!("unknown strategy '{other}' (expected mobile or desktop)")),
        }
    }
}

/// Metric classification derived from a Lighthouse 0-1 audit score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricRating {
    /// Score >= 0.9
    Good,
    /// Score >= 0.5
    NeedsImprovement,
    /// Everything below
    Poor,
}

impl MetricRating {
    /// Classify a 0-1 audit score using the fixed Lighthouse breakpoints
    pub fn from_score(score: f64) -> Self {
        if score >= 0.9 {
            Self::Good
        } else if score >= 0.5 {
            Self::NeedsImprovement
        } else {
            Self::Poor
        }
    }

    pub fn is_good(&self) -> bool {
        matches!(self, Self::Good)
    }
}

/// Severity of a diagnosed performance issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Serious,
    Moderate,
    Minor,
}

impl Severity {
    /// Sort rank, critical first. Diagnostics tables are ordered by this.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::Serious => 1,
            Severity::Moderate => 2,
            Severity::Minor => 3,
        }
    }
}

/// Estimated impact of acting on an opportunity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    Critical,
    High,
    Medium,
    Low,
}

impl ImpactLevel {
    /// Opportunities at this level warrant an immediate next step
    pub fn is_actionable(&self) -> bool {
        matches!(self, ImpactLevel::Critical | ImpactLevel::High)
    }
}

/// Overall page health derived from the performance category score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HealthStatus {
    /// Performance score >= 90
    Healthy,
    /// Performance score >= 50
    NeedsAttention,
    /// Everything below, or no score at all
    Critical,
}

impl HealthStatus {
    /// Classify an optional 0-100 performance score. A missing score is
    /// treated as 0.
    pub fn from_performance_score(score: Option<u32>) -> Self {
        match score.unwrap_or(0) {
            s if s >= 90 => Self::Healthy,
            s if s >= 50 => Self::NeedsAttention,
            _ => Self::Critical,
        }
    }
}

/// How soon a recommended next step should be taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Urgency {
    Immediate,
    Soon,
    WhenPossible,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_rating_breakpoints() {
        assert_eq!(MetricRating::from_score(0.9), MetricRating::Good);
        assert_eq!(MetricRating::from_score(0.89), MetricRating::NeedsImprovement);
        assert_eq!(MetricRating::from_score(0.5), MetricRating::NeedsImprovement);
        assert_eq!(MetricRating::from_score(0.49), MetricRating::Poor);
    }

    #[test]
    fn test_health_status_from_score() {
        assert_eq!(HealthStatus::from_performance_score(Some(90)), HealthStatus::Healthy);
        assert_eq!(HealthStatus::from_performance_score(Some(89)), HealthStatus::NeedsAttention);
        assert_eq!(HealthStatus::from_performance_score(Some(50)), HealthStatus::NeedsAttention);
        assert_eq!(HealthStatus::from_performance_score(Some(49)), HealthStatus::Critical);
        assert_eq!(HealthStatus::from_performance_score(None), HealthStatus::Critical);
    }

    #[test]
    fn test_severity_rank_order() {
        assert!(Severity::Critical.rank() < Severity::Serious.rank());
        assert!(Severity::Serious.rank() < Severity::Moderate.rank());
        assert!(Severity::Moderate.rank() < Severity::Minor.rank());
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("mobile".parse::<Strategy>().unwrap(), Strategy::Mobile);
        assert_eq!("Desktop".parse::<Strategy>().unwrap(), Strategy::Desktop);
        assert!("tablet".parse::<Strategy>().is_err());
    }
}
