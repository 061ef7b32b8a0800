//! Audit analysis pipeline
//!
//! Pure, synchronous transformations from a raw named-audit map to the
//! actionable report: formatting primitives, entity classification,
//! per-audit insight extraction, the aggregate insight container, the
//! diagnostics table, LCP analysis, opportunity synthesis, and the
//! top-level report generator. Nothing in this tree performs I/O.

pub mod diagnostics;
pub mod entity;
pub mod extractors;
pub mod format;
pub mod insights;
pub mod lcp;
pub mod opportunities;
pub mod report;

pub use diagnostics::{build_diagnostics_table, DiagnosticCategory, DiagnosticItem, Savings};
pub use entity::{categorize_third_party, extract_entity_from_url, host_domain, is_first_party, ThirdPartyCategory};
pub use insights::{extract_detailed_insights, DetailedInsights, TotalSavings};
pub use lcp::{enhance_lcp_element, EnhancedLcpElement, LcpElementType, LoadingMechanism};
pub use opportunities::{select_opportunities, ActionStep, KeyOpportunity, OpportunityId};
pub use report::{generate_report, ActionableReport, NextStep, ReportSummary};
