//! Data models and structures for the web vitals auditor

pub mod audit;
pub mod config;
pub mod context;
pub mod result;

// Re-export main model types
pub use audit::{Audit, AuditDetails, AuditMap};
pub use config::Config;
pub use context::{DependencyCounts, Framework, ProjectContext};
pub use result::{CategoryScores, CoreWebVitals, FieldData, LcpElement, MetricValue, PerformanceResult};
