//! Project technology-stack context
//!
//! Produced by an external detector (or hand-written) and supplied to the
//! analyzer as a JSON file. The report pipeline only ever reads it; this
//! tool never inspects a project's manifest files itself.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Detected meta-framework of the analyzed project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Framework {
    /// Canonical lowercase name (e.g. "next", "nuxt", "sveltekit")
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// "app" or "pages" for Next.js projects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub router_type: Option<String>,
    /// "ssr", "ssg", "isr", or "csr"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rendering_mode: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

/// Dependency counts from the project manifest
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyCounts {
    pub production: u32,
    pub development: u32,
    pub total: u32,
}

/// Technology stack of the project being audited
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<Framework>,
    /// "npm", "yarn", "pnpm", "bun"
    pub package_manager: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_tool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_library: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_solution: Option<String>,
    #[serde(default)]
    pub is_type_script: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_optimization: Option<String>,
    #[serde(default)]
    pub analytics: Vec<String>,
    #[serde(default)]
    pub third_party_integrations: Vec<String>,
    #[serde(default)]
    pub dependencies: DependencyCounts,
}

impl ProjectContext {
    /// Load a context file written by an external stack detector.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::io(format!("cannot read project context {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            AppError::parse(format!("invalid project context {}: {}", path.display(), e))
        })
    }

    /// True when the project uses the Next.js meta-framework. Several
    /// opportunity builders attach Next-specific guidance off this check.
    pub fn is_next(&self) -> bool {
        self.framework.as_ref().is_some_and(|f| f.name == "next")
    }
}
