//! Finding and summary data model
//!
//! Serde forms mirror the analyzer wire contract: camelCase keys and
//! lowercase severity strings. Every optional field defaults so a sparse
//! model response still deserializes.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Issue severity, ordered least to most severe
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// One reported issue from analyzing a single file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Scan-scoped id, assigned at aggregation. Analyzer-supplied ids are
    /// overwritten since they may collide across files.
    #[serde(default)]
    pub id: String,
    /// Free-text category label supplied by the analyzer
    #[serde(default)]
    pub module: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub severity: Severity,
    /// Path of the analyzed file, rewritten at aggregation
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
}

/// Module label with its finding count, used in summary rankings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleCount {
    pub name: String,
    pub count: usize,
}

/// Aggregate severity judgment over all findings of a scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(default)]
    pub total_issues: usize,
    #[serde(default)]
    pub critical_count: usize,
    #[serde(default)]
    pub high_count: usize,
    #[serde(default)]
    pub medium_count: usize,
    #[serde(default)]
    pub low_count: usize,
    #[serde(default)]
    pub top_modules: Vec<ModuleCount>,
    #[serde(default)]
    pub short_summary: String,
    #[serde(default)]
    pub detailed_analysis: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
}
