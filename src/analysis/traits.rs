//! Traits for the analysis system

use crate::analysis::error::AnalysisResult;
use crate::analysis::types::{Finding, Summary};
use async_trait::async_trait;

/// External content-analysis capability
///
/// Implementations wrap whatever model or service actually inspects the
/// code. The pipeline treats content as opaque text, so implementations can
/// swap freely behind this trait.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    /// Analyze one file's content and return the issues found in it.
    /// An empty list is a valid answer.
    async fn analyze(&self, content: &str, language_hint: &str) -> AnalysisResult<Vec<Finding>>;

    /// Produce a severity-bucketed summary over a finished finding set
    async fn summarize(&self, findings: &[Finding]) -> AnalysisResult<Summary>;
}
