//! Scan summary generation
//!
//! The free-text portions of a summary come from the analysis client; the
//! numeric portions are always recomputed locally from the merged findings
//! so that counts and module rankings agree with the stored results even
//! when the model miscounts.

use crate::analysis::error::AnalysisResult;
use crate::analysis::traits::AnalysisClient;
use crate::analysis::types::{Finding, ModuleCount, Severity, Summary};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Module ranking is capped to keep report output scannable
const TOP_MODULES_LIMIT: usize = 3;

pub struct SummaryGenerator {
    client: Arc<dyn AnalysisClient>,
}

impl SummaryGenerator {
    pub fn new(client: Arc<dyn AnalysisClient>) -> Self {
        Self { client }
    }

    /// Produce the scan summary for a merged findings list.
    ///
    /// An empty findings list short-circuits to a clean-scan summary without
    /// calling the client at all.
    pub async fn generate(&self, findings: &[Finding]) -> AnalysisResult<Summary> {
        if findings.is_empty() {
            log::debug!("No findings to summarize, producing clean-scan summary");
            return Ok(clean_summary());
        }
        let summary = self.client.summarize(findings).await?;
        Ok(normalize(summary, findings))
    }
}

fn clean_summary() -> Summary {
    Summary {
        short_summary: "No security issues were found.".to_string(),
        detailed_analysis: "The scan completed without identifying any security issues in the analyzed files.".to_string(),
        ..Summary::default()
    }
}

/// Overwrite the derived fields of a model-produced summary with values
/// recomputed from the findings themselves.
pub(crate) fn normalize(mut summary: Summary, findings: &[Finding]) -> Summary {
    summary.total_issues = findings.len();
    summary.critical_count = count_severity(findings, Severity::Critical);
    summary.high_count = count_severity(findings, Severity::High);
    summary.medium_count = count_severity(findings, Severity::Medium);
    summary.low_count = count_severity(findings, Severity::Low);
    summary.top_modules = rank_modules(findings);
    summary
}

fn count_severity(findings: &[Finding], severity: Severity) -> usize {
    findings.iter().filter(|f| f.severity == severity).count()
}

/// Rank modules by finding count descending, ties broken by name ascending.
pub(crate) fn rank_modules(findings: &[Finding]) -> Vec<ModuleCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for finding in findings {
        *counts.entry(finding.module.as_str()).or_insert(0) += 1;
    }
    let mut ranked: Vec<ModuleCount> = counts
        .into_iter()
        .map(|(name, count)| ModuleCount {
            name: name.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(TOP_MODULES_LIMIT);
    ranked
}
