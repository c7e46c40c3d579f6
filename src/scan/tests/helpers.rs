//! Shared scripted collaborators for scan pipeline tests
//!
//! The source serves a single-directory repository from memory and the
//! analyzer reacts to content markers: "VULN" produces one finding, "FAIL"
//! errors the unit.

use crate::analysis::api::{
    AnalysisClient, AnalysisError, AnalysisResult, Finding, Severity, Summary,
};
use crate::scan::api::{
    CreateScanRequest, MemoryScanStore, PipelineSettings, Scan, ScanKind, ScanManager, ScanStore,
};
use crate::source::api::{EntryKind, RepoEntry, RepositorySource, SourceError, SourceResult};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub struct StaticSource {
    files: Vec<(String, String)>,
    fail_root: bool,
    list_delay: Duration,
}

impl StaticSource {
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        Self {
            files: files
                .iter()
                .map(|(p, c)| (p.to_string(), c.to_string()))
                .collect(),
            fail_root: false,
            list_delay: Duration::ZERO,
        }
    }

    pub fn failing() -> Self {
        Self {
            files: Vec::new(),
            fail_root: true,
            list_delay: Duration::ZERO,
        }
    }

    pub fn with_list_delay(mut self, delay: Duration) -> Self {
        self.list_delay = delay;
        self
    }
}

#[async_trait]
impl RepositorySource for StaticSource {
    async fn list(&self, _target: &str, path: &str, _branch: &str) -> SourceResult<Vec<RepoEntry>> {
        if !self.list_delay.is_zero() {
            tokio::time::sleep(self.list_delay).await;
        }
        if self.fail_root {
            return Err(SourceError::Unavailable {
                message: "scripted outage".to_string(),
            });
        }
        if !path.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .files
            .iter()
            .map(|(p, _)| RepoEntry {
                name: p.clone(),
                path: p.clone(),
                kind: EntryKind::File,
            })
            .collect())
    }

    async fn fetch(&self, _target: &str, path: &str, _branch: &str) -> SourceResult<String> {
        self.files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, c)| c.clone())
            .ok_or_else(|| SourceError::NotFound {
                resource: path.to_string(),
            })
    }

    async fn dominant_language(&self, _target: &str) -> SourceResult<String> {
        if self.fail_root {
            return Err(SourceError::Unavailable {
                message: "scripted outage".to_string(),
            });
        }
        Ok("Python".to_string())
    }
}

pub struct StaticAnalyzer {
    severity: Severity,
    fail_summary: bool,
}

impl StaticAnalyzer {
    pub fn reporting(severity: Severity) -> Self {
        Self {
            severity,
            fail_summary: false,
        }
    }

    pub fn with_failing_summary(mut self) -> Self {
        self.fail_summary = true;
        self
    }
}

#[async_trait]
impl AnalysisClient for StaticAnalyzer {
    async fn analyze(&self, content: &str, _language_hint: &str) -> AnalysisResult<Vec<Finding>> {
        if content.contains("FAIL") {
            return Err(AnalysisError::Unavailable {
                message: "scripted analyzer outage".to_string(),
            });
        }
        if content.contains("VULN") {
            return Ok(vec![Finding {
                id: "model-1".to_string(),
                module: "application".to_string(),
                name: "Hardcoded credential".to_string(),
                description: "A credential is embedded in source".to_string(),
                severity: self.severity,
                location: "model-location".to_string(),
                line_number: Some(1),
                code: Some("VULN".to_string()),
                recommendation: Some("Move the secret to configuration".to_string()),
                references: Vec::new(),
            }]);
        }
        Ok(Vec::new())
    }

    async fn summarize(&self, _findings: &[Finding]) -> AnalysisResult<Summary> {
        if self.fail_summary {
            return Err(AnalysisError::Summarization {
                message: "scripted summary failure".to_string(),
            });
        }
        Ok(Summary {
            short_summary: "Scripted summary".to_string(),
            detailed_analysis: "Scripted analysis".to_string(),
            recommendations: vec!["Fix the reported issues".to_string()],
            ..Summary::default()
        })
    }
}

pub fn test_settings() -> PipelineSettings {
    PipelineSettings {
        analysis_workers: 2,
        unit_capacity: 8,
        max_content_bytes: 64 * 1024,
        scan_deadline: Duration::from_secs(5),
    }
}

pub fn manager_with(
    source: Arc<dyn RepositorySource>,
    analyzer: Arc<dyn AnalysisClient>,
) -> Arc<ScanManager> {
    manager_with_settings(source, analyzer, test_settings())
}

pub fn manager_with_settings(
    source: Arc<dyn RepositorySource>,
    analyzer: Arc<dyn AnalysisClient>,
    settings: PipelineSettings,
) -> Arc<ScanManager> {
    let store: Arc<dyn ScanStore> = Arc::new(MemoryScanStore::new());
    ScanManager::new(store, source, analyzer, settings)
}

pub fn repo_request() -> CreateScanRequest {
    CreateScanRequest {
        owner: "user-1".to_string(),
        name: "app audit".to_string(),
        description: None,
        kind: ScanKind::Repository,
        target: "octocat/app".to_string(),
        branch: None,
    }
}

/// Poll until the scan leaves its non-terminal states
pub async fn wait_terminal(manager: &ScanManager, scan_id: &str) -> Scan {
    for _ in 0..200 {
        let scan = manager.get_scan(scan_id).await.unwrap();
        if scan.is_terminal() {
            return scan;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("scan '{}' did not reach a terminal state", scan_id);
}
