//! Scan lifecycle data model
//!
//! Status and kind carry snake_case string forms on the wire. The record
//! invariant: `results` and `summary` are present exactly when the scan is
//! completed, `error` exactly when it failed, and terminal records are never
//! mutated again.

use crate::analysis::api::{Finding, Summary};
use crate::core::config::AppConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum_macros::{Display, EnumString};

/// Scan lifecycle states
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScanStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl ScanStatus {
    /// Terminal states accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanStatus::Completed | ScanStatus::Failed)
    }
}

/// What a scan points at. All kinds are accepted at creation; only
/// repository targets execute today, the rest fail fast when started.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScanKind {
    Repository,
    PullRequest,
    RawCode,
    Url,
}

/// One scan record as persisted in a ScanStore
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scan {
    pub id: String,
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    pub kind: ScanKind,
    /// Repository reference, e.g. `owner/repo`
    pub target: String,
    pub branch: String,
    pub status: ScanStatus,
    pub created_at: DateTime<Utc>,
    /// Maintained by the store on every write
    pub updated_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_ms: Option<i64>,
    pub results: Option<Vec<Finding>>,
    pub summary: Option<Summary>,
    pub error: Option<String>,
}

impl Scan {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Client request to create a scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScanRequest {
    pub owner: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub kind: ScanKind,
    pub target: String,
    /// Defaults to `main` when absent
    #[serde(default)]
    pub branch: Option<String>,
}

/// Tunables for one scan execution
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Concurrent analysis calls per scan
    pub analysis_workers: usize,
    /// Capacity of the traversal unit channel
    pub unit_capacity: usize,
    /// Files larger than this are skipped by the traverser
    pub max_content_bytes: usize,
    /// Overall wall-clock limit for one scan
    pub scan_deadline: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            analysis_workers: 4,
            unit_capacity: 32,
            max_content_bytes: 1024 * 1024,
            scan_deadline: Duration::from_secs(30 * 60),
        }
    }
}

impl From<&AppConfig> for PipelineSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            analysis_workers: config.analysis_workers,
            unit_capacity: config.unit_capacity,
            max_content_bytes: config.max_content_bytes,
            scan_deadline: Duration::from_secs(config.scan_deadline_secs),
        }
    }
}
