//! Scan persistence abstraction
//!
//! The pipeline mutates scan records only through this trait, so storage
//! backends stay swappable and tests can observe every write. The single
//! concurrency-sensitive operation is `transition_status`, an atomic
//! compare-and-swap that grants exactly one caller the right to execute a
//! pending scan.

use crate::analysis::api::{Finding, Summary};
use crate::scan::error::StoreResult;
use crate::scan::types::{Scan, ScanStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait ScanStore: Send + Sync {
    /// Persist a new scan record.
    async fn create(&self, scan: Scan) -> StoreResult<()>;

    /// Fetch one scan by id.
    async fn get(&self, scan_id: &str) -> StoreResult<Scan>;

    /// Atomically transition `scan_id` from `from` to `to`, recording
    /// `started_at`. Returns `false` and leaves the record untouched when
    /// the current status is not `from`.
    async fn transition_status(
        &self,
        scan_id: &str,
        from: ScanStatus,
        to: ScanStatus,
        started_at: DateTime<Utc>,
    ) -> StoreResult<bool>;

    /// Set the status of a scan, together with a completion time and error
    /// message where the new status calls for them.
    async fn update_status(
        &self,
        scan_id: &str,
        status: ScanStatus,
        completed_at: Option<DateTime<Utc>>,
        error: Option<String>,
    ) -> StoreResult<()>;

    /// Record the outcome of a successful scan and mark it completed, as a
    /// single write.
    async fn update_results(
        &self,
        scan_id: &str,
        findings: Vec<Finding>,
        summary: Summary,
        completed_at: DateTime<Utc>,
        duration_ms: i64,
    ) -> StoreResult<()>;

    /// Page through one owner's scans, newest first. Returns the page and
    /// the owner's total scan count.
    async fn list_by_owner(
        &self,
        owner: &str,
        limit: usize,
        offset: usize,
    ) -> StoreResult<(Vec<Scan>, usize)>;
}
