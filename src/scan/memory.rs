//! In-memory scan store
//!
//! Reference `ScanStore` backing the CLI and tests. A single `RwLock`
//! serializes record writes, which also makes `transition_status` a true
//! compare-and-swap. Terminal records refuse further mutation.

use crate::analysis::api::{Finding, Summary};
use crate::scan::error::{StoreError, StoreResult};
use crate::scan::traits::ScanStore;
use crate::scan::types::{Scan, ScanStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;

pub struct MemoryScanStore {
    scans: RwLock<HashMap<String, Scan>>,
}

impl MemoryScanStore {
    pub fn new() -> Self {
        Self {
            scans: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryScanStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScanStore for MemoryScanStore {
    async fn create(&self, scan: Scan) -> StoreResult<()> {
        let mut scans = self.scans.write().unwrap();
        if scans.contains_key(&scan.id) {
            return Err(StoreError::Backend {
                message: format!("scan '{}' already exists", scan.id),
            });
        }
        scans.insert(scan.id.clone(), scan);
        Ok(())
    }

    async fn get(&self, scan_id: &str) -> StoreResult<Scan> {
        self.scans
            .read()
            .unwrap()
            .get(scan_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                scan_id: scan_id.to_string(),
            })
    }

    async fn transition_status(
        &self,
        scan_id: &str,
        from: ScanStatus,
        to: ScanStatus,
        started_at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let mut scans = self.scans.write().unwrap();
        let scan = scans.get_mut(scan_id).ok_or_else(|| StoreError::NotFound {
            scan_id: scan_id.to_string(),
        })?;

        if scan.status != from {
            return Ok(false);
        }
        scan.status = to;
        scan.started_at = Some(started_at);
        scan.updated_at = Utc::now();
        Ok(true)
    }

    async fn update_status(
        &self,
        scan_id: &str,
        status: ScanStatus,
        completed_at: Option<DateTime<Utc>>,
        error: Option<String>,
    ) -> StoreResult<()> {
        let mut scans = self.scans.write().unwrap();
        let scan = scans.get_mut(scan_id).ok_or_else(|| StoreError::NotFound {
            scan_id: scan_id.to_string(),
        })?;

        if scan.status.is_terminal() {
            return Err(StoreError::Backend {
                message: format!("scan '{}' is {} and cannot change", scan_id, scan.status),
            });
        }
        scan.status = status;
        if completed_at.is_some() {
            scan.completed_at = completed_at;
        }
        scan.error = error;
        scan.updated_at = Utc::now();
        Ok(())
    }

    async fn update_results(
        &self,
        scan_id: &str,
        findings: Vec<Finding>,
        summary: Summary,
        completed_at: DateTime<Utc>,
        duration_ms: i64,
    ) -> StoreResult<()> {
        let mut scans = self.scans.write().unwrap();
        let scan = scans.get_mut(scan_id).ok_or_else(|| StoreError::NotFound {
            scan_id: scan_id.to_string(),
        })?;

        if scan.status.is_terminal() {
            return Err(StoreError::Backend {
                message: format!("scan '{}' is {} and cannot change", scan_id, scan.status),
            });
        }
        scan.status = ScanStatus::Completed;
        scan.results = Some(findings);
        scan.summary = Some(summary);
        scan.completed_at = Some(completed_at);
        scan.duration_ms = Some(duration_ms);
        scan.error = None;
        scan.updated_at = Utc::now();
        Ok(())
    }

    async fn list_by_owner(
        &self,
        owner: &str,
        limit: usize,
        offset: usize,
    ) -> StoreResult<(Vec<Scan>, usize)> {
        let scans = self.scans.read().unwrap();
        let mut owned: Vec<Scan> = scans
            .values()
            .filter(|s| s.owner == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = owned.len();
        let page = owned.into_iter().skip(offset).take(limit).collect();
        Ok((page, total))
    }
}
