//! Scan lifecycle orchestration
//!
//! The manager owns the pipeline: claim a pending scan, traverse the
//! repository, aggregate per-file analysis, summarize, persist the outcome.
//! Creation and execution are decoupled through the executor's channel, so
//! `create_scan` returns as soon as the record is persisted.

use crate::analysis::api::{AnalysisAggregator, AnalysisClient, Finding, Summary, SummaryGenerator};
use crate::core::ids;
use crate::scan::error::{ScanError, ScanResult};
use crate::scan::executor::ScanExecutor;
use crate::scan::traits::ScanStore;
use crate::scan::types::{CreateScanRequest, PipelineSettings, Scan, ScanKind, ScanStatus};
use crate::source::api::{RepositorySource, RepositoryTraverser};
use chrono::Utc;
use std::sync::{Arc, OnceLock};
use tokio::sync::mpsc;

pub struct ScanManager {
    store: Arc<dyn ScanStore>,
    traverser: RepositoryTraverser,
    aggregator: AnalysisAggregator,
    summarizer: SummaryGenerator,
    settings: PipelineSettings,
    // Weak so executor shutdown closes the channel even while the manager
    // lives on
    submitter: OnceLock<mpsc::WeakSender<String>>,
}

impl ScanManager {
    pub fn new(
        store: Arc<dyn ScanStore>,
        source: Arc<dyn RepositorySource>,
        analyzer: Arc<dyn AnalysisClient>,
        settings: PipelineSettings,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            traverser: RepositoryTraverser::new(source, settings.max_content_bytes),
            aggregator: AnalysisAggregator::new(analyzer.clone(), settings.analysis_workers),
            summarizer: SummaryGenerator::new(analyzer),
            settings,
            submitter: OnceLock::new(),
        })
    }

    /// Start the execution dispatcher and wire newly created scans into it.
    /// The returned executor owns the dispatcher task.
    pub fn attach_executor(self: &Arc<Self>, capacity: usize) -> ScanExecutor {
        let executor = ScanExecutor::spawn(Arc::downgrade(self), capacity);
        if self.submitter.set(executor.sender().downgrade()).is_err() {
            log::warn!("Scan executor already attached, keeping the original");
        }
        executor
    }

    /// Persist a new scan in the pending state and submit it for execution.
    ///
    /// Submission is fire-and-forget: a scheduling failure is logged and
    /// the scan stays pending, but creation itself succeeds.
    pub async fn create_scan(&self, request: CreateScanRequest) -> ScanResult<Scan> {
        validate_request(&request)?;

        let now = Utc::now();
        let scan = Scan {
            id: ids::scan_id(&request.target),
            owner: request.owner,
            name: request.name,
            description: request.description,
            kind: request.kind,
            target: request.target,
            branch: request.branch.unwrap_or_else(|| "main".to_string()),
            status: ScanStatus::Pending,
            created_at: now,
            updated_at: now,
            started_at: None,
            completed_at: None,
            duration_ms: None,
            results: None,
            summary: None,
            error: None,
        };
        self.store.create(scan.clone()).await?;
        log::info!("Created scan '{}' for '{}'", scan.id, scan.target);

        self.submit_for_execution(&scan.id);
        Ok(scan)
    }

    pub async fn get_scan(&self, scan_id: &str) -> ScanResult<Scan> {
        Ok(self.store.get(scan_id).await?)
    }

    /// One owner's scans, newest first, with the owner's total count.
    pub async fn list_scans(
        &self,
        owner: &str,
        limit: usize,
        offset: usize,
    ) -> ScanResult<(Vec<Scan>, usize)> {
        Ok(self.store.list_by_owner(owner, limit, offset).await?)
    }

    /// Execute a pending scan to a terminal state.
    ///
    /// The pending to in-progress transition is an atomic claim in the
    /// store, so racing callers on one scan id resolve to a single
    /// execution; every loser observes `InvalidState`.
    pub async fn start_scan(&self, scan_id: &str) -> ScanResult<()> {
        let scan = self.store.get(scan_id).await?;
        if scan.status != ScanStatus::Pending {
            return Err(ScanError::InvalidState {
                scan_id: scan_id.to_string(),
                status: scan.status,
            });
        }

        let started_at = Utc::now();
        let claimed = self
            .store
            .transition_status(scan_id, ScanStatus::Pending, ScanStatus::InProgress, started_at)
            .await?;
        if !claimed {
            let current = self.store.get(scan_id).await?;
            return Err(ScanError::InvalidState {
                scan_id: scan_id.to_string(),
                status: current.status,
            });
        }
        log::info!(
            "Scan '{}' started for '{}' on branch '{}'",
            scan_id,
            scan.target,
            scan.branch
        );

        let deadline = self.settings.scan_deadline;
        let outcome = match tokio::time::timeout(deadline, self.run_pipeline(&scan)).await {
            Ok(result) => result,
            Err(_) => Err(ScanError::Deadline {
                scan_id: scan_id.to_string(),
                limit_secs: deadline.as_secs(),
            }),
        };

        match outcome {
            Ok((findings, summary)) => {
                let completed_at = Utc::now();
                let duration_ms = (completed_at - started_at).num_milliseconds();
                self.store
                    .update_results(scan_id, findings, summary, completed_at, duration_ms)
                    .await?;
                log::info!("Scan '{}' completed in {}ms", scan_id, duration_ms);
                Ok(())
            }
            Err(e) => {
                self.record_failure(scan_id, &e).await;
                Err(e)
            }
        }
    }

    async fn run_pipeline(&self, scan: &Scan) -> ScanResult<(Vec<Finding>, Summary)> {
        if scan.kind != ScanKind::Repository {
            return Err(ScanError::UnsupportedKind { kind: scan.kind });
        }

        let (tx, rx) = mpsc::channel(self.settings.unit_capacity);
        let traverser = self.traverser.clone();
        let target = scan.target.clone();
        let branch = scan.branch.clone();
        let producer =
            tokio::spawn(async move { traverser.traverse(&target, &branch, tx).await });

        let (findings, _stats) = self.aggregator.aggregate(rx).await;

        match producer.await {
            Ok(Ok(_stats)) => {}
            Ok(Err(e)) => return Err(e.into()),
            Err(join_err) => {
                return Err(ScanError::Internal {
                    message: format!("traversal task failed: {}", join_err),
                });
            }
        }

        let summary = self.summarizer.generate(&findings).await?;
        Ok((findings, summary))
    }

    async fn record_failure(&self, scan_id: &str, error: &ScanError) {
        log::error!("Scan '{}' failed: {}", scan_id, error);
        let result = self
            .store
            .update_status(
                scan_id,
                ScanStatus::Failed,
                Some(Utc::now()),
                Some(error.to_string()),
            )
            .await;
        if let Err(store_err) = result {
            log::error!(
                "Could not record failure of scan '{}': {}",
                scan_id,
                store_err
            );
        }
    }

    fn submit_for_execution(&self, scan_id: &str) {
        let sender = self.submitter.get().and_then(|weak| weak.upgrade());
        match sender {
            Some(tx) => {
                if let Err(e) = tx.try_send(scan_id.to_string()) {
                    log::error!("Failed to schedule scan '{}' for execution: {}", scan_id, e);
                }
            }
            None => log::warn!("No running executor, scan '{}' stays pending", scan_id),
        }
    }
}

fn validate_request(request: &CreateScanRequest) -> ScanResult<()> {
    if request.owner.trim().is_empty() {
        return Err(ScanError::Validation {
            message: "scan owner must not be empty".to_string(),
        });
    }
    if request.name.trim().is_empty() {
        return Err(ScanError::Validation {
            message: "scan name must not be empty".to_string(),
        });
    }
    if request.target.trim().is_empty() {
        return Err(ScanError::Validation {
            message: "scan target must not be empty".to_string(),
        });
    }
    Ok(())
}
