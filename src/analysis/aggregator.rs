//! Concurrent analysis dispatch and result merging
//!
//! A fixed pool of workers drains the traversal channel and submits each
//! unit to the analysis client. The pool size is the system's backpressure
//! against the external rate limit. Failures stay unit-local: a failed unit
//! contributes zero findings and never aborts the run.

use crate::analysis::traits::AnalysisClient;
use crate::analysis::types::Finding;
use crate::core::ids;
use crate::source::api::AnalysisUnit;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

/// Per-run statistics, surfaced in logs on completion
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AggregateStats {
    pub units_analyzed: usize,
    pub units_failed: usize,
    pub findings: usize,
}

pub struct AnalysisAggregator {
    client: Arc<dyn AnalysisClient>,
    workers: usize,
}

impl AnalysisAggregator {
    pub fn new(client: Arc<dyn AnalysisClient>, workers: usize) -> Self {
        Self {
            client,
            workers: workers.max(1),
        }
    }

    /// Consume the traversal channel until it closes and merge all findings.
    ///
    /// The merge runs in completion order. Each finding gets its location
    /// rewritten to the unit's path and a scan-scoped sequential id, since
    /// analyzer-supplied ids may collide across files.
    pub async fn aggregate(
        &self,
        rx: mpsc::Receiver<AnalysisUnit>,
    ) -> (Vec<Finding>, AggregateStats) {
        let shared_rx = Arc::new(Mutex::new(rx));
        let (result_tx, mut result_rx) = mpsc::channel(self.workers);

        let mut pool = JoinSet::new();
        for worker in 0..self.workers {
            let shared_rx = Arc::clone(&shared_rx);
            let result_tx = result_tx.clone();
            let client = Arc::clone(&self.client);
            pool.spawn(async move {
                loop {
                    let unit = match shared_rx.lock().await.recv().await {
                        Some(unit) => unit,
                        None => break,
                    };
                    log::debug!("Worker {} analyzing '{}'", worker, unit.path);
                    let outcome = client.analyze(&unit.content, &unit.language_hint).await;
                    if result_tx.send((unit, outcome)).await.is_err() {
                        break;
                    }
                }
            });
        }
        drop(result_tx);

        let mut findings: Vec<Finding> = Vec::new();
        let mut stats = AggregateStats::default();
        while let Some((unit, outcome)) = result_rx.recv().await {
            match outcome {
                Ok(batch) => {
                    stats.units_analyzed += 1;
                    for mut finding in batch {
                        finding.location = unit.path.clone();
                        finding.id = ids::finding_id(findings.len() + 1);
                        findings.push(finding);
                    }
                }
                Err(e) => {
                    stats.units_failed += 1;
                    log::warn!(
                        "Analysis of '{}' failed, continuing without it: {}",
                        unit.path,
                        e
                    );
                }
            }
        }

        while let Some(joined) = pool.join_next().await {
            if let Err(e) = joined {
                log::warn!("Analysis worker terminated abnormally: {}", e);
            }
        }

        stats.findings = findings.len();
        log::info!(
            "Aggregation finished: {} units analyzed, {} failed, {} findings",
            stats.units_analyzed,
            stats.units_failed,
            stats.findings
        );
        (findings, stats)
    }
}
