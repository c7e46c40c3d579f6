//! Fire-and-forget scan execution
//!
//! A bounded channel carries scan ids from creation to a dispatcher task,
//! which spawns one execution task per id. The dispatcher holds the manager
//! weakly, so dropping the manager stops dispatch instead of leaking a task
//! that keeps it alive.

use crate::scan::manager::ScanManager;
use std::sync::Weak;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub struct ScanExecutor {
    tx: mpsc::Sender<String>,
    handle: JoinHandle<()>,
}

impl ScanExecutor {
    pub fn spawn(manager: Weak<ScanManager>, capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<String>(capacity.max(1));
        let handle = tokio::spawn(async move {
            log::debug!("Scan dispatcher started");
            while let Some(scan_id) = rx.recv().await {
                let manager = match manager.upgrade() {
                    Some(manager) => manager,
                    None => {
                        log::debug!("Scan manager dropped, dispatcher stopping");
                        break;
                    }
                };
                tokio::spawn(async move {
                    if let Err(e) = manager.start_scan(&scan_id).await {
                        log::error!("Execution of scan '{}' failed: {}", scan_id, e);
                    }
                });
            }
            log::debug!("Scan dispatcher stopped");
        });
        Self { tx, handle }
    }

    pub(crate) fn sender(&self) -> &mpsc::Sender<String> {
        &self.tx
    }

    /// Close the channel and wait for the dispatcher to drain queued ids.
    /// Executions already spawned keep running on the runtime.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(e) = self.handle.await {
            log::warn!("Scan dispatcher terminated abnormally: {}", e);
        }
    }
}
