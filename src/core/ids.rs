//! Identifier construction for scans and findings
//!
//! Scan ids are SHA256-based with a `scan-` prefix. The digest covers the
//! target plus the creation instant and a process-local counter, so repeated
//! scans of the same target always get distinct ids.

use chrono::Utc;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};

static SCAN_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a unique scan id (`scan-<sha256>`)
pub fn scan_id(target: &str) -> String {
    let nonce = SCAN_COUNTER.fetch_add(1, Ordering::Relaxed);

    let mut hasher = Sha256::new();
    hasher.update(target.as_bytes());
    hasher.update(Utc::now().timestamp_micros().to_le_bytes());
    hasher.update(nonce.to_le_bytes());
    let hash_result = hasher.finalize();

    let hash_hex = format!("{:x}", hash_result);
    format!("scan-{}", hash_hex)
}

/// Scan-scoped finding id, assigned in merge order starting at 1
pub fn finding_id(sequence: usize) -> String {
    format!("finding-{}", sequence)
}
