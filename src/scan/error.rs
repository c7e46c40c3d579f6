//! Scan Error Types

use crate::analysis::api::AnalysisError;
use crate::scan::types::{ScanKind, ScanStatus};
use crate::source::api::SourceError;

/// Persistence failures reported by a ScanStore implementation
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Scan '{scan_id}' not found")]
    NotFound { scan_id: String },

    #[error("Scan store backend failure: {message}")]
    Backend { message: String },
}

/// Result type for scan store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Scan '{scan_id}' not found")]
    NotFound { scan_id: String },

    #[error("Scan '{scan_id}' is {status}, only pending scans can be started")]
    InvalidState { scan_id: String, status: ScanStatus },

    #[error("Scan kind '{kind}' is not supported for execution")]
    UnsupportedKind { kind: ScanKind },

    #[error("Scan '{scan_id}' exceeded its {limit_secs}s deadline")]
    Deadline { scan_id: String, limit_secs: u64 },

    #[error("Invalid scan request: {message}")]
    Validation { message: String },

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Scan store failure: {message}")]
    Store { message: String },

    #[error("Internal scan failure: {message}")]
    Internal { message: String },
}

impl From<StoreError> for ScanError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { scan_id } => ScanError::NotFound { scan_id },
            StoreError::Backend { message } => ScanError::Store { message },
        }
    }
}

/// Result type for scan operations
pub type ScanResult<T> = Result<T, ScanError>;
