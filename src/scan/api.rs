//! Public API for the scan system
//!
//! This module provides the complete public API for scan lifecycle
//! management. External modules should import from here rather than
//! directly from internal modules.

// Scan record and lifecycle data model
pub use crate::scan::types::{CreateScanRequest, PipelineSettings, Scan, ScanKind, ScanStatus};

// Errors
pub use crate::scan::error::{ScanError, ScanResult, StoreError, StoreResult};

// Persistence trait and the in-memory reference store
pub use crate::scan::memory::MemoryScanStore;
pub use crate::scan::traits::ScanStore;

// Orchestration and fire-and-forget execution
pub use crate::scan::executor::ScanExecutor;
pub use crate::scan::manager::ScanManager;
