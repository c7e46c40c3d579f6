//! Public API for the analysis system
//!
//! This module provides the complete public API for code analysis.
//! External modules should import from here rather than directly from
//! internal modules.

// Finding and summary data model
pub use crate::analysis::types::{Finding, ModuleCount, Severity, Summary};

// Errors
pub use crate::analysis::error::{AnalysisError, AnalysisResult};

// Client trait and the Claude-backed implementation
pub use crate::analysis::claude::ClaudeClient;
pub use crate::analysis::traits::AnalysisClient;

// Concurrent aggregation and summary generation
pub use crate::analysis::aggregator::{AggregateStats, AnalysisAggregator};
pub use crate::analysis::summary::SummaryGenerator;

// Tolerant JSON extraction for model output
pub use crate::analysis::parse::extract_json;
