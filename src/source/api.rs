//! Public API for the repository source system
//!
//! This module provides the complete public API for repository access and
//! traversal. External modules should import from here rather than directly
//! from internal modules.

// Listing and traversal data model
pub use crate::source::types::{AnalysisUnit, EntryKind, RepoEntry, TraversalStats};

// Errors
pub use crate::source::error::{SourceError, SourceResult};

// Source trait and the GitHub-backed implementation
pub use crate::source::github::GithubSource;
pub use crate::source::traits::RepositorySource;

// Path filtering and tree traversal
pub use crate::source::filter::{decide, extension, has_skipped_segment, FilterDecision};
pub use crate::source::traverser::RepositoryTraverser;
