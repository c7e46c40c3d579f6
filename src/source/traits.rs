//! Repository source abstraction
//!
//! A `RepositorySource` answers three questions about a hosted repository:
//! what is in a directory, what does a file contain, and what language
//! dominates the codebase. The traverser is written against this trait so
//! hosting providers stay swappable and tests can script a repository
//! in memory.

use crate::source::error::SourceResult;
use crate::source::types::RepoEntry;
use async_trait::async_trait;

#[async_trait]
pub trait RepositorySource: Send + Sync {
    /// List the entries of a directory. An empty `path` lists the
    /// repository root.
    async fn list(&self, target: &str, path: &str, branch: &str) -> SourceResult<Vec<RepoEntry>>;

    /// Fetch and decode the text content of a single file.
    async fn fetch(&self, target: &str, path: &str, branch: &str) -> SourceResult<String>;

    /// The language with the largest byte share in the repository, or
    /// `"Unknown"` when the source reports none.
    async fn dominant_language(&self, target: &str) -> SourceResult<String>;
}
