//! Depth-first repository traversal
//!
//! Walks the repository tree through a `RepositorySource`, filters entries,
//! fetches analyzable files, and feeds them into a bounded channel. The
//! channel is the lazy sequence: sends block when the consumer lags, so
//! network fetches pace themselves to analysis throughput instead of
//! buffering the whole repository.

use crate::source::error::SourceResult;
use crate::source::filter::{self, FilterDecision};
use crate::source::traits::RepositorySource;
use crate::source::types::{AnalysisUnit, RepoEntry, TraversalStats};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct RepositoryTraverser {
    source: Arc<dyn RepositorySource>,
    max_content_bytes: usize,
}

impl RepositoryTraverser {
    pub fn new(source: Arc<dyn RepositorySource>, max_content_bytes: usize) -> Self {
        Self {
            source,
            max_content_bytes,
        }
    }

    /// Walk `target` on `branch`, sending each analyzable unit into `tx`.
    ///
    /// Failures resolving the repository itself, the dominant language
    /// lookup or the root listing, propagate and fail the traversal.
    /// Failures below the root only degrade coverage: a failed directory
    /// listing abandons that subtree, a failed file fetch skips that file.
    pub async fn traverse(
        &self,
        target: &str,
        branch: &str,
        tx: mpsc::Sender<AnalysisUnit>,
    ) -> SourceResult<TraversalStats> {
        let language = self.source.dominant_language(target).await?;
        log::info!("Dominant language of '{}' is {}", target, language);

        let root = self.source.list(target, "", branch).await?;
        let mut stats = TraversalStats {
            directories_listed: 1,
            ..TraversalStats::default()
        };
        self.walk(target, branch, &language, root, &tx, &mut stats)
            .await;

        log::info!(
            "Traversal of '{}' finished: {} directories listed, {} files submitted, {} skipped, {} subtrees abandoned",
            target,
            stats.directories_listed,
            stats.files_submitted,
            stats.entries_skipped,
            stats.subtrees_abandoned
        );
        Ok(stats)
    }

    // Recursion through an async fn needs the boxed indirection
    fn walk<'a>(
        &'a self,
        target: &'a str,
        branch: &'a str,
        language: &'a str,
        entries: Vec<RepoEntry>,
        tx: &'a mpsc::Sender<AnalysisUnit>,
        stats: &'a mut TraversalStats,
    ) -> BoxFuture<'a, ()> {
        async move {
            for entry in entries {
                if tx.is_closed() {
                    log::debug!("Analysis channel closed, stopping traversal early");
                    return;
                }
                match filter::decide(&entry.path, entry.kind) {
                    FilterDecision::Skip => {
                        stats.entries_skipped += 1;
                        log::trace!("Skipping '{}'", entry.path);
                    }
                    FilterDecision::Descend => {
                        match self.source.list(target, &entry.path, branch).await {
                            Ok(children) => {
                                stats.directories_listed += 1;
                                self.walk(target, branch, language, children, tx, &mut *stats)
                                    .await;
                            }
                            Err(e) => {
                                stats.subtrees_abandoned += 1;
                                log::warn!(
                                    "Listing '{}' failed, abandoning subtree: {}",
                                    entry.path,
                                    e
                                );
                            }
                        }
                    }
                    FilterDecision::Analyze => {
                        self.submit(target, branch, language, &entry, tx, stats).await;
                    }
                }
            }
        }
        .boxed()
    }

    async fn submit(
        &self,
        target: &str,
        branch: &str,
        language: &str,
        entry: &RepoEntry,
        tx: &mpsc::Sender<AnalysisUnit>,
        stats: &mut TraversalStats,
    ) {
        let content = match self.source.fetch(target, &entry.path, branch).await {
            Ok(content) => content,
            Err(e) => {
                stats.entries_skipped += 1;
                log::warn!("Fetching '{}' failed, skipping file: {}", entry.path, e);
                return;
            }
        };
        if content.len() > self.max_content_bytes {
            stats.entries_skipped += 1;
            log::debug!(
                "Skipping '{}': {} bytes exceeds the {} byte limit",
                entry.path,
                content.len(),
                self.max_content_bytes
            );
            return;
        }

        let language_hint =
            filter::extension(&entry.path).unwrap_or_else(|| language.to_string());
        let unit = AnalysisUnit {
            path: entry.path.clone(),
            content,
            language_hint,
        };
        if tx.send(unit).await.is_err() {
            log::debug!("Analysis channel closed while submitting '{}'", entry.path);
            return;
        }
        stats.files_submitted += 1;
    }
}
