//! Traverser Tests - Depth-first walk, pruning, and failure containment

#[cfg(test)]
mod tests {
    use crate::source::api::{
        AnalysisUnit, EntryKind, RepoEntry, RepositorySource, RepositoryTraverser, SourceError,
        SourceResult,
    };
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    const MAX_BYTES: usize = 1024;

    /// In-memory repository with scriptable per-path failures
    #[derive(Default)]
    struct ScriptedSource {
        listings: HashMap<String, Vec<RepoEntry>>,
        files: HashMap<String, String>,
        fail_listings: HashSet<String>,
        fail_fetches: HashSet<String>,
        language: Option<String>,
    }

    impl ScriptedSource {
        fn new() -> Self {
            Self {
                language: Some("Python".to_string()),
                ..Self::default()
            }
        }

        fn with_dir(mut self, path: &str, entries: Vec<RepoEntry>) -> Self {
            self.listings.insert(path.to_string(), entries);
            self
        }

        fn with_file(mut self, path: &str, content: &str) -> Self {
            self.files.insert(path.to_string(), content.to_string());
            self
        }

        fn failing_listing(mut self, path: &str) -> Self {
            self.fail_listings.insert(path.to_string());
            self
        }

        fn failing_fetch(mut self, path: &str) -> Self {
            self.fail_fetches.insert(path.to_string());
            self
        }

        fn without_language(mut self) -> Self {
            self.language = None;
            self
        }
    }

    #[async_trait]
    impl RepositorySource for ScriptedSource {
        async fn list(
            &self,
            _target: &str,
            path: &str,
            _branch: &str,
        ) -> SourceResult<Vec<RepoEntry>> {
            if self.fail_listings.contains(path) {
                return Err(SourceError::Unavailable {
                    message: format!("scripted listing failure for '{}'", path),
                });
            }
            self.listings
                .get(path)
                .cloned()
                .ok_or_else(|| SourceError::NotFound {
                    resource: path.to_string(),
                })
        }

        async fn fetch(&self, _target: &str, path: &str, _branch: &str) -> SourceResult<String> {
            if self.fail_fetches.contains(path) {
                return Err(SourceError::Unavailable {
                    message: format!("scripted fetch failure for '{}'", path),
                });
            }
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| SourceError::NotFound {
                    resource: path.to_string(),
                })
        }

        async fn dominant_language(&self, _target: &str) -> SourceResult<String> {
            self.language.clone().ok_or(SourceError::Unavailable {
                message: "scripted language failure".to_string(),
            })
        }
    }

    fn file(name: &str, path: &str) -> RepoEntry {
        RepoEntry {
            name: name.to_string(),
            path: path.to_string(),
            kind: EntryKind::File,
        }
    }

    fn dir(name: &str, path: &str) -> RepoEntry {
        RepoEntry {
            name: name.to_string(),
            path: path.to_string(),
            kind: EntryKind::Dir,
        }
    }

    async fn run(source: ScriptedSource) -> (SourceResult<crate::source::api::TraversalStats>, Vec<AnalysisUnit>) {
        let traverser = RepositoryTraverser::new(Arc::new(source), MAX_BYTES);
        let (tx, mut rx) = mpsc::channel(64);
        let result = traverser.traverse("octocat/app", "main", tx).await;
        let mut units = Vec::new();
        while let Some(unit) = rx.recv().await {
            units.push(unit);
        }
        (result, units)
    }

    #[tokio::test]
    async fn test_traverse_submits_analyzable_files_depth_first() {
        let source = ScriptedSource::new()
            .with_dir(
                "",
                vec![
                    file("app.py", "app.py"),
                    dir("src", "src"),
                    file("README.md", "README.md"),
                ],
            )
            .with_dir(
                "src",
                vec![file("main.py", "src/main.py"), file("logo.png", "src/logo.png")],
            )
            .with_file("app.py", "print('app')")
            .with_file("src/main.py", "print('main')");

        let (result, units) = run(source).await;
        let stats = result.unwrap();

        let paths: Vec<&str> = units.iter().map(|u| u.path.as_str()).collect();
        assert_eq!(paths, vec!["app.py", "src/main.py"]);
        assert_eq!(units[0].content, "print('app')");
        assert_eq!(units[0].language_hint, "py");
        assert_eq!(stats.directories_listed, 2);
        assert_eq!(stats.files_submitted, 2);
        assert_eq!(stats.entries_skipped, 2);
        assert_eq!(stats.subtrees_abandoned, 0);
    }

    #[tokio::test]
    async fn test_traverse_prunes_denylisted_directories_without_listing() {
        // node_modules has no listing scripted; traversal must never ask for it
        let source = ScriptedSource::new()
            .with_dir(
                "",
                vec![dir("node_modules", "node_modules"), file("app.py", "app.py")],
            )
            .with_file("app.py", "print('app')");

        let (result, units) = run(source).await;
        let stats = result.unwrap();

        assert_eq!(units.len(), 1);
        assert_eq!(stats.directories_listed, 1);
        assert_eq!(stats.entries_skipped, 1);
    }

    #[tokio::test]
    async fn test_traverse_abandons_failing_subtree_and_continues() {
        let source = ScriptedSource::new()
            .with_dir(
                "",
                vec![dir("broken", "broken"), dir("good", "good")],
            )
            .with_dir("good", vec![file("ok.py", "good/ok.py")])
            .with_file("good/ok.py", "x = 1")
            .failing_listing("broken");

        let (result, units) = run(source).await;
        let stats = result.unwrap();

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].path, "good/ok.py");
        assert_eq!(stats.subtrees_abandoned, 1);
        assert_eq!(stats.directories_listed, 2);
    }

    #[tokio::test]
    async fn test_traverse_root_listing_failure_propagates() {
        let source = ScriptedSource::new().failing_listing("");

        let (result, units) = run(source).await;

        assert!(matches!(result, Err(SourceError::Unavailable { .. })));
        assert!(units.is_empty());
    }

    #[tokio::test]
    async fn test_traverse_language_lookup_failure_propagates() {
        let source = ScriptedSource::new()
            .with_dir("", vec![file("app.py", "app.py")])
            .with_file("app.py", "x = 1")
            .without_language();

        let (result, _units) = run(source).await;

        assert!(matches!(result, Err(SourceError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn test_traverse_fetch_failure_skips_single_file() {
        let source = ScriptedSource::new()
            .with_dir("", vec![file("a.py", "a.py"), file("b.py", "b.py")])
            .with_file("b.py", "x = 1")
            .failing_fetch("a.py");

        let (result, units) = run(source).await;
        let stats = result.unwrap();

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].path, "b.py");
        assert_eq!(stats.files_submitted, 1);
        assert_eq!(stats.entries_skipped, 1);
    }

    #[tokio::test]
    async fn test_traverse_skips_oversized_content() {
        let big = "x".repeat(MAX_BYTES + 1);
        let source = ScriptedSource::new()
            .with_dir("", vec![file("big.py", "big.py"), file("small.py", "small.py")])
            .with_file("big.py", &big)
            .with_file("small.py", "x = 1");

        let (result, units) = run(source).await;
        let stats = result.unwrap();

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].path, "small.py");
        assert_eq!(stats.entries_skipped, 1);
    }

    #[tokio::test]
    async fn test_traverse_stops_early_when_receiver_dropped() {
        let source = ScriptedSource::new()
            .with_dir("", vec![file("a.py", "a.py"), file("b.py", "b.py")])
            .with_file("a.py", "x = 1")
            .with_file("b.py", "x = 2");

        let traverser = RepositoryTraverser::new(Arc::new(source), MAX_BYTES);
        let (tx, rx) = mpsc::channel(64);
        drop(rx);

        let stats = traverser.traverse("octocat/app", "main", tx).await.unwrap();
        assert_eq!(stats.files_submitted, 0);
    }
}
