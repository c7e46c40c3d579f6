//! Aggregator Tests - Concurrent unit analysis and merge behavior

#[cfg(test)]
mod tests {
    use crate::analysis::api::{
        AnalysisAggregator, AnalysisClient, AnalysisError, AnalysisResult, Finding, Severity,
        Summary,
    };
    use crate::source::api::AnalysisUnit;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    /// Analyzer scripted through unit content: "fail" errors, "findings:N"
    /// returns N findings carrying the analyzer's own bogus id and location.
    struct ScriptedAnalyzer {
        calls: AtomicUsize,
    }

    impl ScriptedAnalyzer {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AnalysisClient for ScriptedAnalyzer {
        async fn analyze(
            &self,
            content: &str,
            _language_hint: &str,
        ) -> AnalysisResult<Vec<Finding>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if content == "fail" {
                return Err(AnalysisError::Unavailable {
                    message: "scripted failure".to_string(),
                });
            }
            let count = content
                .strip_prefix("findings:")
                .and_then(|n| n.parse::<usize>().ok())
                .unwrap_or(0);
            Ok((0..count)
                .map(|i| Finding {
                    id: "model-id".to_string(),
                    module: "authentication".to_string(),
                    name: format!("issue-{}", i),
                    description: "hardcoded secret".to_string(),
                    severity: Severity::High,
                    location: "made-up-by-model.py".to_string(),
                    line_number: Some(1),
                    code: None,
                    recommendation: None,
                    references: Vec::new(),
                })
                .collect())
        }

        async fn summarize(&self, _findings: &[Finding]) -> AnalysisResult<Summary> {
            unreachable!("aggregator never summarizes")
        }
    }

    fn unit(path: &str, content: &str) -> AnalysisUnit {
        AnalysisUnit {
            path: path.to_string(),
            content: content.to_string(),
            language_hint: "Python".to_string(),
        }
    }

    #[tokio::test]
    async fn test_aggregate_merges_findings_from_all_units() {
        let analyzer = Arc::new(ScriptedAnalyzer::new());
        let aggregator = AnalysisAggregator::new(analyzer.clone(), 2);

        let (tx, rx) = mpsc::channel(8);
        tx.send(unit("src/a.py", "findings:1")).await.unwrap();
        tx.send(unit("src/b.py", "findings:2")).await.unwrap();
        tx.send(unit("src/c.py", "findings:1")).await.unwrap();
        drop(tx);

        let (findings, stats) = aggregator.aggregate(rx).await;

        assert_eq!(findings.len(), 4);
        assert_eq!(stats.units_analyzed, 3);
        assert_eq!(stats.units_failed, 0);
        assert_eq!(stats.findings, 4);
        assert_eq!(analyzer.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_aggregate_rewrites_location_and_assigns_sequential_ids() {
        let aggregator = AnalysisAggregator::new(Arc::new(ScriptedAnalyzer::new()), 1);

        let (tx, rx) = mpsc::channel(8);
        tx.send(unit("src/login.py", "findings:2")).await.unwrap();
        tx.send(unit("src/db.py", "findings:1")).await.unwrap();
        drop(tx);

        let (findings, _stats) = aggregator.aggregate(rx).await;

        // Model-supplied ids and locations must not survive the merge
        let ids: HashSet<&str> = findings.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(
            ids,
            HashSet::from(["finding-1", "finding-2", "finding-3"])
        );
        for finding in &findings {
            assert_ne!(finding.location, "made-up-by-model.py");
            assert!(finding.location == "src/login.py" || finding.location == "src/db.py");
        }
    }

    #[tokio::test]
    async fn test_aggregate_failed_unit_contributes_nothing() {
        let aggregator = AnalysisAggregator::new(Arc::new(ScriptedAnalyzer::new()), 2);

        let (tx, rx) = mpsc::channel(8);
        tx.send(unit("src/ok1.py", "findings:1")).await.unwrap();
        tx.send(unit("src/broken.py", "fail")).await.unwrap();
        tx.send(unit("src/ok2.py", "findings:1")).await.unwrap();
        drop(tx);

        let (findings, stats) = aggregator.aggregate(rx).await;

        assert_eq!(findings.len(), 2);
        assert_eq!(stats.units_analyzed, 2);
        assert_eq!(stats.units_failed, 1);
        assert_eq!(stats.findings, 2);
        for finding in &findings {
            assert_ne!(finding.location, "src/broken.py");
        }
    }

    #[tokio::test]
    async fn test_aggregate_empty_channel_yields_empty_results() {
        let aggregator = AnalysisAggregator::new(Arc::new(ScriptedAnalyzer::new()), 4);

        let (tx, rx) = mpsc::channel::<AnalysisUnit>(1);
        drop(tx);

        let (findings, stats) = aggregator.aggregate(rx).await;

        assert!(findings.is_empty());
        assert_eq!(stats.units_analyzed, 0);
        assert_eq!(stats.units_failed, 0);
        assert_eq!(stats.findings, 0);
    }

    #[tokio::test]
    async fn test_aggregate_pool_drains_backlog_larger_than_worker_count() {
        let analyzer = Arc::new(ScriptedAnalyzer::new());
        let aggregator = AnalysisAggregator::new(analyzer.clone(), 2);

        let (tx, rx) = mpsc::channel(16);
        for i in 0..10 {
            tx.send(unit(&format!("src/file{}.py", i), "findings:1"))
                .await
                .unwrap();
        }
        drop(tx);

        let (findings, stats) = aggregator.aggregate(rx).await;

        assert_eq!(findings.len(), 10);
        assert_eq!(stats.units_analyzed, 10);
        assert_eq!(analyzer.calls.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn test_aggregate_zero_workers_clamps_to_one() {
        let aggregator = AnalysisAggregator::new(Arc::new(ScriptedAnalyzer::new()), 0);

        let (tx, rx) = mpsc::channel(4);
        tx.send(unit("src/a.py", "findings:1")).await.unwrap();
        drop(tx);

        let (findings, stats) = aggregator.aggregate(rx).await;

        assert_eq!(findings.len(), 1);
        assert_eq!(stats.units_analyzed, 1);
    }
}
