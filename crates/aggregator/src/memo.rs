use once_cell::sync::Lazy;
use tokio::sync::OnceCell;

use crate::aggregate::ContextAggregator;
use crate::config::AggregatorConfig;

/// One-shot cache for a rendered aggregation.
///
/// The first caller runs the aggregation; callers arriving while it runs
/// wait for it, and every later caller gets the same string back without
/// touching the filesystem. The value is never invalidated.
#[derive(Debug, Default)]
pub struct ContextMemo {
    cell: OnceCell<String>,
}

impl ContextMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_aggregate(&self, aggregator: &ContextAggregator) -> &str {
        self.get_or_aggregate_with(|| aggregator.clone()).await
    }

    /// Like [`ContextMemo::get_or_aggregate`], but only builds the
    /// aggregator if this call ends up computing the value.
    pub async fn get_or_aggregate_with<F>(&self, build: F) -> &str
    where
        F: FnOnce() -> ContextAggregator,
    {
        if let Some(cached) = self.cell.get() {
            log::debug!("Reusing memoized project context ({} bytes)", cached.len());
            return cached;
        }
        self.cell
            .get_or_init(|| async move { build().aggregate().await.render() })
            .await
    }

    pub fn get(&self) -> Option<&str> {
        self.cell.get().map(String::as_str)
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}

static PROCESS_CONTEXT: Lazy<ContextMemo> = Lazy::new(ContextMemo::new);

/// Project context for this process, aggregated on first use.
///
/// Only the first call's configuration is used; later calls return the
/// cached text whatever they pass.
pub async fn project_context(config: &AggregatorConfig) -> &'static str {
    PROCESS_CONTEXT
        .get_or_aggregate_with(|| ContextAggregator::new(config))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{CountingSource, LocalFs};
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[tokio::test]
    async fn second_call_is_served_from_cache() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("CLAUDE.md"), "rules").unwrap();
        fs::create_dir_all(temp.path().join("docs")).unwrap();
        fs::write(temp.path().join("docs").join("a.md"), "a").unwrap();
        let source = Arc::new(CountingSource::new(LocalFs));
        let aggregator = ContextAggregator::from_paths(temp.path(), &["CLAUDE.md", "docs/"])
            .with_source(source.clone());
        let memo = ContextMemo::new();

        assert!(!memo.is_initialized());
        let first = memo.get_or_aggregate(&aggregator).await.to_string();
        let accesses_after_first = source.accesses();
        let second = memo.get_or_aggregate(&aggregator).await.to_string();

        assert_eq!(first, second);
        assert_eq!(source.accesses(), accesses_after_first);
        assert_eq!(source.reads(), 2);
        assert_eq!(memo.get(), Some(first.as_str()));
    }

    #[tokio::test]
    async fn cached_value_survives_filesystem_changes() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.md"), "before").unwrap();
        let aggregator = ContextAggregator::from_paths(temp.path(), &["a.md", "b.md"]);
        let memo = ContextMemo::new();

        let first = memo.get_or_aggregate(&aggregator).await.to_string();
        fs::write(temp.path().join("a.md"), "after").unwrap();
        fs::write(temp.path().join("b.md"), "new").unwrap();
        let second = memo.get_or_aggregate(&aggregator).await.to_string();

        assert_eq!(first, second);
        assert!(second.ends_with("before"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_callers_share_one_computation() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("rules")).unwrap();
        for i in 0..10 {
            fs::write(temp.path().join("rules").join(format!("{i}.md")), "x").unwrap();
        }
        let source = Arc::new(CountingSource::new(LocalFs));
        let aggregator = Arc::new(
            ContextAggregator::from_paths(temp.path(), &["rules/"]).with_source(source.clone()),
        );
        let memo = Arc::new(ContextMemo::new());

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let memo = Arc::clone(&memo);
                let aggregator = Arc::clone(&aggregator);
                tokio::spawn(async move { memo.get_or_aggregate(&aggregator).await.to_string() })
            })
            .collect();

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap());
        }

        assert!(results.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(source.walks(), 1);
        assert_eq!(source.reads(), 10);
    }

    #[tokio::test]
    async fn builder_runs_only_for_the_computing_call() {
        let temp = tempdir().unwrap();
        let memo = ContextMemo::new();
        let mut builds = 0;

        memo.get_or_aggregate_with(|| {
            builds += 1;
            ContextAggregator::from_paths(temp.path(), &["none.md"])
        })
        .await;
        memo.get_or_aggregate_with(|| {
            builds += 1;
            ContextAggregator::from_paths(temp.path(), &["none.md"])
        })
        .await;

        assert_eq!(builds, 1);
        assert_eq!(memo.get(), Some(""));
    }
}
