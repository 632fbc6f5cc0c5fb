use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinSet;

use crate::config::AggregatorConfig;
use crate::dedup::Deduplicator;
use crate::fragment::{render_fragments, ContextFragment};
use crate::limits::SpecLimiter;
use crate::path_spec::{PathSpec, SpecKind};
use crate::source::{FileSource, LocalFs};
use crate::stats::{AggregationStats, StatsCounters};

/// Fragments gathered by one aggregation pass, in the order the collector
/// received them. That order varies between runs and carries no meaning.
#[derive(Debug, Clone, Default)]
pub struct AggregationResult {
    fragments: Vec<ContextFragment>,
    stats: AggregationStats,
}

impl AggregationResult {
    pub fn fragments(&self) -> &[ContextFragment] {
        &self.fragments
    }

    pub fn stats(&self) -> &AggregationStats {
        &self.stats
    }

    pub fn sources(&self) -> Vec<&Path> {
        self.fragments.iter().map(ContextFragment::source).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn render(&self) -> String {
        render_fragments(&self.fragments)
    }
}

/// Collects context files for a list of path specs.
///
/// Every spec runs as its own blocking task; tasks coordinate only through
/// a shared [`Deduplicator`] and the fragment channel. Failures are logged
/// and counted, never returned.
#[derive(Clone)]
pub struct ContextAggregator {
    specs: Vec<PathSpec>,
    source: Arc<dyn FileSource>,
    limiter: SpecLimiter,
}

impl std::fmt::Debug for ContextAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextAggregator")
            .field("specs", &self.specs)
            .field("max_concurrency", &self.limiter.limit())
            .finish()
    }
}

impl ContextAggregator {
    pub fn new(config: &AggregatorConfig) -> Self {
        Self::from_paths(&config.working_dir, &config.context_paths)
            .with_max_concurrency(config.effective_concurrency())
    }

    pub fn from_paths<S: AsRef<str>>(working_dir: &Path, paths: &[S]) -> Self {
        let specs = paths
            .iter()
            .map(AsRef::as_ref)
            .filter(|raw| {
                let blank = raw.trim().is_empty();
                if blank {
                    log::debug!("Ignoring blank context path");
                }
                !blank
            })
            .map(|raw| PathSpec::classify(working_dir, raw))
            .collect();

        Self {
            specs,
            source: Arc::new(LocalFs),
            limiter: SpecLimiter::default(),
        }
    }

    pub fn with_source(mut self, source: Arc<dyn FileSource>) -> Self {
        self.source = source;
        self
    }

    pub fn with_max_concurrency(mut self, limit: Option<usize>) -> Self {
        self.limiter = SpecLimiter::new(limit);
        self
    }

    pub fn specs(&self) -> &[PathSpec] {
        &self.specs
    }

    /// Run every spec concurrently and wait for all of them.
    pub async fn aggregate(&self) -> AggregationResult {
        let started = Instant::now();
        let dedup = Arc::new(Deduplicator::new());
        let counters = Arc::new(StatsCounters::default());
        let (tx, mut rx) = mpsc::unbounded_channel::<ContextFragment>();

        let mut tasks = JoinSet::new();
        for spec in &self.specs {
            let task = SpecTask {
                spec: spec.clone(),
                source: Arc::clone(&self.source),
                dedup: Arc::clone(&dedup),
                counters: Arc::clone(&counters),
                tx: tx.clone(),
            };
            let limiter = self.limiter.clone();
            tasks.spawn(async move {
                let _permit = limiter.acquire().await;
                tokio::task::spawn_blocking(move || task.run()).await
            });
        }
        // Only task-held senders remain, so the channel closes when the last
        // task finishes.
        drop(tx);

        let mut fragments = Vec::new();
        while let Some(fragment) = rx.recv().await {
            fragments.push(fragment);
        }

        let mut task_failures = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(err)) | Err(err) => {
                    task_failures += 1;
                    log::warn!("Context path task failed: {err}");
                }
            }
        }

        log::debug!("Claimed {} distinct context files", dedup.len());
        let stats = counters.snapshot(
            self.specs.len(),
            task_failures,
            started.elapsed().as_millis() as u64,
        );
        log::info!(
            "Aggregated {} context files from {} paths in {}ms ({} duplicates, {} unreadable)",
            stats.files,
            stats.specs,
            stats.time_ms,
            stats.duplicates,
            stats.read_failures
        );

        AggregationResult { fragments, stats }
    }
}

/// Everything one spec task needs, moved onto the blocking pool.
struct SpecTask {
    spec: PathSpec,
    source: Arc<dyn FileSource>,
    dedup: Arc<Deduplicator>,
    counters: Arc<StatsCounters>,
    tx: UnboundedSender<ContextFragment>,
}

impl SpecTask {
    fn run(self) {
        match self.spec.kind() {
            SpecKind::File => self.process_file(self.spec.path()),
            SpecKind::Directory => {
                for entry in self.source.walk(self.spec.path()) {
                    match entry {
                        Ok(path) => self.process_file(&path),
                        Err(err) => {
                            self.counters.add_walk_error();
                            log::debug!(
                                "Stopped walking context path {} ({}): {err}",
                                self.spec.raw(),
                                self.spec.path().display()
                            );
                            break;
                        }
                    }
                }
            }
        }
    }

    fn process_file(&self, path: &Path) {
        if !self.dedup.claim(path) {
            self.counters.add_duplicate();
            return;
        }

        match self.source.read(path) {
            Ok(bytes) => {
                self.counters.add_file();
                // The collector outlives every task, so the receiver is open.
                let _ = self.tx.send(ContextFragment::from_bytes(path, bytes));
            }
            Err(err) => {
                self.counters.add_read_failure();
                log::debug!("Skipping unreadable context file {}: {err}", path.display());
            }
        }
    }
}

/// One-off aggregation with the local filesystem, rendered to a string.
pub async fn aggregate_context<S: AsRef<str>>(working_dir: &Path, paths: &[S]) -> String {
    ContextAggregator::from_paths(working_dir, paths)
        .aggregate()
        .await
        .render()
}
