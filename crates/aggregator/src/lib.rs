//! # Context Aggregator
//!
//! Gathers project context files (agent rules, instructions, notes) into a
//! single text blob that can be spliced into a model prompt.
//!
//! ## Pipeline
//!
//! ```text
//! Context paths ("CLAUDE.md", ".cursor/rules/", ...)
//!     │
//!     ├──> PathSpec (trailing separator = recurse)
//!     │
//!     ├──> One blocking task per spec
//!     │      ├─> Directory walk (depth-first, files only)
//!     │      ├─> Deduplicator::claim (case-insensitive)
//!     │      └─> Read → "# From:<path>\n<content>"
//!     │
//!     ├──> Collector (drains the fragment channel)
//!     │
//!     └──> ContextMemo (computed once per process)
//! ```
//!
//! Missing paths, unreadable files and failed directory listings only
//! shrink the result; aggregation itself never returns an error. Fragment
//! order follows completion order and is not stable between runs.
//!
//! ## Example
//!
//! ```no_run
//! use context_aggregator::{project_context, AggregatorConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AggregatorConfig::new("/path/to/project", vec!["CLAUDE.md".into(), "docs/".into()]);
//!     let context = project_context(&config).await;
//!     println!("{context}");
//! }
//! ```

mod aggregate;
mod config;
mod dedup;
mod error;
mod fragment;
mod limits;
mod memo;
mod path_spec;
mod prompt;
mod source;
mod stats;
mod walker;

pub use aggregate::{aggregate_context, AggregationResult, ContextAggregator};
pub use config::{default_context_paths, AggregatorConfig, DEFAULT_CONTEXT_PATHS};
pub use dedup::{dedup_key, Deduplicator};
pub use error::{AggregatorError, Result};
pub use fragment::{render_fragments, ContextFragment, FRAGMENT_SEPARATOR, SOURCE_MARKER};
pub use limits::{CONCURRENCY_ENV, MAX_SPEC_CONCURRENCY};
pub use memo::{project_context, ContextMemo};
pub use path_spec::{PathSpec, SpecKind};
pub use prompt::{splice_project_context, AgentKind, PROJECT_CONTEXT_HEADING};
pub use source::{CountingSource, FileSource, FileWalk, LocalFs};
pub use stats::AggregationStats;
pub use walker::{walk_files, WalkFiles};
