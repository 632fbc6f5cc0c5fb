use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AggregatorError, Result};
use crate::limits::spec_concurrency_from_env;

/// Context files picked up when a project does not configure its own list.
pub const DEFAULT_CONTEXT_PATHS: &[&str] = &[
    ".github/copilot-instructions.md",
    ".cursorrules",
    ".cursor/rules/",
    "CLAUDE.md",
    "CLAUDE.local.md",
    "opencode.md",
    "opencode.local.md",
    "OpenCode.md",
    "OpenCode.local.md",
    "OPENCODE.md",
    "OPENCODE.local.md",
];

pub fn default_context_paths() -> Vec<String> {
    DEFAULT_CONTEXT_PATHS.iter().map(|p| (*p).to_string()).collect()
}

/// Configuration for one context aggregation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Directory every context path is resolved against (must be absolute
    /// once resolved)
    #[serde(default, alias = "workingDir")]
    pub working_dir: PathBuf,

    /// Ordered context paths; a trailing separator means "scan recursively"
    #[serde(default = "default_context_paths", alias = "contextPaths")]
    pub context_paths: Vec<String>,

    /// Upper bound on concurrently running path tasks (unbounded if unset)
    #[serde(
        default,
        alias = "maxConcurrency",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_concurrency: Option<usize>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::new(),
            context_paths: default_context_paths(),
            max_concurrency: None,
        }
    }
}

impl AggregatorConfig {
    pub fn new(working_dir: impl Into<PathBuf>, context_paths: Vec<String>) -> Self {
        Self {
            working_dir: working_dir.into(),
            context_paths,
            max_concurrency: None,
        }
    }

    pub fn with_max_concurrency(mut self, limit: Option<usize>) -> Self {
        self.max_concurrency = limit;
        self
    }

    /// Load configuration from a JSON or TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes).map_err(|err| match err {
            AggregatorError::ConfigError(msg) => {
                AggregatorError::config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match serde_json::from_slice(bytes) {
            Ok(config) => Ok(config),
            Err(json_err) => {
                let utf8 = std::str::from_utf8(bytes)
                    .map_err(|err| AggregatorError::config(format!("{json_err}; {err}")))?;
                toml::from_str(utf8).map_err(|toml_err| {
                    AggregatorError::config(format!(
                        "not valid JSON or TOML ({json_err}); TOML parse error: {toml_err}"
                    ))
                })
            }
        }
    }

    /// Anchor an empty or relative working directory at `base`.
    pub fn resolve_working_dir(mut self, base: &Path) -> Self {
        if self.working_dir.as_os_str().is_empty() {
            self.working_dir = base.to_path_buf();
        } else if self.working_dir.is_relative() {
            self.working_dir = base.join(&self.working_dir);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.working_dir.is_absolute() {
            return Err(AggregatorError::InvalidWorkingDir(self.working_dir.clone()));
        }
        if self.max_concurrency == Some(0) {
            return Err(AggregatorError::invalid_config("max_concurrency must be > 0"));
        }
        Ok(())
    }

    /// Configured limit, falling back to `CONTEXT_PATHS_CONCURRENCY`.
    pub fn effective_concurrency(&self) -> Option<usize> {
        self.max_concurrency.or_else(spec_concurrency_from_env)
    }
}
