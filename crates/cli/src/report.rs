use anyhow::Result;
use context_aggregator::{AggregationResult, AggregationStats};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct GatherReport {
    pub working_dir: String,
    pub context_paths: Vec<String>,
    pub stats: AggregationStats,
    /// Sorted for stable output; aggregation order itself is arbitrary.
    pub sources: Vec<String>,
    pub bytes: usize,
}

impl GatherReport {
    pub fn new(working_dir: &Path, context_paths: &[String], result: &AggregationResult) -> Self {
        let mut sources: Vec<String> = result
            .sources()
            .into_iter()
            .map(|p| p.display().to_string())
            .collect();
        sources.sort();
        let bytes = result.fragments().iter().map(|f| f.content.len()).sum();
        Self {
            working_dir: working_dir.display().to_string(),
            context_paths: context_paths.to_vec(),
            stats: result.stats().clone(),
            sources,
            bytes,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        md.push_str("# Context gather report\n\n");
        md.push_str(&format!("- Working dir: `{}`\n", self.working_dir));
        md.push_str(&format!("- Paths: `{}`\n", self.context_paths.len()));
        md.push_str(&format!("- Files: `{}`\n", self.stats.files));
        md.push_str(&format!("- Bytes: `{}`\n", self.bytes));
        md.push_str(&format!("- Time: `{}ms`\n\n", self.stats.time_ms));

        md.push_str("| duplicates | unreadable | walk_errors | task_failures |\n");
        md.push_str("|---:|---:|---:|---:|\n");
        md.push_str(&format!(
            "| `{}` | `{}` | `{}` | `{}` |\n\n",
            self.stats.duplicates,
            self.stats.read_failures,
            self.stats.walk_errors,
            self.stats.task_failures
        ));

        md.push_str("## Sources\n\n");
        if self.sources.is_empty() {
            md.push_str("_none_\n");
        }
        for source in &self.sources {
            md.push_str(&format!("- `{}`\n", escape_backticks(source)));
        }
        md
    }
}

fn escape_backticks(value: &str) -> String {
    value.replace('`', "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(sources: Vec<&str>) -> GatherReport {
        GatherReport {
            working_dir: "/work".to_string(),
            context_paths: vec!["CLAUDE.md".to_string()],
            stats: AggregationStats {
                specs: 1,
                files: sources.len(),
                ..Default::default()
            },
            sources: sources.into_iter().map(str::to_string).collect(),
            bytes: 12,
        }
    }

    #[test]
    fn markdown_lists_sources() {
        let md = report(vec!["/work/CLAUDE.md"]).to_markdown();
        assert!(md.contains("- Files: `1`"));
        assert!(md.contains("- `/work/CLAUDE.md`"));
    }

    #[test]
    fn markdown_marks_empty_source_list() {
        let md = report(vec![]).to_markdown();
        assert!(md.contains("_none_"));
    }

    #[test]
    fn json_carries_stats() {
        let json = report(vec!["/work/CLAUDE.md"]).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["stats"]["files"], 1);
        assert_eq!(value["sources"][0], "/work/CLAUDE.md");
    }
}
