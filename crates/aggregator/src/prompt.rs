use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const PROJECT_CONTEXT_HEADING: &str =
    "# Project-Specific Context\n Make sure to follow the instructions in the context below\n";

/// Agents that a system prompt can be assembled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Coder,
    Task,
    Title,
    Summarizer,
}

impl AgentKind {
    /// Only agents that act on the project receive its context.
    pub fn wants_project_context(self) -> bool {
        matches!(self, Self::Coder | Self::Task)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Coder => "coder",
            Self::Task => "task",
            Self::Title => "title",
            Self::Summarizer => "summarizer",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coder" => Ok(Self::Coder),
            "task" => Ok(Self::Task),
            "title" => Ok(Self::Title),
            "summarizer" => Ok(Self::Summarizer),
            other => Err(format!("unknown agent: {other}")),
        }
    }
}

/// Append aggregated project context to an agent's base prompt.
pub fn splice_project_context(base: &str, agent: AgentKind, context: &str) -> String {
    if !agent.wants_project_context() || context.is_empty() {
        return base.to_string();
    }
    format!("{base}\n\n{PROJECT_CONTEXT_HEADING}{context}")
}
