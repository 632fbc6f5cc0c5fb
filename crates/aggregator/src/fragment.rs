use std::path::{Path, PathBuf};

/// Marker line that introduces every fragment.
pub const SOURCE_MARKER: &str = "# From:";

/// Separator placed between rendered fragments.
pub const FRAGMENT_SEPARATOR: &str = "\n";

/// The contribution of one file to the aggregated context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextFragment {
    /// Absolute path in its original letter case.
    pub source: PathBuf,
    pub content: String,
}

impl ContextFragment {
    /// Builds a fragment from raw file bytes. Invalid UTF-8 sequences are
    /// replaced rather than rejected.
    pub fn from_bytes(source: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        let content = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        };
        Self {
            source: source.into(),
            content,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// `# From:<path>` followed by the content on the next line.
    pub fn render(&self) -> String {
        let source = self.source.display().to_string();
        let mut out =
            String::with_capacity(SOURCE_MARKER.len() + source.len() + 1 + self.content.len());
        out.push_str(SOURCE_MARKER);
        out.push_str(&source);
        out.push('\n');
        out.push_str(&self.content);
        out
    }
}

/// Joins rendered fragments in the given order.
pub fn render_fragments(fragments: &[ContextFragment]) -> String {
    fragments
        .iter()
        .map(ContextFragment::render)
        .collect::<Vec<_>>()
        .join(FRAGMENT_SEPARATOR)
}
