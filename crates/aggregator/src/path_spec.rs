use std::path::{Component, Path, PathBuf};

/// How a configured context path is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecKind {
    /// Read exactly the named file.
    File,
    /// Recurse into the named directory and read every file below it.
    Directory,
}

/// A configured context path resolved against the working directory.
///
/// Classification is purely syntactic: a trailing path separator marks a
/// directory to scan recursively, anything else names a single file. The
/// filesystem is never consulted here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSpec {
    raw: String,
    kind: SpecKind,
    path: PathBuf,
}

impl PathSpec {
    pub fn classify(working_dir: &Path, raw: &str) -> Self {
        let kind = if raw.ends_with(std::path::is_separator) {
            SpecKind::Directory
        } else {
            SpecKind::File
        };
        Self {
            raw: raw.to_string(),
            kind,
            path: join_clean(working_dir, raw),
        }
    }

    /// The string as it appeared in configuration.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> SpecKind {
        self.kind
    }

    /// File path for single-file specs, walk root for directory specs.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Appends `rel` below `base` and cleans the result lexically.
///
/// A leading separator or drive prefix on `rel` does not escape `base`;
/// `.` components vanish and `..` pops the previous normal component.
pub(crate) fn join_clean(base: &Path, rel: &str) -> PathBuf {
    let rel_parts = Path::new(rel)
        .components()
        .filter(|c| !matches!(c, Component::Prefix(_) | Component::RootDir));

    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in base.components().chain(rel_parts) {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}
