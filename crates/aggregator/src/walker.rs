use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lazy depth-first walk yielding the regular files below a root.
///
/// Directories are visited before the files they contain and contribute no
/// item themselves. Symbolic links are not followed and are not yielded.
/// The first error (missing root, unreadable subdirectory) is yielded once
/// and ends the walk; nothing after the failure point is visited.
pub struct WalkFiles {
    inner: walkdir::IntoIter,
    finished: bool,
}

pub fn walk_files(root: &Path) -> WalkFiles {
    WalkFiles {
        inner: WalkDir::new(root).follow_links(false).into_iter(),
        finished: false,
    }
}

impl Iterator for WalkFiles {
    type Item = io::Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            match self.inner.next() {
                None => {
                    self.finished = true;
                    return None;
                }
                Some(Ok(entry)) => {
                    if entry.file_type().is_file() {
                        return Some(Ok(entry.into_path()));
                    }
                }
                Some(Err(err)) => {
                    self.finished = true;
                    return Some(Err(io::Error::from(err)));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn yields_every_file_at_any_depth() {
        let temp = tempdir().unwrap();
        let deep = temp.path().join("a").join("b").join("c");
        fs::create_dir_all(&deep).unwrap();
        fs::write(temp.path().join("top.md"), "top").unwrap();
        fs::write(temp.path().join("a").join("one.md"), "1").unwrap();
        fs::write(deep.join("three.md"), "3").unwrap();

        let files: BTreeSet<PathBuf> = walk_files(temp.path()).map(|r| r.unwrap()).collect();

        let expected: BTreeSet<PathBuf> = [
            temp.path().join("top.md"),
            temp.path().join("a").join("one.md"),
            deep.join("three.md"),
        ]
        .into_iter()
        .collect();
        assert_eq!(files, expected);
    }

    #[test]
    fn empty_directories_yield_nothing() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("x").join("y")).unwrap();

        assert_eq!(walk_files(temp.path()).count(), 0);
    }

    #[test]
    fn missing_root_yields_single_error_then_ends() {
        let temp = tempdir().unwrap();
        let mut walk = walk_files(&temp.path().join("nope"));

        assert!(matches!(walk.next(), Some(Err(_))));
        assert!(walk.next().is_none());
        assert!(walk.next().is_none());
    }

    #[test]
    fn file_root_yields_the_file_itself() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("solo.txt");
        fs::write(&file, "x").unwrap();

        let files: Vec<PathBuf> = walk_files(&file).map(|r| r.unwrap()).collect();
        assert_eq!(files, vec![file]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_not_followed() {
        let temp = tempdir().unwrap();
        let outside = tempdir().unwrap();
        fs::write(outside.path().join("secret.md"), "s").unwrap();
        fs::write(temp.path().join("real.md"), "r").unwrap();
        std::os::unix::fs::symlink(outside.path(), temp.path().join("link")).unwrap();

        let files: Vec<PathBuf> = walk_files(temp.path()).map(|r| r.unwrap()).collect();
        assert_eq!(files, vec![temp.path().join("real.md")]);
    }
}
