use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::walker::walk_files;

pub type FileWalk = Box<dyn Iterator<Item = io::Result<PathBuf>> + Send>;

/// Filesystem access used by the aggregation tasks.
///
/// `walk` must follow the [`walk_files`] contract: regular files only, and
/// at most one trailing error after which the iterator is exhausted.
pub trait FileSource: Send + Sync {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    fn walk(&self, root: &Path) -> FileWalk;
}

/// The local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl FileSource for LocalFs {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn walk(&self, root: &Path) -> FileWalk {
        Box::new(walk_files(root))
    }
}

/// Wraps a source and counts every read and walk it serves.
#[derive(Debug, Default)]
pub struct CountingSource<S> {
    inner: S,
    reads: AtomicUsize,
    walks: AtomicUsize,
}

impl<S> CountingSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            reads: AtomicUsize::new(0),
            walks: AtomicUsize::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn walks(&self) -> usize {
        self.walks.load(Ordering::SeqCst)
    }

    /// Reads plus walks.
    pub fn accesses(&self) -> usize {
        self.reads() + self.walks()
    }
}

impl<S: FileSource> FileSource for CountingSource<S> {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read(path)
    }

    fn walk(&self, root: &Path) -> FileWalk {
        self.walks.fetch_add(1, Ordering::SeqCst);
        self.inner.walk(root)
    }
}
