use std::collections::HashSet;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

/// Case-insensitive key for a resolved file path.
pub fn dedup_key(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}

/// Set of files already scheduled for reading, shared by every task of one
/// aggregation.
///
/// The only mutation is [`Deduplicator::claim`], which checks and inserts
/// under a single lock acquisition.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: Mutex<HashSet<String>>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the caller now owns `path` and should read it,
    /// `false` if a path with the same key was claimed before.
    pub fn claim(&self, path: &Path) -> bool {
        let key = dedup_key(path);
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
