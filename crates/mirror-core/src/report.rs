//! Per-pass action counters

use std::fmt;

/// What one pass did to the replica tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Replica folders created because they were missing
    pub folders_created: usize,
    /// Files copied because they were missing or differed
    pub files_copied: usize,
    /// Orphan files removed from the replica
    pub files_deleted: usize,
    /// Orphan folders removed from the replica, with their contents
    pub folders_deleted: usize,
    /// Item or sub-tree failures that were logged and skipped
    pub failures: usize,
}

impl PassReport {
    /// Total number of changes applied to the replica
    pub fn actions(&self) -> usize {
        self.folders_created + self.files_copied + self.files_deleted + self.folders_deleted
    }

    /// Whether the pass finished without any logged failure
    pub fn is_clean(&self) -> bool {
        self.failures == 0
    }
}

impl fmt::Display for PassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} folders created, {} files copied, {} files deleted, {} folders deleted, {} failures",
            self.folders_created,
            self.files_copied,
            self.files_deleted,
            self.folders_deleted,
            self.failures
        )
    }
}
