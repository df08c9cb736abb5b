//! One-way recursive mirroring of a source tree onto a replica tree
//!
//! Each directory level is handled in four fixed steps:
//!
//! 1. copy files that are missing from the replica or whose content differs
//! 2. delete replica files and links with no same-named file in the source
//! 3. recurse into every source subfolder
//! 4. delete replica subfolders with no same-named subfolder in the source
//!
//! Failures on single items are recorded and skipped. A replica folder
//! that cannot be created skips everything below it. A directory that
//! cannot be listed fails that sub-tree, which the parent records, or the
//! whole pass when it is the root.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use mirror_fs::ops::{self, EntryKind};
use mirror_fs::{files_match, list_dir, list_source_dir};

use crate::audit::AuditSink;
use crate::report::PassReport;
use crate::Result;

/// Something the scheduler can run once per tick.
pub trait SyncPass: Send + Sync + 'static {
    fn run_pass(&self) -> Result<PassReport>;
}

/// Source and replica directories at the same position in both trees
#[derive(Debug, Clone)]
struct DirPair {
    source: PathBuf,
    replica: PathBuf,
}

impl DirPair {
    fn child(&self, name: &OsStr) -> Self {
        Self {
            source: self.source.join(name),
            replica: self.replica.join(name),
        }
    }
}

/// Mirrors `source` onto `replica`, reporting through an [`AuditSink`].
pub struct Reconciler {
    root: DirPair,
    sink: Arc<dyn AuditSink>,
}

impl Reconciler {
    pub fn new(
        source: impl Into<PathBuf>,
        replica: impl Into<PathBuf>,
        sink: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            root: DirPair {
                source: source.into(),
                replica: replica.into(),
            },
            sink,
        }
    }

    /// Run one full pass from the root pair down.
    ///
    /// # Errors
    ///
    /// Returns an error only when the root source or replica directory
    /// cannot be listed. Everything else is recorded in the sink and
    /// counted in the report's failures.
    pub fn reconcile(&self) -> Result<PassReport> {
        let mut report = PassReport::default();
        self.reconcile_dir(&self.root, true, &mut report)?;
        tracing::debug!(%report, "Pass finished");
        Ok(report)
    }

    fn reconcile_dir(&self, pair: &DirPair, is_root: bool, report: &mut PassReport) -> Result<()> {
        if !self.ensure_replica_dir(pair, is_root, report) {
            return Ok(());
        }

        let source = list_source_dir(&pair.source)?;
        for name in &source.files {
            self.sync_file(&pair.source.join(name), &pair.replica.join(name), report);
        }

        // Replica links are never followed, only removed or replaced
        let replica = list_dir(&pair.replica)?;
        for name in replica.non_dirs().filter(|n| !source.has_file(n)) {
            self.delete_file(&pair.replica.join(name), report);
        }

        for name in &source.dirs {
            let child = pair.child(name);
            if let Err(e) = self.reconcile_dir(&child, false, report) {
                self.fail(
                    report,
                    format!(
                        "Failed to synchronize subfolder '{}': {}",
                        child.source.display(),
                        e
                    ),
                );
            }
        }

        for name in replica.dirs.iter().filter(|n| !source.has_dir(n)) {
            self.delete_folder(&pair.replica.join(name), report);
        }

        Ok(())
    }

    /// Returns `false` when the replica folder is missing and could not be
    /// created, in which case nothing below it is attempted.
    ///
    /// The caller-supplied root may itself be a link to a folder. Below the
    /// root only a real folder is accepted: a link or file in its place is
    /// removed first, so a pass never works through a link into another
    /// tree.
    fn ensure_replica_dir(&self, pair: &DirPair, is_root: bool, report: &mut PassReport) -> bool {
        if is_root {
            if pair.replica.is_dir() {
                return true;
            }
        } else {
            match ops::entry_kind(&pair.replica) {
                Ok(Some(EntryKind::Dir)) => return true,
                Ok(None) => {}
                Ok(Some(_)) => {
                    if !self.delete_file(&pair.replica, report) {
                        return false;
                    }
                }
                Err(e) => {
                    self.fail(
                        report,
                        format!(
                            "Failed to create replica folder '{}': {}",
                            pair.replica.display(),
                            e
                        ),
                    );
                    return false;
                }
            }
        }

        // Only the caller-supplied root may be missing its parents
        let created = if is_root {
            std::fs::create_dir_all(&pair.replica)
                .map_err(|e| mirror_fs::Error::io(&pair.replica, e))
        } else {
            ops::create_dir(&pair.replica)
        };

        match created {
            Ok(()) => {
                report.folders_created += 1;
                self.sink.record(&format!(
                    "Created replica folder: {}",
                    pair.replica.display()
                ));
                true
            }
            Err(e) => {
                self.fail(
                    report,
                    format!(
                        "Failed to create replica folder '{}': {}",
                        pair.replica.display(),
                        e
                    ),
                );
                false
            }
        }
    }

    fn sync_file(&self, src: &Path, dest: &Path, report: &mut PassReport) {
        let copy = self.needs_copy(src, dest).and_then(|needed| {
            if needed {
                ops::copy_replace(src, dest)?;
            }
            Ok(needed)
        });

        match copy {
            Ok(true) => {
                report.files_copied += 1;
                self.sink.record(&format!(
                    "Copied/Updated file: {} to {}",
                    src.display(),
                    dest.display()
                ));
            }
            Ok(false) => tracing::debug!(path = ?src, "Unchanged, skipping"),
            Err(e) => self.fail(
                report,
                format!(
                    "Failed to copy/update file '{}' to '{}': {}",
                    src.display(),
                    dest.display(),
                    e
                ),
            ),
        }
    }

    /// A destination that cannot be compared is treated as different, so
    /// an unreadable file is never silently skipped. Anything but a regular
    /// file at `dest` is replaced without being read through.
    fn needs_copy(&self, src: &Path, dest: &Path) -> mirror_fs::Result<bool> {
        if ops::entry_kind(dest)? != Some(EntryKind::File) {
            return Ok(true);
        }

        match files_match(src, dest) {
            Ok(same) => Ok(!same),
            Err(e) => {
                self.sink.record(&format!(
                    "Failed to compare files '{}' and '{}': {}",
                    src.display(),
                    dest.display(),
                    e
                ));
                Ok(true)
            }
        }
    }

    fn delete_file(&self, path: &Path, report: &mut PassReport) -> bool {
        match ops::remove_file(path) {
            Ok(()) => {
                report.files_deleted += 1;
                self.sink
                    .record(&format!("Deleted file: {}", path.display()));
                true
            }
            Err(e) => {
                self.fail(
                    report,
                    format!("Failed to delete file '{}': {}", path.display(), e),
                );
                false
            }
        }
    }

    fn delete_folder(&self, path: &Path, report: &mut PassReport) {
        match ops::remove_dir_all(path) {
            Ok(()) => {
                report.folders_deleted += 1;
                self.sink
                    .record(&format!("Deleted folder: {}", path.display()));
            }
            Err(e) => self.fail(
                report,
                format!("Failed to delete folder '{}': {}", path.display(), e),
            ),
        }
    }

    fn fail(&self, report: &mut PassReport, message: String) {
        report.failures += 1;
        tracing::debug!(%message, "Item failed");
        self.sink.record(&message);
    }
}

impl SyncPass for Reconciler {
    fn run_pass(&self) -> Result<PassReport> {
        self.reconcile()
    }
}
