//! Directory listings split into files and subfolders

use std::collections::BTreeSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::Path;

use crate::{Error, Result};

/// Direct children of one directory, by base name.
///
/// Classification never follows links: `files` and `dirs` hold real
/// regular files and directories, everything else (symlinks, sockets,
/// devices) lands in `others`. All sets are ordered so that a pass visits
/// entries in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirListing {
    pub files: BTreeSet<OsString>,
    pub dirs: BTreeSet<OsString>,
    pub others: BTreeSet<OsString>,
}

impl DirListing {
    pub fn has_file(&self, name: &OsStr) -> bool {
        self.files.contains(name)
    }

    pub fn has_dir(&self, name: &OsStr) -> bool {
        self.dirs.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.dirs.is_empty() && self.others.is_empty()
    }

    /// Names that are not real directories: candidates for orphan-file
    /// removal on the replica side.
    pub fn non_dirs(&self) -> impl Iterator<Item = &OsString> {
        self.files.iter().chain(self.others.iter())
    }
}

/// List the direct children of `path` without following any link.
///
/// # Errors
///
/// Returns an error if the directory or any of its entries cannot be read.
pub fn list_dir(path: &Path) -> Result<DirListing> {
    let mut listing = DirListing::default();

    for entry in fs::read_dir(path).map_err(|e| Error::io(path, e))? {
        let entry = entry.map_err(|e| Error::io(path, e))?;
        let file_type = entry.file_type().map_err(|e| Error::io(entry.path(), e))?;

        if file_type.is_file() {
            listing.files.insert(entry.file_name());
        } else if file_type.is_dir() {
            listing.dirs.insert(entry.file_name());
        } else {
            listing.others.insert(entry.file_name());
        }
    }

    Ok(listing)
}

/// List a source directory, counting links that resolve to a regular file
/// as files.
///
/// Links to directories stay in `others` and are not descended into, so a
/// link back to an ancestor can never make a pass recurse forever.
pub fn list_source_dir(path: &Path) -> Result<DirListing> {
    let mut listing = list_dir(path)?;

    let linked_files: Vec<OsString> = listing
        .others
        .iter()
        .filter(|name| {
            fs::metadata(path.join(name))
                .map(|meta| meta.is_file())
                .unwrap_or(false)
        })
        .cloned()
        .collect();

    for name in linked_files {
        listing.others.remove(&name);
        listing.files.insert(name);
    }

    for name in &listing.others {
        tracing::debug!(path = ?path.join(name), "Skipping source entry that is not a file or folder");
    }

    Ok(listing)
}
