//! Mutating filesystem operations used by a sync pass

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Copy `src` over `dest`, replacing any existing file.
///
/// The bytes are first copied to a hidden temporary file in the
/// destination directory, then renamed into place, so `dest` is either the
/// old file or the complete new one. A symlink at `dest` is replaced, not
/// followed.
pub fn copy_replace(src: &Path, dest: &Path) -> Result<()> {
    let temp_path = temp_path_for(dest);

    if let Err(e) = fs::copy(src, &temp_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(src, e));
    }

    if let Err(e) = fs::rename(&temp_path, dest) {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(dest, e));
    }

    Ok(())
}

/// Create a single directory. Its parent must already exist.
pub fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir(path).map_err(|e| Error::io(path, e))
}

/// Remove a single file or link. A link is removed, never its target.
pub fn remove_file(path: &Path) -> Result<()> {
    let result = fs::remove_file(path);

    // Directory symlinks on Windows are removed like directories
    #[cfg(windows)]
    let result = result.or_else(|e| match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => fs::remove_dir(path),
        _ => Err(e),
    });

    result.map_err(|e| Error::io(path, e))
}

/// Remove a directory and everything below it.
pub fn remove_dir_all(path: &Path) -> Result<()> {
    fs::remove_dir_all(path).map_err(|e| Error::io(path, e))
}

/// What sits at a path, looked at without following links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// Symlink, socket, device or anything else
    Other,
}

/// Classify `path` without following a link, `None` if nothing is there.
pub fn entry_kind(path: &Path) -> Result<Option<EntryKind>> {
    match fs::symlink_metadata(path) {
        Ok(meta) => {
            let file_type = meta.file_type();
            Ok(Some(if file_type.is_file() {
                EntryKind::File
            } else if file_type.is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::Other
            }))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

// Temp file lives next to the destination so the rename stays on one filesystem
fn temp_path_for(dest: &Path) -> PathBuf {
    let temp_name = format!(
        ".{}.{}.mirror-tmp",
        dest.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    dest.with_file_name(temp_name)
}
