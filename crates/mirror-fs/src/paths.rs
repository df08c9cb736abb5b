//! Startup validation of a source/replica pair

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// Check that `source` is an existing directory and that `replica` is
/// neither the source itself nor somewhere below it.
///
/// The replica does not need to exist yet. Symlinks are resolved on the
/// deepest ancestor of the replica that does exist.
pub fn validate_pair(source: &Path, replica: &Path) -> Result<()> {
    match fs::metadata(source) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(Error::NotADirectory {
                path: source.to_path_buf(),
            });
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(Error::SourceMissing {
                path: source.to_path_buf(),
            });
        }
        Err(e) => return Err(Error::io(source, e)),
    }

    let source_real = dunce::canonicalize(source).map_err(|e| Error::io(source, e))?;
    let replica_real = resolve_partial(replica)?;

    if replica_real.starts_with(&source_real) {
        return Err(Error::NestedReplica {
            source_dir: source.to_path_buf(),
            replica: replica.to_path_buf(),
        });
    }

    Ok(())
}

/// Canonicalize the longest existing prefix of `path` and append the rest.
///
/// `..` and `.` are folded lexically first.
fn resolve_partial(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| Error::io(path, e))?
            .join(path)
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::ParentDir => {
                normalized.pop();
            }
            Component::CurDir => {}
            other => normalized.push(other),
        }
    }

    let mut existing = normalized.as_path();
    let mut missing = Vec::new();
    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name);
                existing = parent;
            }
            _ => break,
        }
    }

    let mut resolved = dunce::canonicalize(existing).map_err(|e| Error::io(existing, e))?;
    for name in missing.into_iter().rev() {
        resolved.push(name);
    }

    Ok(resolved)
}
