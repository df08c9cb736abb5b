//! SHA-256 content digests
//!
//! Two files are considered the same when their digests are equal, no
//! matter what their timestamps say. Digests use the canonical
//! `sha256:<hex>` form.

use std::fs::File;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// Prefix for all digests produced by this module
const PREFIX: &str = "sha256:";

/// Compute the digest of in-memory content.
pub fn content_digest(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Compute the digest of a file, streaming its full byte content.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn file_digest(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|e| Error::io(path, e))?;
    Ok(format!("{}{:x}", PREFIX, hasher.finalize()))
}

/// Returns `true` when both files have the same content digest.
///
/// # Errors
///
/// Returns the first read failure. Callers must not treat an error as a
/// match.
pub fn files_match(a: &Path, b: &Path) -> Result<bool> {
    Ok(file_digest(a)? == file_digest(b)?)
}
