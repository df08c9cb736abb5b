//! Error types for mirror-core

use std::time::Duration;

/// Result type for mirror-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mirror-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Scheduler interval must be non-zero
    #[error("Invalid synchronization interval {interval:?}, please use a value bigger than zero.")]
    InvalidInterval { interval: Duration },

    /// Filesystem error from mirror-fs
    #[error(transparent)]
    Fs(#[from] mirror_fs::Error),
}
