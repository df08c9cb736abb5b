//! Error types for mirror-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from mirror-core
    #[error(transparent)]
    Core(#[from] mirror_core::Error),

    /// The source/replica pair was rejected before the scheduler started
    #[error(transparent)]
    Startup(mirror_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The scheduler task could not be joined
    #[error("Scheduler task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl CliError {
    /// Startup problems that are reported and end the process cleanly
    pub fn is_startup(&self) -> bool {
        matches!(self, Self::Startup(_))
    }
}
