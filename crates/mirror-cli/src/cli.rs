//! CLI argument parsing using clap derive

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use clap::error::{ContextKind, ContextValue, ErrorKind};

/// Printed when positional arguments are missing or malformed
pub const USAGE: &str = "Usage: mirror <SOURCE> <REPLICA> <LOG_FILE> <INTERVAL>";

/// Printed when the interval is not a positive whole number
pub const INVALID_INTERVAL: &str =
    "Invalid synchronization interval, please enter value bigger than zero.";

/// Folder Mirror - Keep a replica folder an exact copy of a source folder
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "mirror")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Folder to mirror from
    #[arg(env = "MIRROR_SOURCE")]
    pub source: PathBuf,

    /// Folder kept identical to the source
    #[arg(env = "MIRROR_REPLICA")]
    pub replica: PathBuf,

    /// File every change is appended to
    #[arg(env = "MIRROR_LOG_FILE")]
    pub log_file: PathBuf,

    /// Seconds between synchronization passes
    #[arg(env = "MIRROR_INTERVAL", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }
}

/// What to print for a parse failure, or `None` when clap's own output
/// (help, version) should be shown.
pub fn usage_message(error: &clap::Error) -> Option<&'static str> {
    match error.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => None,
        _ => {
            let interval = matches!(
                error.get(ContextKind::InvalidArg),
                Some(ContextValue::String(arg)) if arg.contains("INTERVAL")
            );
            Some(if interval { INVALID_INTERVAL } else { USAGE })
        }
    }
}
