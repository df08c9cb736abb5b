//! Folder Mirror CLI
//!
//! Mirrors a source folder onto a replica folder every few seconds until
//! a line is entered on stdin.
//!
//! # Usage
//!
//! ```bash
//! mirror <SOURCE> <REPLICA> <LOG_FILE> <INTERVAL>
//! ```
//!
//! # Environment Variables
//!
//! - `MIRROR_SOURCE`, `MIRROR_REPLICA`, `MIRROR_LOG_FILE`, `MIRROR_INTERVAL`:
//!   fallbacks for the positional arguments
//! - `RUST_LOG`: diagnostic verbosity on stderr (default: `warn`)

mod cli;
mod error;

use std::io::BufRead;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use mirror_core::{AuditLog, Reconciler, Scheduler};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use error::{CliError, Result};

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            match cli::usage_message(&e) {
                Some(message) => println!("{message}"),
                None => {
                    let _ = e.print();
                }
            }
            return;
        }
    };

    if let Err(e) = run(cli).await {
        if e.is_startup() {
            println!("Error: {e}");
            return;
        }
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.verbose);

    mirror_fs::validate_pair(&cli.source, &cli.replica).map_err(CliError::Startup)?;

    let sink = Arc::new(AuditLog::new(&cli.log_file));
    let reconciler = Arc::new(Reconciler::new(&cli.source, &cli.replica, sink.clone()));
    let scheduler = Scheduler::new(reconciler, sink, cli.interval())?;
    let every = scheduler.interval().as_secs();

    tracing::debug!(
        source = ?cli.source,
        replica = ?cli.replica,
        log_file = ?cli.log_file,
        interval = cli.interval,
        "Starting scheduler"
    );

    let cancel = CancellationToken::new();
    let handle = scheduler.spawn(cancel.clone());

    println!("Synchronization started. Running every {every} seconds.");
    println!("Press Enter to stop synchronization...");

    wait_for_stop().await;

    cancel.cancel();
    handle.await?;
    println!("Synchronization stopped.");

    Ok(())
}

/// Diagnostics go to stderr; stdout carries the audit records.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();

    tracing::debug!("Verbose mode enabled");
}

/// Resolves on a line of input, end of input, or Ctrl-C.
async fn wait_for_stop() {
    let mut line = stdin_line();
    tokio::select! {
        _ = &mut line => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::warn!(error = %e, "Could not listen for Ctrl-C");
                let _ = line.await;
            }
        }
    }
}

// A dedicated thread, so a pending read never holds up runtime shutdown
fn stdin_line() -> oneshot::Receiver<()> {
    let (tx, rx) = oneshot::channel();
    std::thread::spawn(move || {
        let mut line = String::new();
        if let Err(e) = std::io::stdin().lock().read_line(&mut line) {
            tracing::warn!(error = %e, "Reading stdin failed");
        }
        let _ = tx.send(());
    });
    rx
}
