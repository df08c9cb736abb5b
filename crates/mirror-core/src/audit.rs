//! Audit records for every change made to the replica
//!
//! A record goes to the console straight away and is appended to the log
//! file as `<timestamp>: <message>`. Failing to write the log file is
//! reported on the console and never interrupts synchronization.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use fs2::FileExt;

/// Format used for log-file timestamps and console notices
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time in the audit log's format.
pub fn timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Destination for audit records.
pub trait AuditSink: Send + Sync {
    /// Report a change or failure. Persisted where the sink supports it.
    fn record(&self, message: &str);

    /// Report progress on the console only.
    fn notice(&self, message: &str);
}

/// Console plus append-only log file.
pub struct AuditLog {
    path: PathBuf,
    console: Mutex<Box<dyn Write + Send>>,
}

impl AuditLog {
    /// Log to `path`, echoing to stdout.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_console(path, io::stdout())
    }

    /// Log to `path`, echoing to `console`.
    pub fn with_console(path: impl Into<PathBuf>, console: impl Write + Send + 'static) -> Self {
        Self {
            path: path.into(),
            console: Mutex::new(Box::new(console)),
        }
    }

    fn echo(&self, message: &str) {
        let mut console = self.console.lock().unwrap_or_else(|p| p.into_inner());
        let _ = writeln!(console, "{message}");
        let _ = console.flush();
    }

    fn append(&self, message: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        // Other processes may share the log file
        file.lock_exclusive()?;
        let result = file.write_all(format!("{}: {}\n", timestamp(), message).as_bytes());
        let _ = FileExt::unlock(&file);

        result
    }
}

impl AuditSink for AuditLog {
    fn record(&self, message: &str) {
        self.echo(message);

        if let Err(e) = self.append(message) {
            tracing::warn!(path = ?self.path, error = %e, "Audit log write failed");
            self.echo(&format!(
                "Failed to write to log file '{}': {}",
                self.path.display(),
                e
            ));
        }
    }

    fn notice(&self, message: &str) {
        self.echo(message);
    }
}

/// In-memory sink keeping every record and notice in emission order.
#[derive(Debug, Default)]
pub struct MemoryLog {
    records: Mutex<Vec<String>>,
    notices: Mutex<Vec<String>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<String> {
        self.records.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Drop everything recorded so far.
    pub fn clear(&self) {
        self.records.lock().unwrap_or_else(|p| p.into_inner()).clear();
        self.notices.lock().unwrap_or_else(|p| p.into_inner()).clear();
    }
}

impl AuditSink for MemoryLog {
    fn record(&self, message: &str) {
        self.records
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(message.to_string());
    }

    fn notice(&self, message: &str) {
        self.notices
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(message.to_string());
    }
}
