//! Core of folder-mirror
//!
//! Makes a replica directory an exact mirror of a source directory and
//! repeats that on a fixed interval, writing an audit record for every
//! change.
//!
//! # Modules
//!
//! - [`reconcile`] — one recursive mirroring pass
//! - [`audit`] — console and log-file sinks for audit records
//! - [`scheduler`] — fixed-interval, non-overlapping pass runner
//! - [`report`] — per-pass action counters

pub mod audit;
pub mod error;
pub mod reconcile;
pub mod report;
pub mod scheduler;

pub use audit::{AuditLog, AuditSink, MemoryLog};
pub use error::{Error, Result};
pub use reconcile::{Reconciler, SyncPass};
pub use report::PassReport;
pub use scheduler::Scheduler;
