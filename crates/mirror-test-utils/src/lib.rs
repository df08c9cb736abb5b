//! Shared test utilities for the folder-mirror workspace.
//!
//! This crate is a dev-dependency only — never published.
//!
//! # Modules
//!
//! - [`tree`] — [`MirrorFixture`] with source/replica/log paths and tree
//!   snapshots
//! - [`console`] — [`SharedBuffer`], a cloneable in-memory console

pub mod console;
pub mod tree;

pub use console::SharedBuffer;
pub use tree::{MirrorFixture, Node, snapshot};
