//! Filesystem primitives for folder-mirror
//!
//! Provides content digests, directory listings and the copy/remove
//! operations the reconciler is built from.

pub mod checksum;
pub mod error;
pub mod listing;
pub mod ops;
pub mod paths;

pub use checksum::{content_digest, file_digest, files_match};
pub use error::{Error, Result};
pub use listing::{DirListing, list_dir, list_source_dir};
pub use paths::validate_pair;
