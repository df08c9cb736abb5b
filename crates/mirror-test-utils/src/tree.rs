//! [`MirrorFixture`] builder for source/replica test scenarios.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// One entry of a [`snapshot`]: a folder, or a file with its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Dir,
    File(Vec<u8>),
}

/// A temporary directory holding `source/`, an initially absent
/// `replica/`, and a `sync.log` path.
///
/// # Example
///
/// ```rust,no_run
/// use mirror_test_utils::MirrorFixture;
///
/// let fx = MirrorFixture::new();
/// fx.write_source("a.txt", "hi");
/// fx.write_source("sub/b.txt", "yo");
/// fx.write_replica("old.txt", "x");
/// ```
pub struct MirrorFixture {
    temp_dir: TempDir,
}

impl Default for MirrorFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl MirrorFixture {
    /// Create the temp directory with an empty `source/`.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("source")).unwrap();
        Self { temp_dir }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn source(&self) -> PathBuf {
        self.root().join("source")
    }

    pub fn replica(&self) -> PathBuf {
        self.root().join("replica")
    }

    pub fn log_file(&self) -> PathBuf {
        self.root().join("sync.log")
    }

    /// Write `content` to `rel` under the source, creating parents.
    pub fn write_source(&self, rel: &str, content: impl AsRef<[u8]>) -> PathBuf {
        write_file(&self.source().join(rel), content.as_ref())
    }

    /// Write `content` to `rel` under the replica, creating parents.
    pub fn write_replica(&self, rel: &str, content: impl AsRef<[u8]>) -> PathBuf {
        write_file(&self.replica().join(rel), content.as_ref())
    }

    pub fn mkdir_source(&self, rel: &str) -> PathBuf {
        let path = self.source().join(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    pub fn mkdir_replica(&self, rel: &str) -> PathBuf {
        let path = self.replica().join(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Read the audit log file, or an empty string if it does not exist.
    pub fn log_contents(&self) -> String {
        fs::read_to_string(self.log_file()).unwrap_or_default()
    }

    /// Assert the replica holds exactly the source's folders and file bytes.
    ///
    /// # Panics
    /// Panics with a diff of both snapshots when they differ.
    pub fn assert_mirrored(&self) {
        pretty_assertions::assert_eq!(
            snapshot(&self.source()),
            snapshot(&self.replica()),
            "replica does not mirror source"
        );
    }
}

/// Relative path (with `/` separators) of every entry below `root`.
///
/// # Panics
/// Panics if the tree cannot be read.
pub fn snapshot(root: &Path) -> BTreeMap<String, Node> {
    let mut out = BTreeMap::new();
    collect(root, "", &mut out);
    out
}

fn collect(dir: &Path, prefix: &str, out: &mut BTreeMap<String, Node>) {
    for entry in fs::read_dir(dir).unwrap() {
        let entry = entry.unwrap();
        let rel = format!("{prefix}{}", entry.file_name().to_string_lossy());
        let file_type = entry.file_type().unwrap();
        if file_type.is_dir() {
            out.insert(rel.clone(), Node::Dir);
            collect(&entry.path(), &format!("{rel}/"), out);
        } else if file_type.is_file() {
            out.insert(rel, Node::File(fs::read(entry.path()).unwrap()));
        }
    }
}

fn write_file(path: &Path, content: &[u8]) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
    path.to_path_buf()
}
