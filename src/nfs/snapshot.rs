use std::path::{Path, PathBuf};

use crate::fsutil;

use super::SnapshotError;

/// Default location of the NFS client RPC statistics on Linux.
pub const DEFAULT_NFS_STAT_PATH: &str = "/proc/net/rpc/nfs";

/// Raw contents of the statistics file at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    contents: String,
}

impl Snapshot {
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
        }
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }
}

/// Reads the entire statistics file at `path`.
///
/// # Errors
///
/// Returns [`SnapshotError::Read`] if the file is missing, unreadable or not UTF-8.
pub fn read_snapshot(path: impl AsRef<Path>) -> Result<Snapshot, SnapshotError> {
    Ok(Snapshot::new(fsutil::read_to_string(path)?))
}

/// Something that can produce a [`Snapshot`] on demand.
///
/// The read is blocking and is always invoked from the blocking thread pool.
pub trait SnapshotSource: Send + Sync + 'static {
    fn read_snapshot(&self) -> Result<Snapshot, SnapshotError>;
}

/// Reads snapshots from a file on disk, usually [`DEFAULT_NFS_STAT_PATH`].
#[derive(Debug, Clone)]
pub struct ProcfsSource {
    path: PathBuf,
}

impl ProcfsSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ProcfsSource {
    fn default() -> Self {
        Self::new(DEFAULT_NFS_STAT_PATH)
    }
}

impl SnapshotSource for ProcfsSource {
    fn read_snapshot(&self) -> Result<Snapshot, SnapshotError> {
        read_snapshot(&self.path)
    }
}
