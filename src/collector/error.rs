use crate::nfs::{ParseError, SnapshotError};

/// Conditions that end collection. None of them is retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error("malformed NFS statistics: {0}")]
    Parse(#[from] ParseError),
    #[error("collection cycle did not complete: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;
