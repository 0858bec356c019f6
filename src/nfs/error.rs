//! Error types for reading and parsing the NFS client statistics file.
//!
//! - [`SnapshotError`] covers failures to read the statistics source.
//! - [`ParseError`] covers a `proc3` record that is present but not well formed.
//!
//! Both are treated as unrecoverable by the collector.

use std::num::ParseIntError;

use thiserror::Error;

use crate::fsutil::FileReadError;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read NFS statistics: {0}")]
    Read(#[from] FileReadError),
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid counter at position {position} of `proc3` record (line {line}): '{value}': {source}")]
    InvalidValue {
        value: String,
        position: usize,
        line: usize,
        #[source]
        source: ParseIntError,
    },

    #[error("`proc3` record (line {line}) has {actual} positions, expected at least {expected}")]
    TooFewPositions {
        actual: usize,
        expected: usize,
        line: usize,
    },

    #[error("error during I/O: {0}")]
    Io(#[from] std::io::Error),
}
