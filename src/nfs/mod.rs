//! NFS client statistics as exposed by the kernel in `/proc/net/rpc/nfs`.
//!
//! # Key Components
//!
//! - [`Snapshot`] and [`SnapshotSource`]: raw file contents and where they come from.
//! - [`Nfs3OpCounts`]: the parsed NFSv3 per-procedure counters.
//! - [`Nfs3Procedure`]: the fixed procedure order and metric names.
//!
//! # Platform Requirements
//!
//! - Linux with NFS client support (`/proc/net/rpc/nfs` only exists once the `nfs` module is
//!   loaded).
mod error;
mod parser;
mod procedure;
mod snapshot;

pub use error::{ParseError, SnapshotError};
pub use parser::{MIN_POSITIONS, Nfs3OpCounts, RECORD_TAG, parse_snapshot};
pub use procedure::Nfs3Procedure;
pub use snapshot::{DEFAULT_NFS_STAT_PATH, ProcfsSource, Snapshot, SnapshotSource, read_snapshot};
