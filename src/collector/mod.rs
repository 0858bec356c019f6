//! The collection loop: periodically read NFS statistics and update the gauges.
//!
//! [`Controller`] paces the cycles and guarantees that at most one [`run_cycle`] is in flight.
//! Collection ends either cleanly with [`Shutdown::NoMounts`] or with an [`Error`].
mod controller;
mod cycle;
mod error;

pub use controller::{Controller, DEFAULT_COLLECT_INTERVAL, Shutdown};
pub use cycle::{CycleOutcome, run_cycle};
pub use error::{Error, Result};
