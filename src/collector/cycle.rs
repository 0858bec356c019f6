use std::time::Instant;

use crate::metrics::IoGaugeStore;
use crate::nfs::{self, SnapshotSource};

use super::Result;

/// How a single collection cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// All gauges were set from a fresh snapshot.
    Updated,
    /// The snapshot has no NFSv3 record, i.e. there are no active NFSv3 mounts.
    NoData,
}

/// Runs one collection cycle: read a snapshot, parse it and update every gauge.
///
/// Gauges are only touched after the whole record parsed successfully.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be read or the `proc3` record is malformed.
pub fn run_cycle<S>(source: &S, store: &IoGaugeStore) -> Result<CycleOutcome>
where
    S: SnapshotSource + ?Sized,
{
    let before = Instant::now();
    let snapshot = source.read_snapshot()?;

    let Some(counts) = nfs::parse_snapshot(&snapshot)? else {
        return Ok(CycleOutcome::NoData);
    };
    log::info!("NFSv3 counters: {counts}");

    store.update(&counts);
    log::info!(
        "Collection cycle took {} microseconds",
        before.elapsed().as_micros()
    );

    Ok(CycleOutcome::Updated)
}
