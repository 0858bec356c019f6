use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{Instant, MissedTickBehavior};

use crate::metrics::IoGaugeStore;
use crate::nfs::SnapshotSource;

use super::Result;
use super::cycle::{self, CycleOutcome};

/// Time between two collection attempts.
pub const DEFAULT_COLLECT_INTERVAL: Duration = Duration::from_secs(5);

/// Why the controller stopped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    /// The statistics no longer carry an NFSv3 record.
    NoMounts,
}

/// Schedules collection cycles on a fixed period, never more than one at a time.
///
/// Each cycle runs on the blocking pool while holding the only permit of a one-slot semaphore.
/// Ticks that fire while a cycle is still running are skipped, so a slow read delays the next
/// cycle instead of queueing more of them.
#[derive(Debug)]
pub struct Controller<S> {
    source: Arc<S>,
    store: Arc<IoGaugeStore>,
    period: Duration,
    ready: Arc<Semaphore>,
}

impl<S: SnapshotSource> Controller<S> {
    pub fn new(source: S, store: Arc<IoGaugeStore>, period: Duration) -> Self {
        Self {
            source: Arc::new(source),
            store,
            period,
            ready: Arc::new(Semaphore::new(1)),
        }
    }

    /// Runs collection cycles until one of them finds no NFSv3 record or fails.
    ///
    /// The first cycle starts one period after the call.
    ///
    /// # Errors
    ///
    /// Returns the first cycle error, including a panicked cycle. Nothing is retried.
    pub async fn run(self) -> Result<Shutdown> {
        let mut interval = tokio::time::interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut cycles = JoinSet::new();

        loop {
            tokio::select! {
                biased;

                Some(joined) = cycles.join_next() => match joined?? {
                    CycleOutcome::Updated => {}
                    CycleOutcome::NoData => return Ok(Shutdown::NoMounts),
                },
                _ = interval.tick() => self.start_cycle(&mut cycles),
            }
        }
    }

    fn start_cycle(&self, cycles: &mut JoinSet<Result<CycleOutcome>>) {
        let Ok(permit) = Arc::clone(&self.ready).try_acquire_owned() else {
            log::debug!("Previous collection cycle still running, skipping tick");
            return;
        };
        log::trace!("Starting collection cycle");

        let source = Arc::clone(&self.source);
        let store = Arc::clone(&self.store);
        cycles.spawn_blocking(move || {
            let _permit = permit;
            cycle::run_cycle(source.as_ref(), &store)
        });
    }
}
