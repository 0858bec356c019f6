//! nfsstat-monitor: exports the NFSv3 client operation counters of the local host to InfluxDB.
//!
//! Every few seconds the counters are read from `/proc/net/rpc/nfs` and stored in one gauge per
//! NFS operation. The gauges are pushed to InfluxDB on a separate timer.
use std::sync::Arc;

use collector::{Controller, Shutdown};
use metrics::{InfluxPublisher, IoGaugeStore, Registry};
use nfs::ProcfsSource;

pub mod collector;
pub mod config;
pub mod error;
pub mod fsutil;
pub mod host;
pub mod metrics;
pub mod nfs;

/// Runs the monitor until the host has no NFSv3 mounts or collection fails.
///
/// # Returns
///
/// Returns `Ok(())` once the statistics no longer contain an NFSv3 record.
///
/// # Errors
///
/// Possible errors include:
/// - Invalid configuration (see [`config::Config::from_env`]).
/// - An unreadable statistics file or a malformed NFSv3 record.
/// - A collection cycle that panicked.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    run_with(config::Config::from_env()?).await
}

/// Runs the monitor with an explicit configuration. See [`run`].
///
/// # Errors
///
/// Same as [`run`], minus configuration errors.
pub async fn run_with(config: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let hostname = host::resolve_hostname(&config.rootfs);
    log::debug!("Hostname: {}", &hostname);

    let registry = Arc::new(Registry::new());
    let store = Arc::new(IoGaugeStore::initialize(&registry, &hostname)?);

    let publisher = InfluxPublisher::new(&config.influx)?;
    log::info!(
        "Publishing {} gauges to {} every {}s",
        registry.gather().len(),
        publisher.write_uri(),
        config.publish_interval.as_secs()
    );
    let publisher = publisher.spawn(Arc::clone(&registry), config.publish_interval);

    log::info!(
        "Collecting NFS statistics from `{}` every {}s",
        config.stat_path.display(),
        config.collect_interval.as_secs()
    );
    let controller = Controller::new(
        ProcfsSource::new(&config.stat_path),
        store,
        config.collect_interval,
    );
    let result = controller.run().await;
    publisher.abort();

    match result? {
        Shutdown::NoMounts => log::info!(
            "No NFS v3 mounts in `{}`, exiting",
            config.stat_path.display()
        ),
    }
    Ok(())
}
