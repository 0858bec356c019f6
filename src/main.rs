use std::process::ExitCode;

/// Entry point for the NFS statistics monitor.
///
/// Exports the NFSv3 client operation counters of this host to InfluxDB until no NFSv3 mount
/// is left, which exits with status 0. Unreadable or malformed statistics are fatal and exit
/// with a non-zero status; restarting is left to the service manager.
///
/// # Examples
///
/// ```bash
/// INFLUXDB_HOST=influx:8086 INFLUXDB_DATABASE=nfs RUST_LOG=debug cargo run
/// ```
#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    ExitCode::from(exit_status(nfsstat_monitor::run().await))
}

/// Maps the outcome of a run to the process exit status, logging a fatal error.
fn exit_status(result: Result<(), Box<dyn std::error::Error>>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            log::error!("{err}");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_shutdown_exits_zero() {
        assert_eq!(exit_status(Ok(())), 0);
    }

    #[test]
    fn test_fatal_error_exits_non_zero() {
        assert_eq!(exit_status(Err("malformed NFS statistics".into())), 1);
    }

    #[tokio::test]
    async fn test_run_without_nfs3_record_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let stat_path = dir.path().join("nfs");
        std::fs::write(&stat_path, "proc2 18 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0\n").unwrap();
        let config = nfsstat_monitor::config::Config::from_lookup(|key| match key {
            "NFSSTAT_PATH" => Some(stat_path.to_string_lossy().into_owned()),
            "NFSSTAT_COLLECT_INTERVAL_SECS" => Some("1".to_owned()),
            "ROOTFS_MOUNT_PATH" => Some(dir.path().to_string_lossy().into_owned()),
            _ => None,
        })
        .unwrap();

        assert_eq!(exit_status(nfsstat_monitor::run_with(config).await), 0);
    }

    #[tokio::test]
    async fn test_run_with_unreadable_statistics_exits_non_zero() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let config = nfsstat_monitor::config::Config::from_lookup(|key| match key {
            "NFSSTAT_PATH" => Some(missing.to_string_lossy().into_owned()),
            "NFSSTAT_COLLECT_INTERVAL_SECS" => Some("1".to_owned()),
            "ROOTFS_MOUNT_PATH" => Some(dir.path().to_string_lossy().into_owned()),
            _ => None,
        })
        .unwrap();

        assert_eq!(exit_status(nfsstat_monitor::run_with(config).await), 1);
    }
}
