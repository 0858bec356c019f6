//! Startup configuration, read once from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `NFSSTAT_PATH` | `/proc/net/rpc/nfs` |
//! | `NFSSTAT_COLLECT_INTERVAL_SECS` | `5` |
//! | `NFSSTAT_PUBLISH_INTERVAL_SECS` | `10` |
//! | `INFLUXDB_HOST` | `127.0.0.1:49153` |
//! | `INFLUXDB_DATABASE` | `testdb` |
//! | `INFLUXDB_USERNAME` | `root` |
//! | `INFLUXDB_PASSWORD` | `root` |
//! | `ROOTFS_MOUNT_PATH` | `/` |

use std::path::PathBuf;
use std::time::Duration;

use crate::collector::DEFAULT_COLLECT_INTERVAL;
use crate::metrics::InfluxConfig;
use crate::nfs::DEFAULT_NFS_STAT_PATH;

/// Default time between two pushes to InfluxDB.
pub const DEFAULT_PUBLISH_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("environment variable `{key}` must be a positive number of seconds, got `{value}`")]
    InvalidInterval { key: &'static str, value: String },
    #[error("InfluxDB database name `{0}` may only contain ASCII letters, digits, `_`, `-` and `.`")]
    InvalidDatabaseName(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Statistics file to read every cycle.
    pub stat_path: PathBuf,
    pub collect_interval: Duration,
    pub publish_interval: Duration,
    pub influx: InfluxConfig,
    /// Root of the filesystem the hostname is read from.
    pub rootfs: PathBuf,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if an interval is not a positive integer or the database name is not
    /// safe to put into a URL.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, falling back to defaults for
    /// missing keys.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());

        let collect_interval = parse_interval(
            "NFSSTAT_COLLECT_INTERVAL_SECS",
            lookup("NFSSTAT_COLLECT_INTERVAL_SECS"),
            DEFAULT_COLLECT_INTERVAL,
        )?;
        let publish_interval = parse_interval(
            "NFSSTAT_PUBLISH_INTERVAL_SECS",
            lookup("NFSSTAT_PUBLISH_INTERVAL_SECS"),
            DEFAULT_PUBLISH_INTERVAL,
        )?;

        let database = get("INFLUXDB_DATABASE", "testdb");
        if database.is_empty()
            || !database
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.'))
        {
            return Err(Error::InvalidDatabaseName(database));
        }

        Ok(Self {
            stat_path: PathBuf::from(get("NFSSTAT_PATH", DEFAULT_NFS_STAT_PATH)),
            collect_interval,
            publish_interval,
            influx: InfluxConfig {
                host: get("INFLUXDB_HOST", "127.0.0.1:49153"),
                database,
                username: get("INFLUXDB_USERNAME", "root"),
                password: get("INFLUXDB_PASSWORD", "root"),
            },
            rootfs: PathBuf::from(get("ROOTFS_MOUNT_PATH", "/")),
        })
    }
}

fn parse_interval(key: &'static str, value: Option<String>, default: Duration) -> Result<Duration> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(Error::InvalidInterval { key, value }),
    }
}
