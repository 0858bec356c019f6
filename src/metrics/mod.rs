//! Gauges, the registry holding them, and the InfluxDB publisher that flushes it.
//!
//! # Key Components
//!
//! - [`Registry`]: the `prometheus` registry holding every gauge.
//! - [`IoGaugeStore`]: the fixed set of NFS operation gauges registered at startup.
//! - [`InfluxPublisher`]: pushes the registry to InfluxDB on its own timer.
mod error;
mod influx;
mod store;

pub use error::PublishError;
pub use influx::{InfluxConfig, InfluxPublisher, encode_lines, gauge_values};
pub use prometheus::Registry;
pub use store::{HOST_LABEL, IoGaugeStore, NAMESPACE, SUBSYSTEM, metric_name};
