//! Pushes registry snapshots to InfluxDB over its 1.x HTTP write API.
//!
//! Every gathered gauge becomes one point in line protocol. The measurement is the gauge name
//! with `_` turned into `.`, prefixed by its `host` label:
//!
//! ```text
//! web01.nfs.io.getattr value=1100i 1718000000
//! ```

use std::fmt::Write;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Method, Request, Uri, header};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use prometheus::proto::{MetricFamily, MetricType};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::ResultOkLogExt;

use super::{HOST_LABEL, PublishError, Registry};

/// Connection settings of the InfluxDB sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfluxConfig {
    /// `host:port` of the InfluxDB HTTP API.
    pub host: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

/// Writes the current registry values to InfluxDB.
#[derive(Debug, Clone)]
pub struct InfluxPublisher {
    client: Client<HttpConnector, Full<Bytes>>,
    write_uri: Uri,
    authorization: String,
}

impl InfluxPublisher {
    /// Creates a publisher for the given sink.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::InvalidEndpoint`] if `host` and `database` do not form a valid URI.
    pub fn new(config: &InfluxConfig) -> Result<Self, PublishError> {
        let endpoint = format!(
            "http://{}/write?db={}&precision=s",
            config.host, config.database
        );
        let write_uri = endpoint
            .parse::<Uri>()
            .map_err(|source| PublishError::InvalidEndpoint {
                endpoint: endpoint.clone(),
                source,
            })?;
        let credentials = STANDARD.encode(format!("{}:{}", config.username, config.password));

        Ok(Self {
            client: Client::builder(TokioExecutor::new()).build_http(),
            write_uri,
            authorization: format!("Basic {credentials}"),
        })
    }

    pub fn write_uri(&self) -> &Uri {
        &self.write_uri
    }

    /// Pushes every gauge of `registry` as one batch and returns the number of points written.
    ///
    /// Nothing is sent while the registry holds no gauges.
    ///
    /// # Errors
    ///
    /// Returns a [`PublishError`] if the request cannot be sent or InfluxDB answers with a
    /// non-success status.
    pub async fn publish(&self, registry: &Registry) -> Result<usize, PublishError> {
        let values = gauge_values(&registry.gather());
        if values.is_empty() {
            return Ok(0);
        }

        let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        let body = encode_lines(&values, timestamp);

        let request = Request::builder()
            .method(Method::POST)
            .uri(self.write_uri.clone())
            .header(header::AUTHORIZATION, &self.authorization)
            .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(Full::new(Bytes::from(body)))?;

        let response = self.client.request(request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .into_body()
                .collect()
                .await
                .map(|collected| collected.to_bytes())
                .unwrap_or_default();
            return Err(PublishError::Status {
                status,
                body: String::from_utf8_lossy(&body).trim().to_owned(),
            });
        }

        log::trace!("Published {} points to {}", values.len(), self.write_uri);
        Ok(values.len())
    }

    /// Publishes `registry` every `period` on a background task until the runtime shuts down.
    ///
    /// The first push happens one `period` after the call. Failures are logged and the next
    /// tick tries again.
    pub fn spawn(self, registry: Arc<Registry>, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval.tick().await;
            loop {
                interval.tick().await;
                self.publish(&registry)
                    .await
                    .ok_log("failed to publish metrics to InfluxDB");
            }
        })
    }
}

/// Flattens gathered gauges into `(measurement, value)` pairs, sorted by measurement.
///
/// Other metric types are skipped.
pub fn gauge_values(families: &[MetricFamily]) -> Vec<(String, i64)> {
    let mut values = Vec::new();
    for family in families {
        if family.get_field_type() != MetricType::GAUGE {
            continue;
        }
        let name = family.get_name().replace('_', ".");
        for metric in family.get_metric() {
            let measurement = match metric
                .get_label()
                .iter()
                .find(|label| label.get_name() == HOST_LABEL)
            {
                Some(host) => format!("{}.{name}", host.get_value()),
                None => name.clone(),
            };
            values.push((measurement, metric.get_gauge().get_value() as i64));
        }
    }
    values.sort_unstable_by(|a, b| a.0.cmp(&b.0));
    values
}

/// Encodes `(measurement, value)` pairs as InfluxDB line protocol with second precision.
pub fn encode_lines(values: &[(String, i64)], timestamp: u64) -> String {
    let mut out = String::with_capacity(values.len() * 48);
    for (name, value) in values {
        escape_measurement(name, &mut out);
        // Writing to a `String` cannot fail.
        let _ = writeln!(out, " value={value}i {timestamp}");
    }
    out
}

fn escape_measurement(name: &str, out: &mut String) {
    for c in name.chars() {
        if matches!(c, ',' | ' ' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
}
