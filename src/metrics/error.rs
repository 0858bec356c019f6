use hyper::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("invalid InfluxDB endpoint `{endpoint}`: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: hyper::http::uri::InvalidUri,
    },
    #[error("failed to build write request: {0}")]
    Request(#[from] hyper::http::Error),
    #[error("failed to send write request: {0}")]
    Send(#[from] hyper_util::client::legacy::Error),
    #[error("InfluxDB rejected write with status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("system clock is before the UNIX epoch: {0}")]
    Clock(#[from] std::time::SystemTimeError),
}
