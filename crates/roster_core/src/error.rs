use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("request to roster service failed: {0}")]
    Network(#[source] reqwest::Error),
    #[error("roster service answered with status {status}")]
    Status { status: StatusCode },
    #[error("malformed roster payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("invalid service url: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("activity name `{0}` cannot be used in a request path")]
    ActivityName(String),
}

impl RosterError {
    /// True when no HTTP response was received at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, RosterError::Network(_))
    }
}
