// Client error taxonomy
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(reqwest::Error),

    #[error("malformed response body: {0}")]
    Decode(reqwest::Error),

    #[error("server responded with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("no dashboard id in page path '{0}'")]
    MissingDashboardId(String),

    #[error("status poller has stopped")]
    PollerStopped,
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ClientError::Decode(error)
        } else {
            ClientError::Network(error)
        }
    }
}

impl ClientError {
    /// Failures that come from talking to the server rather than from local input.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            ClientError::Network(_) | ClientError::Status { .. } | ClientError::NotFound(_)
        )
    }
}
