use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxmoxError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API request failed: {0} - {1}")]
    Api(reqwest::StatusCode, String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The host could not be reached at all (connect failure or timeout).
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Network/Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Replayed failure of the one-time connection setup.
    #[error("{0}")]
    Init(String),
}

impl ProxmoxError {
    /// Sorts a transport-level failure into `Unavailable` or `Request`.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            ProxmoxError::Unavailable(err.to_string())
        } else {
            ProxmoxError::Request(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, ProxmoxError>;
