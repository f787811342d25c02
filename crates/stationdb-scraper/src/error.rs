use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl FetchError {
    /// `true` for transport-level failures: timeouts, refused or reset
    /// connections, and bodies cut off mid-read.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        match self {
            FetchError::Http(err) => {
                err.is_timeout() || err.is_connect() || err.is_request() || err.is_body()
            }
            FetchError::UnexpectedStatus { .. }
            | FetchError::InvalidUrl { .. }
            | FetchError::ClientBuild(_) => false,
        }
    }
}

/// A single extraction strategy could not run. Callers log it and move on
/// to the next strategy.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid CSS selector \"{selector}\": {reason}")]
    Selector {
        selector: &'static str,
        reason: String,
    },
}
