use thiserror::Error;

/// Failure of a single call against the Spotify Web API.
///
/// Each remote call site returns this and the caller decides how to degrade:
/// drop the title, skip the batch, keep the old token. Nothing in the core
/// unwinds the workflow because of it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network failure, timeout or undecodable body.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote answered with a non-success status.
    #[error("{endpoint} answered with HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// No usable access token, user id or authorization code.
    #[error("authorization error: {0}")]
    Auth(String),

    /// A search returned zero items.
    #[error("no tracks found for '{0}'")]
    NotFound(String),

    /// The response decoded but is missing a required field.
    #[error("malformed response from {endpoint}: missing {field}")]
    Malformed {
        endpoint: String,
        field: &'static str,
    },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
