//! Failures of a single backend exchange.

use thiserror::Error;

/// Everything that can go wrong between sending a request and holding a
/// decoded response.
///
/// The variants follow the order in which a request can fail: the origin
/// itself, the transport, the HTTP status, then the body.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid backend url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend answered HTTP {0}")]
    Status(u16),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Short form used in the status bar.
    pub fn summary(&self) -> String {
        match self {
            ClientError::Transport(e) if e.is_timeout() => "request timed out".into(),
            ClientError::Transport(e) if e.is_connect() => "backend unreachable".into(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_names_the_code() {
        assert_eq!(ClientError::Status(503).summary(), "backend answered HTTP 503");
    }

    #[test]
    fn decode_error_wraps_serde() {
        let err: ClientError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(err.summary().starts_with("unexpected response body"));
    }
}
