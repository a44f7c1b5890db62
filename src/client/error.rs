//! Client error types

use thiserror::Error;

/// Failure surfaced by a resource client.
///
/// Transport failures and non-success statuses are both network errors;
/// the user is never shown the difference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Transport failure (connection refused, reset, TLS, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// Server answered with a non-2xx status
    #[error("Request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// Body was not valid JSON or had an unexpected shape
    #[error("Decode error: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Decode,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Network(_) | ClientError::Status { .. } => ErrorKind::Network,
            ClientError::Decode(_) => ErrorKind::Decode,
        }
    }

    pub fn is_network(&self) -> bool {
        self.kind() == ErrorKind::Network
    }

    pub fn not_found(id: &str) -> Self {
        ClientError::Status {
            status: 404,
            body: format!("\"{} not found\"", id),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_are_network_errors() {
        let err = ClientError::Status { status: 500, body: String::new() };
        assert_eq!(err.kind(), ErrorKind::Network);
        assert!(ClientError::not_found("7").is_network());
    }

    #[test]
    fn json_errors_become_decode_errors() {
        let err: ClientError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }
}
