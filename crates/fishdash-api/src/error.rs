//! API client error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response from the server.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Connection, DNS, or timeout failure before a response arrived.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body did not match the expected shape.
    #[error("Decode failed: {0}")]
    Decode(String),

    /// 2xx response whose envelope reported `success: false` or carried
    /// no data.
    #[error("API error: {0}")]
    Api(String),

    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

impl ApiError {
    /// Whether a retry of an idempotent request could plausibly succeed.
    /// Transport failures and 5xx responses qualify; 4xx and decode
    /// failures do not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::Status { status, .. } => (500..=599).contains(status),
            _ => false,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(ApiError::Transport("timeout".to_string()).is_retryable());
        assert!(ApiError::Status {
            status: 503,
            body: String::new()
        }
        .is_retryable());
        assert!(!ApiError::Status {
            status: 404,
            body: String::new()
        }
        .is_retryable());
        assert!(!ApiError::Decode("bad json".to_string()).is_retryable());
        assert!(!ApiError::Api("validation failed".to_string()).is_retryable());
    }
}
