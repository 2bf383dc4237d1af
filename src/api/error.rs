//! Client Error Types
//!
//! Errors raised while talking to the estate backend. Non-2xx responses keep
//! the status code and the response body so a single notification can show
//! both.

use thiserror::Error;

/// Errors that can occur when calling the estate backend
#[derive(Error, Debug)]
pub enum ClientError {
    /// Backend answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Backend could not be reached
    #[error("Backend unavailable at {0}")]
    Unavailable(String),

    /// Request exceeded the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// Transport level failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// No invoice with this id in the invoice list
    #[error("Invoice {0} not found")]
    InvoiceNotFound(i64),

    /// Operation needs a session but none is active
    #[error("Not logged in. Run `estate login` first")]
    NotAuthenticated,
}

impl ClientError {
    /// Classify a transport error the way the caller reports it
    pub(crate) fn from_transport(err: reqwest::Error, base_url: &str) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_connect() {
            ClientError::Unavailable(base_url.to_string())
        } else {
            ClientError::Request(err)
        }
    }

    /// HTTP status code, when the backend produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for backend calls
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display() {
        let err = ClientError::Http {
            status: 400,
            body: "Unit already occupied".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 400: Unit already occupied");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_status_absent_for_transport_errors() {
        assert_eq!(ClientError::Timeout.status(), None);
        assert_eq!(ClientError::NotAuthenticated.status(), None);
    }
}
