//! Error types for gateways and the batch executor.

use thiserror::Error;

/// Errors reported by a [`Gateway`](crate::Gateway) or its connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// Connection could not be established or was interrupted.
    #[error("network error: {0}")]
    Network(String),

    /// The request did not complete in time.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Server-side or throttling status (5xx, 408, 429).
    #[error("server returned status {status}: {body}")]
    Server { status: u16, body: String },

    /// Response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    InvalidResponse(String),

    /// The request was refused and will not succeed on retry.
    #[error("request rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The access token was refused (401), typically because it expired.
    #[error("request unauthorized: {body}")]
    Unauthorized { body: String },

    /// Login failed.
    #[error("authentication failed: {0}")]
    Authentication(String),
}

impl GatewayError {
    /// Classifies an unsuccessful HTTP status.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        if is_retryable_status(status) {
            Self::Server { status, body }
        } else if status == 401 {
            Self::Unauthorized { body }
        } else {
            Self::Rejected { status, body }
        }
    }

    /// Returns whether this error is transient and the request may be retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Timeout(_) | Self::Server { .. } | Self::InvalidResponse(_)
        )
    }

    /// HTTP status, if the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } | Self::Rejected { status, .. } => Some(*status),
            Self::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }
}

/// Statuses worth retrying: request timeout, throttling and server errors.
pub fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429) || (500..600).contains(&status)
}

/// Errors that stop an import run before any batch is submitted.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Options failed validation.
    #[error("invalid import options: {0}")]
    InvalidOptions(String),

    /// The gateway could not open a connection.
    #[error("failed to connect to FOLIO: {0}")]
    Connect(#[source] GatewayError),
}

/// Result type for import operations.
pub type Result<T> = std::result::Result<T, ImportError>;
