//! Error types for Quantum API operations.

use thiserror::Error;

use crate::endpoints::Method;

/// Errors that can occur during Quantum API operations.
#[derive(Debug, Error)]
pub enum QuantumError {
    /// Configuration is missing or incomplete.
    #[error("Quantum configuration required: {0}")]
    ConfigMissing(String),

    /// The API rejected the credentials, or the login exchange failed.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The API does not know the requested endpoint.
    #[error("Handler not found: {0}")]
    HandlerNotFound(String),

    /// The API reported a server-side fault.
    #[error("Quantum internal server error: {0}")]
    InternalServer(String),

    /// Write methods are declared but not implemented by the API.
    #[error("Quantum API does not yet support {0} requests")]
    Unsupported(Method),

    /// A query parameter the endpoint does not accept.
    #[error("Endpoint '{endpoint}' does not accept parameter '{name}'")]
    InvalidParameter {
        endpoint: &'static str,
        name: String,
    },

    /// A path template placeholder without a value.
    #[error("Endpoint '{endpoint}' needs a value for '{name}'")]
    MissingPathArgument {
        endpoint: &'static str,
        name: String,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Response body was not valid UTF-8.
    #[error("Response is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
}

impl QuantumError {
    /// Whether the error came out of response classification rather than
    /// the transport.
    pub fn is_classified(&self) -> bool {
        matches!(
            self,
            Self::Authentication(_) | Self::HandlerNotFound(_) | Self::InternalServer(_)
        )
    }

    /// Whether repeating the same request could possibly succeed.
    ///
    /// Errors raised before any network call never qualify.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            Self::Unsupported(_)
                | Self::InvalidParameter { .. }
                | Self::MissingPathArgument { .. }
                | Self::ConfigMissing(_)
                | Self::UrlError(_)
        )
    }
}

/// Result type alias for Quantum operations.
pub type Result<T> = core::result::Result<T, QuantumError>;
