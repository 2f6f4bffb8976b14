//! SDK error types
//!
//! Every failure the request pipeline or the credential exchange can produce
//! is one variant of [`SdkError`]. Messages carry the HTTP status and the
//! server-supplied `message` where available, never the API key or the
//! bearer token.

use thiserror::Error;

/// Broad classification of an [`SdkError`], useful for logging labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The request never produced a complete response
    Transport,
    /// Request or response body could not be (de)serialized
    Codec,
    /// The service answered with a non-200 status
    Http,
    /// Credential exchange rejected, or no token installed
    Authentication,
    /// Client-side misconfiguration
    Config,
}

/// Errors returned by SDK operations.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Connect, send, read or timeout failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// A request body could not be encoded as JSON.
    #[error("failed to serialize request body: {0}")]
    Serialize(String),

    /// A 200 response body was empty or not the expected JSON.
    #[error("failed to decode response body: {0}")]
    Decode(String),

    /// Non-200 response from an endpoint.
    #[error("API request failed with status {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Server message, or the raw body when there is none.
        message: String,
    },

    /// Non-200 (or token-less) response from the API key login endpoint.
    #[error("authentication failed with status {status}: {message}")]
    Auth {
        /// HTTP status code of the login response.
        status: u16,
        /// Server message, or the raw body when there is none.
        message: String,
    },

    /// An endpoint requiring a bearer token was called with none installed.
    #[error("no access token installed")]
    NotAuthenticated,

    /// Invalid base URL, HTTP client setup or header value.
    #[error("configuration error: {0}")]
    Config(String),
}

impl SdkError {
    /// Get the error category for this error
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Transport(_) => ErrorCategory::Transport,
            Self::Serialize(_) | Self::Decode(_) => ErrorCategory::Codec,
            Self::Http { .. } => ErrorCategory::Http,
            Self::Auth { .. } | Self::NotAuthenticated => ErrorCategory::Authentication,
            Self::Config(_) => ErrorCategory::Config,
        }
    }

    /// HTTP status code carried by the error, if the service answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } | Self::Auth { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server-supplied message (or raw body) for HTTP-level failures.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Http { message, .. } | Self::Auth { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    /// Check if this error came from authentication
    #[must_use]
    pub fn is_auth(&self) -> bool {
        self.category() == ErrorCategory::Authentication
    }

    /// Stable label for structured logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Serialize(_) => "serialize",
            Self::Decode(_) => "decode",
            Self::Http { .. } => "http",
            Self::Auth { .. } => "auth",
            Self::NotAuthenticated => "not_authenticated",
            Self::Config(_) => "config",
        }
    }

    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        // Strip the URL so query strings never end up in error text.
        let err = err.without_url();
        if err.is_timeout() {
            Self::Transport(format!("request timed out: {err}"))
        } else if err.is_connect() {
            Self::Transport(format!("connection failed: {err}"))
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
