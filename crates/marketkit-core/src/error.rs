//! Marketplace error taxonomy.
//!
//! Every component surfaces failures as a [`MarketError`]. The set of variants
//! is closed so callers can match exhaustively; [`ErrorKind`] is the fieldless
//! mirror used where only the category matters (download outcomes, events).
//!
//! Errors are serializable and do not carry `std::io::Error` or transport
//! error types. Messages must never contain credential material.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for all marketplace operations.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarketError {
    /// Credentials are invalid or expired, or renewing them failed.
    #[error("Authentication failed: {message}")]
    Authentication {
        /// Description of the failure (never the credential itself).
        message: String,
    },

    /// The remote service answered with a non-success response.
    #[error("API error{}: {message}", status_suffix(.status))]
    Api {
        /// HTTP status code if the platform has one.
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
        /// Detailed error message.
        message: String,
    },

    /// The requested asset or collection does not exist.
    #[error("Not found: {resource}")]
    NotFound {
        /// What was not found (asset uid, collection name, ...).
        resource: String,
    },

    /// Transport-level failure (timeout, connection reset, truncated body).
    #[error("Network error: {message}")]
    Network {
        /// Detailed error message.
        message: String,
    },

    /// Invalid local input: bad filename, directory escape, malformed URL,
    /// directory creation failure.
    #[error("Validation failed: {message}")]
    Validation {
        /// What was invalid.
        message: String,
    },

    /// An operation was attempted after `close()`.
    #[error("{resource} is closed")]
    ResourceClosed {
        /// The closed resource (provider or client name).
        resource: String,
    },

    /// An optional capability is not implemented by this platform.
    #[error("{operation} is not supported by {provider}")]
    Unsupported {
        /// The operation that was requested.
        operation: String,
        /// The provider or client that declined it.
        provider: String,
    },

    /// The operation was cancelled through its cancellation token.
    #[error("Operation cancelled")]
    Cancelled,

    /// Writing, syncing or renaming a local file failed.
    #[error("Storage error ({path}): {message}")]
    Storage {
        /// The file or directory involved.
        path: String,
        /// Detailed error message.
        message: String,
    },
}

#[allow(clippy::ref_option)]
fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

/// Fieldless category of a [`MarketError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Authentication,
    Api,
    NotFound,
    Network,
    Validation,
    ResourceClosed,
    Unsupported,
    Cancelled,
    Storage,
}

impl ErrorKind {
    /// Stable string form, matching the serialized representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Api => "api",
            Self::NotFound => "not_found",
            Self::Network => "network",
            Self::Validation => "validation",
            Self::ResourceClosed => "resource_closed",
            Self::Unsupported => "unsupported",
            Self::Cancelled => "cancelled",
            Self::Storage => "storage",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl MarketError {
    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create an API error without a status code.
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            status: None,
            message: message.into(),
        }
    }

    /// Create an API error with an HTTP status code.
    pub fn api_with_status(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Create a not found error.
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a resource closed error.
    pub fn closed(resource: impl Into<String>) -> Self {
        Self::ResourceClosed {
            resource: resource.into(),
        }
    }

    /// Create an unsupported operation error.
    pub fn unsupported(operation: impl Into<String>, provider: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
            provider: provider.into(),
        }
    }

    /// Create a storage error for `path`.
    pub fn storage(path: impl AsRef<std::path::Path>, message: impl Into<String>) -> Self {
        Self::Storage {
            path: path.as_ref().display().to_string(),
            message: message.into(),
        }
    }

    /// Map an I/O error raised by a byte source.
    ///
    /// Sources that need to report a specific category wrap a `MarketError`
    /// in the `io::Error` (`io::Error::other(err)`); it is recovered here.
    /// Anything else is treated as a transport failure.
    #[must_use]
    pub fn from_source_io(err: &std::io::Error) -> Self {
        err.get_ref()
            .and_then(|inner| inner.downcast_ref::<Self>())
            .cloned()
            .unwrap_or_else(|| Self::network(err.to_string()))
    }

    /// The category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::Api { .. } => ErrorKind::Api,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Network { .. } => ErrorKind::Network,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::ResourceClosed { .. } => ErrorKind::ResourceClosed,
            Self::Unsupported { .. } => ErrorKind::Unsupported,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Storage { .. } => ErrorKind::Storage,
        }
    }

    /// Whether a caller may reasonably retry the same request unchanged.
    ///
    /// The core never retries on its own; this only informs caller policy.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Api {
                status: Some(status),
                ..
            } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Check if this is a cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Convenience result type for marketplace operations.
pub type MarketResult<T> = Result<T, MarketError>;
