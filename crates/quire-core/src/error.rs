//! Error types and handling for quire-core operations.
//!
//! Every failure is surfaced once to the caller of the operation that caused
//! it. Nothing in this crate retries, and a failure anywhere along a page
//! chain fails the whole query: partial results collected before the failure
//! are dropped.
//!
//! ## Error Categories
//!
//! - **Validation**: malformed dates, inverted ranges, malformed format keys
//! - **Fetch**: a page request returned a non-success status
//! - **Unsupported format**: no handler registered for a page's format key
//! - **Network / I/O**: transport and filesystem failures
//! - **Storage / Serialization / Config**: durable cache, decoding and settings
//!
//! ```rust
//! use quire_core::{Error, Result};
//!
//! fn check(result: Result<()>) {
//!     match result {
//!         Err(Error::Validation(msg)) => eprintln!("bad input: {msg}"),
//!         Err(Error::Fetch { url, status }) => eprintln!("{url} answered {status}"),
//!         Err(e) => eprintln!("{} error: {e}", e.category()),
//!         Ok(()) => {},
//!     }
//! }
//! # check(Ok(()));
//! ```

use thiserror::Error;

/// The main error type for quire-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller supplied input that can never succeed.
    ///
    /// Raised for unparseable dates, a date range whose start lies after its
    /// end, and format keys that do not follow the `format@version` pattern.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A page request completed with a non-success status.
    #[error("Failed to fetch '{url}': HTTP {status}")]
    Fetch {
        /// URL that was requested.
        url: String,
        /// Status code reported for the request.
        status: u16,
    },

    /// No handler is registered for a page's `format@version` key.
    #[error("Unsupported page format {0}")]
    UnsupportedFormat(String),

    /// HTTP transport failed before a status was available.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Durable cache operation failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Page content could not be decoded or encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A page URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl Error {
    /// Get the error category as a string identifier.
    ///
    /// Used as a stable label in log events and CLI diagnostics.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Fetch { .. } => "fetch",
            Self::UnsupportedFormat(_) => "unsupported_format",
            Self::Network(_) => "network",
            Self::Io(_) => "io",
            Self::Storage(_) => "storage",
            Self::Serialization(_) => "serialization",
            Self::Config(_) => "config",
            Self::InvalidUrl(_) => "invalid_url",
        }
    }

    /// Whether the error was caused by the arguments of the call itself.
    ///
    /// Such errors are independent of network and cache state.
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidUrl(_))
    }
}

/// Type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
