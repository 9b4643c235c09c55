//! Error types for walvault
//!
//! This module defines the error taxonomy shared by every crate in the
//! workspace. We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.
//!
//! ## Taxonomy
//!
//! | Variant | Cause | Caller reaction |
//! |---------|-------|-----------------|
//! | `Configuration` | bad base URL, ambiguous backup query | fatal, report to operator |
//! | `UnsupportedVersion` | layout built for an unknown format version | fatal |
//! | `Validation` | malformed segment number or descriptor field | fatal to that construction |
//! | `Parse` | key does not describe a known artifact | skip the key |
//! | `Structural` | URL outside the configured bucket/prefix | fatal to that decode |
//! | `InvariantViolation` | inverted interval bounds | programmer error |
//! | `Serialization` | malformed sentinel body | treat the backup detail as unknown |

use thiserror::Error;

/// Result type alias for walvault operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for walvault
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// User-facing configuration problem
    ///
    /// Carries the message/detail/hint triple that is printed to an
    /// operator instead of a backtrace.
    #[error("{message}")]
    Configuration {
        /// Short description of what went wrong
        message: String,
        /// Longer explanation, if any
        detail: Option<String>,
        /// Suggested remedy, if any
        hint: Option<String>,
    },

    /// The layout was configured with a key-naming scheme this build cannot produce
    #[error("Unsupported layout version {version:?} (supported: {supported:?})")]
    UnsupportedVersion {
        /// Configured version
        version: String,
        /// The one version that is implemented
        supported: &'static str,
    },

    /// A value failed construction-time validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// A key does not match any recognized artifact shape
    #[error("Parse error for {key:?}: {reason}")]
    Parse {
        /// The rejected key or path component
        key: String,
        /// Why it was rejected
        reason: String,
    },

    /// A URL is not contained within the layout's bucket and prefix
    #[error("URL {url:?} is not contained within this storage layout: {reason}")]
    Structural {
        /// The rejected URL
        url: String,
        /// Which part did not match
        reason: String,
    },

    /// A data structure invariant would be broken
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Build a configuration error with only a message
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            detail: None,
            hint: None,
        }
    }

    /// Build a parse error
    pub fn parse(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Parse {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Build a structural (foreign URL) error
    pub fn structural(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Structural {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Attach a detail line to a configuration error
    ///
    /// Other variants are returned unchanged.
    pub fn with_detail(self, text: impl Into<String>) -> Self {
        match self {
            Error::Configuration { message, hint, .. } => Error::Configuration {
                message,
                detail: Some(text.into()),
                hint,
            },
            other => other,
        }
    }

    /// Attach a hint to a configuration error
    ///
    /// Other variants are returned unchanged.
    pub fn with_hint(self, text: impl Into<String>) -> Self {
        match self {
            Error::Configuration {
                message, detail, ..
            } => Error::Configuration {
                message,
                detail,
                hint: Some(text.into()),
            },
            other => other,
        }
    }

    /// Detail line of a configuration error
    pub fn detail(&self) -> Option<&str> {
        match self {
            Error::Configuration { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Operator hint of a configuration error
    pub fn hint(&self) -> Option<&str> {
        match self {
            Error::Configuration { hint, .. } => hint.as_deref(),
            _ => None,
        }
    }

    /// Whether a lister should skip the offending key and keep going
    ///
    /// Only `Parse` qualifies: the key exists in the bucket but is not an
    /// artifact of a known type.
    pub fn is_skippable(&self) -> bool {
        matches!(self, Error::Parse { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
