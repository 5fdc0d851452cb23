//! Error types for the webview bridge.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use webview_bridge::{Bridge, Result};
//!
//! fn example(bridge: &Bridge) -> Result<()> {
//!     bridge.initialize()?;
//!     let id = bridge.add_script_on_load("window.answer = 42;")?;
//!     bridge.remove_script_on_load(&id.to_string());
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`] |
//! | Lifecycle | [`Error::NotInitialized`], [`Error::UiUnavailable`] |
//! | Arguments | [`Error::InvalidArgument`] |
//! | Execution | [`Error::Timeout`], [`Error::Surface`], [`Error::Decode`] |
//! | Interception | [`Error::Network`], [`Error::Intercept`] |
//! | External | [`Error::Io`], [`Error::Json`], [`Error::Http`], [`Error::ChannelClosed`] |
//!
//! Lifecycle errors reach the caller. Everything raised while evaluating,
//! navigating or intercepting is logged at the boundary and turned into a
//! benign outcome (`None`, `false`, pass-through).

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;
use tokio::sync::oneshot::error::RecvError;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when the bridge builder is missing required parts.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Lifecycle Errors
    // ========================================================================
    /// The rendering surface has not been created, or was destroyed.
    #[error("Browser not initialized")]
    NotInitialized,

    /// The UI-affine execution context no longer accepts work.
    #[error("UI context unavailable")]
    UiUnavailable,

    // ========================================================================
    // Argument Errors
    // ========================================================================
    /// Invalid argument supplied by the host.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument.
        message: String,
    },

    // ========================================================================
    // Execution Errors
    // ========================================================================
    /// Bounded wait exceeded.
    ///
    /// Readiness waits report this as `false`; the variant exists for
    /// callers that want an error value instead.
    #[error("Timeout after {timeout_ms}ms: {operation}")]
    Timeout {
        /// Description of the operation that timed out.
        operation: String,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// The rendering surface rejected an operation.
    #[error("Surface error: {message}")]
    Surface {
        /// Description of the surface failure.
        message: String,
    },

    /// Malformed callback payload or JSON value.
    #[error("Decode error: {message}")]
    Decode {
        /// Description of the decode failure.
        message: String,
    },

    // ========================================================================
    // Interception Errors
    // ========================================================================
    /// Fallback fetch failed.
    #[error("Network error: {message}")]
    Network {
        /// Description of the network failure.
        message: String,
    },

    /// Response rewriting failed.
    #[error("Intercept error: {message}")]
    Intercept {
        /// Description of the rewrite failure.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Channel receive error.
    #[error("Channel closed")]
    ChannelClosed(#[from] RecvError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid argument error.
    #[inline]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    #[inline]
    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Creates a surface error.
    #[inline]
    pub fn surface(message: impl Into<String>) -> Self {
        Self::Surface {
            message: message.into(),
        }
    }

    /// Creates a decode error.
    #[inline]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates a network error.
    #[inline]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates an intercept error.
    #[inline]
    pub fn intercept(message: impl Into<String>) -> Self {
        Self::Intercept {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns `true` if the surface or its context is gone.
    #[inline]
    #[must_use]
    pub fn is_lifecycle_error(&self) -> bool {
        matches!(
            self,
            Self::NotInitialized | Self::UiUnavailable | Self::ChannelClosed(_)
        )
    }

    /// Returns `true` if the interceptor resolves this error to pass-through.
    #[inline]
    #[must_use]
    pub fn is_pass_through(&self) -> bool {
        matches!(
            self,
            Self::Network { .. }
                | Self::Intercept { .. }
                | Self::Decode { .. }
                | Self::Http(_)
                | Self::Io(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
