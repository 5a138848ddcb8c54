//! Error types for the LG webOS remote client.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use lgtv_remote::{Remote, Result};
//!
//! async fn example(remote: &Remote) -> Result<()> {
//!     remote.volume_up().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`], [`Error::Url`] |
//! | Connection | [`Error::Connection`], [`Error::ConnectionClosed`], [`Error::WebSocket`] |
//! | Protocol | [`Error::Protocol`], [`Error::DuplicateCallback`] |
//! | Remote | [`Error::Remote`] |
//! | Execution | [`Error::RequestTimeout`] |
//! | External | [`Error::Json`] |
//!
//! A request the TV declines at the application level (`returnValue: false`)
//! is not an error; see [`SoftRejection`](crate::session::SoftRejection).

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::identifiers::CommandId;

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
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when the remote builder is missing a value or holds an
    /// invalid one.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Invalid TV address.
    #[error("Invalid address: {0}")]
    Url(#[from] url::ParseError),

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// WebSocket connection failed.
    ///
    /// Returned when the primary or pointer socket cannot be opened.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// Connection closed before the operation finished.
    ///
    /// Returned when the connection task ends while a caller still waits on
    /// it.
    #[error("Connection closed")]
    ConnectionClosed,

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// A message kind the current exchange does not allow.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    /// A handler is already pending for this command identifier.
    ///
    /// This is a programming error: identifiers must not be reused while a
    /// reply is outstanding.
    #[error("Duplicate callback: {id}")]
    DuplicateCallback {
        /// The identifier that was registered twice.
        id: CommandId,
    },

    // ========================================================================
    // Remote Errors
    // ========================================================================
    /// The TV answered a request with an `error` message.
    #[error("TV rejected {uri}: {message}")]
    Remote {
        /// Request URI the error answers.
        uri: String,
        /// Error detail reported by the TV.
        message: String,
    },

    // ========================================================================
    // Execution Errors
    // ========================================================================
    /// A caller-supplied deadline expired before the reply arrived.
    ///
    /// Only produced by [`Remote::request_within`](crate::Remote::request_within);
    /// the protocol itself never times out.
    #[error("Request {uri} timed out after {timeout_ms}ms")]
    RequestTimeout {
        /// Request URI that timed out.
        uri: String,
        /// Milliseconds waited before giving up.
        timeout_ms: u64,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),
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

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates a duplicate callback error.
    #[inline]
    pub fn duplicate_callback(id: CommandId) -> Self {
        Self::DuplicateCallback { id }
    }

    /// Creates a remote error.
    #[inline]
    pub fn remote(uri: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            uri: uri.into(),
            message: message.into(),
        }
    }

    /// Creates a request timeout error.
    #[inline]
    pub fn request_timeout(uri: impl Into<String>, timeout_ms: u64) -> Self {
        Self::RequestTimeout {
            uri: uri.into(),
            timeout_ms,
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
        matches!(self, Self::RequestTimeout { .. })
    }

    /// Returns `true` if this is a connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. }
                | Self::ConnectionClosed
                | Self::WebSocket(_)
        )
    }

    /// Returns `true` if the TV itself reported the failure.
    #[inline]
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_error_display() {
        let err = Error::connection("refused");
        assert_eq!(err.to_string(), "Connection failed: refused");
    }

    #[test]
    fn test_remote_error_display() {
        let err = Error::remote("ssap://audio/volumeUp", "401 insufficient permissions");
        assert_eq!(
            err.to_string(),
            "TV rejected ssap://audio/volumeUp: 401 insufficient permissions"
        );
        assert!(err.is_remote());
    }

    #[test]
    fn test_duplicate_callback_display() {
        let err = Error::duplicate_callback(CommandId::from("101"));
        assert_eq!(err.to_string(), "Duplicate callback: 101");
    }

    #[test]
    fn test_is_timeout() {
        let timeout_err = Error::request_timeout("ssap://system/turnOff", 500);
        let other_err = Error::protocol("test");

        assert!(timeout_err.is_timeout());
        assert!(!other_err.is_timeout());
    }

    #[test]
    fn test_is_connection_error() {
        assert!(Error::connection("test").is_connection_error());
        assert!(Error::ConnectionClosed.is_connection_error());
        assert!(!Error::config("test").is_connection_error());
        assert!(!Error::remote("uri", "nope").is_connection_error());
    }

    #[test]
    fn test_socket_io_error_is_connection_error() {
        let io_err = IoError::new(ErrorKind::ConnectionReset, "reset");
        let err: Error = WsError::Io(io_err).into();
        assert!(matches!(err, Error::WebSocket(_)));
        assert!(err.is_connection_error());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_from_url_error() {
        let url_err = url::Url::parse("not a url").unwrap_err();
        let err: Error = url_err.into();
        assert!(matches!(err, Error::Url(_)));
    }
}
