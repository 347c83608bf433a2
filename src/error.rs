//! Error types for the printer bridge client.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use printer_websocket::{ConnectionManager, Result};
//!
//! async fn example(manager: &ConnectionManager) -> Result<()> {
//!     manager.initialize("ws://localhost:8765").await?;
//!     let printers = manager.fetch_printers().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::InvalidEndpoint`] |
//! | Connection | [`Error::Connection`], [`Error::ConnectionClosed`], [`Error::NotConnected`] |
//! | Protocol | [`Error::FetchFailed`], [`Error::Protocol`], [`Error::Superseded`] |
//! | External | [`Error::Json`], [`Error::WebSocket`], [`Error::ChannelClosed`] |
//!
//! Status frames reporting `"error"` from the bridge are logged, never
//! returned as an [`Error`].

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;
use tokio::sync::oneshot::error::RecvError;
use tokio_tungstenite::tungstenite::Error as WsError;

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
    /// Endpoint URL rejected before any socket was opened.
    #[error("Invalid endpoint {url}: {message}")]
    InvalidEndpoint {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        message: String,
    },

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// WebSocket connection closed while an outcome was pending.
    #[error("Connection closed")]
    ConnectionClosed,

    /// Operation requires an open connection.
    #[error("Not connected to WebSocket server.")]
    NotConnected,

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// The message answering a discovery request carried no `result`.
    #[error("Failed to fetch printers.")]
    FetchFailed,

    /// Unexpected message shape.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    /// A newer request took over the inbound handler before a reply arrived.
    #[error("Request superseded by a newer request")]
    Superseded,

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),

    /// Channel receive error.
    #[error("Channel closed")]
    ChannelClosed(#[from] RecvError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates an invalid endpoint error.
    #[inline]
    pub fn invalid_endpoint(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            url: url.into(),
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
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::ConnectionClosed | Self::NotConnected | Self::WebSocket(_)
        )
    }

    /// Returns `true` if this error came from a request's reply handling.
    #[inline]
    #[must_use]
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            Self::FetchFailed | Self::Protocol { .. } | Self::Superseded | Self::Json(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::protocol("expected server version");
        assert_eq!(err.to_string(), "Protocol error: expected server version");
    }

    #[test]
    fn test_fetch_failed_display() {
        assert_eq!(Error::FetchFailed.to_string(), "Failed to fetch printers.");
        assert_eq!(
            Error::NotConnected.to_string(),
            "Not connected to WebSocket server."
        );
    }

    #[test]
    fn test_invalid_endpoint_display() {
        let err = Error::invalid_endpoint("http://x", "unsupported scheme");
        assert_eq!(
            err.to_string(),
            "Invalid endpoint http://x: unsupported scheme"
        );
    }

    #[test]
    fn test_is_connection_error() {
        assert!(Error::ConnectionClosed.is_connection_error());
        assert!(Error::NotConnected.is_connection_error());
        assert!(!Error::FetchFailed.is_connection_error());
        assert!(!Error::invalid_endpoint("x", "y").is_connection_error());
    }

    #[test]
    fn test_is_protocol_error() {
        assert!(Error::FetchFailed.is_protocol_error());
        assert!(Error::Superseded.is_protocol_error());
        assert!(Error::protocol("bad").is_protocol_error());
        assert!(!Error::NotConnected.is_protocol_error());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
