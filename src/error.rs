//! Error types for the counter client.
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use counter_client::{ConnectionManager, Result};
//!
//! async fn example(manager: &ConnectionManager) -> Result<()> {
//!     manager.request_increment().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`] |
//! | Send guard | [`Error::NotOpen`] |
//! | Connection | [`Error::ConnectionClosed`], [`Error::ManagerStopped`] |
//! | Decoding | [`Error::Json`] |
//!
//! An inbound frame whose JSON is valid but whose shape is not a recognized
//! message is not an error at all: decoding yields `Ok(None)` and the frame
//! is dropped silently. Transport-level failures likewise never surface
//! here; they arrive as lifecycle events and are logged by the manager.

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;

use crate::manager::ConnectionState;

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
/// Every variant is local and non-fatal: the manager's lifecycle survives
/// all of them, and recovery happens only through the reconnect loop.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    ///
    /// Returned when builder configuration is invalid, e.g. an endpoint
    /// that does not parse or uses a non-WebSocket scheme.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// A send was requested outside the `Open` state.
    ///
    /// The command is dropped, never queued.
    #[error("Cannot send: connection is not open (state: {state})")]
    NotOpen {
        /// State the manager was in when the send was refused.
        state: ConnectionState,
    },

    /// The transport handle is gone.
    ///
    /// Returned when a send raced with the socket task shutting down.
    #[error("Connection closed")]
    ConnectionClosed,

    /// The manager's event loop has stopped.
    ///
    /// Returned from entry points called after `shutdown()` or after every
    /// manager handle was dropped.
    #[error("Connection manager stopped")]
    ManagerStopped,

    /// JSON encode/decode error.
    ///
    /// On the inbound path this is the malformed-payload case: logged by
    /// the manager and otherwise without effect.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
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

    /// Creates a send-refused error for the given state.
    #[inline]
    #[must_use]
    pub fn not_open(state: ConnectionState) -> Self {
        Self::NotOpen { state }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is the send-while-not-open guard.
    #[inline]
    #[must_use]
    pub fn is_not_open(&self) -> bool {
        matches!(self, Self::NotOpen { .. })
    }

    /// Returns `true` if this is a connection-lifetime error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::ConnectionClosed | Self::ManagerStopped)
    }

    /// Returns `true` if this is an inbound decode error.
    #[inline]
    #[must_use]
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Self::Json(_))
    }
}

// ============================================================================
// Tests
// ============================================================================
