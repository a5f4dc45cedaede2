//! Counter client - reconnecting WebSocket client for a shared counter
//! service.
//!
//! This library maintains a persistent bidirectional connection to a remote
//! counter service, pushes connection status and the shared counter value to
//! a renderer collaborator, and lets callers request increments.
//!
//! # Architecture
//!
//! The whole client is one finite-state controller, the
//! [`ConnectionManager`], owning a single transport at a time:
//!
//! - **Event-driven**: the manager never polls; it reacts to the four
//!   transport lifecycle events (opened, frame, errored, closed) plus user
//!   calls, all serialized through one event loop task.
//! - **Self-healing**: every close schedules exactly one reconnect attempt
//!   after a fixed delay, indefinitely, with no backoff.
//! - **Fire-and-forget protocol**: increments are sent without awaiting a
//!   response; the service broadcasts the resulting value as an update
//!   frame.
//!
//! # Quick Start
//!
//! ```no_run
//! use counter_client::{ConnectionManager, ConnectionState, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let manager = ConnectionManager::builder()
//!         .endpoint("ws://localhost:8787/v1/counter")
//!         .build()?;
//!
//!     // Begin connecting; outcomes arrive as state transitions.
//!     manager.start();
//!     manager.wait_for(ConnectionState::Open).await?;
//!
//!     // Ask the service to bump the shared counter.
//!     manager.request_increment().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`manager`] | Connection manager: state machine, builder, event loop |
//! | [`transport`] | Transport events, handle and the WebSocket connector |
//! | [`protocol`] | Wire message types |
//! | [`render`] | Status renderer collaborator |
//! | [`error`] | Error types and [`Result`] alias |

// ============================================================================
// Modules
// ============================================================================

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Connection manager: state machine, builder and event loop.
///
/// Use [`ConnectionManager::builder()`] to create a configured instance.
pub mod manager;

/// Wire message types.
///
/// Outbound commands and inbound update decoding.
pub mod protocol;

/// Status renderer collaborator.
///
/// The interface the manager notifies on every transition and update.
pub mod render;

/// Transport layer.
///
/// Lifecycle events, the transport handle, and the WebSocket connector.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Manager types
pub use manager::{
    ConnectionManager, ConnectionState, DEFAULT_ENDPOINT, DEFAULT_RECONNECT_DELAY, ManagerBuilder,
};

// Error types
pub use error::{Error, Result};

// Protocol types
pub use protocol::{Command, Inbound};

// Renderer types
pub use render::{ConsoleRenderer, StatusRenderer, StatusStyle};

// Transport types
pub use transport::{Connector, TransportCommand, TransportEvent, TransportHandle, WsConnector};
