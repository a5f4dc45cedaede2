//! Transport layer.
//!
//! The manager never touches a socket directly. It asks a [`Connector`] for
//! a new transport, keeps the returned [`TransportHandle`] for outbound
//! traffic, and reacts to the [`TransportEvent`]s the transport emits.
//!
//! ```text
//! ┌────────────────────┐                          ┌─────────────────┐
//! │ ConnectionManager  │   TransportEvent (mpsc)  │  Socket task    │
//! │   event loop       │◄─────────────────────────│                 │
//! │                    │   TransportCommand       │  WebSocket      │
//! │  TransportHandle   │─────────────────────────►│  (tungstenite)  │
//! └────────────────────┘                          └─────────────────┘
//! ```
//!
//! Connecting is fire-and-forget: [`Connector::connect`] returns a handle
//! immediately and every outcome, including a failed dial, arrives later as
//! events. At most one transport is live per manager; starting a new
//! attempt abandons the previous handle.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `socket` | tokio-tungstenite implementation of [`Connector`] |

// ============================================================================
// Imports
// ============================================================================

use tokio::sync::mpsc;
use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// Submodules
// ============================================================================

/// WebSocket socket task and connector.
pub mod socket;

// ============================================================================
// Re-exports
// ============================================================================

pub use socket::WsConnector;

// ============================================================================
// TransportEvent
// ============================================================================

/// One lifecycle event emitted by a transport.
///
/// A well-behaved transport emits at most one `Opened`, any number of
/// `Frame`s and `Errored`s, and exactly one terminal `Closed`. A failed
/// connection attempt emits `Errored` followed by `Closed` without ever
/// opening, matching the open/error/close event model the manager's state
/// machine is written against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The connection is established.
    Opened,
    /// One inbound text frame.
    Frame(String),
    /// The channel reported an error. Not terminal by itself.
    Errored(String),
    /// The channel is gone.
    Closed,
}

// ============================================================================
// TransportCommand
// ============================================================================

/// What a handle can ask of its transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCommand {
    /// Send one text frame.
    Send(String),
    /// Close the connection. The transport answers with a final
    /// [`TransportEvent::Closed`].
    Close,
}

// ============================================================================
// TransportHandle
// ============================================================================

/// Sender half of a live transport.
///
/// Cheap to clone and drop; dropping every handle closes the transport's
/// command channel, which the socket task treats like an explicit close.
#[derive(Debug, Clone)]
pub struct TransportHandle {
    /// Command channel into the socket task.
    command_tx: mpsc::UnboundedSender<TransportCommand>,
}

impl TransportHandle {
    /// Wraps a command sender as a handle.
    #[inline]
    #[must_use]
    pub fn new(command_tx: mpsc::UnboundedSender<TransportCommand>) -> Self {
        Self { command_tx }
    }

    /// Creates a handle together with the receiver a transport drains.
    ///
    /// Useful for in-memory transports in tests and custom [`Connector`]
    /// implementations.
    #[must_use]
    pub fn pair() -> (Self, mpsc::UnboundedReceiver<TransportCommand>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        (Self::new(command_tx), command_rx)
    }

    /// Sends one text frame over the transport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] if the transport is gone.
    pub fn send(&self, frame: String) -> Result<()> {
        self.command_tx
            .send(TransportCommand::Send(frame))
            .map_err(|_| Error::ConnectionClosed)
    }

    /// Asks the transport to close.
    ///
    /// Fire-and-forget; a transport that is already gone is already closed.
    pub fn close(&self) {
        let _ = self.command_tx.send(TransportCommand::Close);
    }

    /// Returns `true` while the transport is still accepting commands.
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        !self.command_tx.is_closed()
    }
}

// ============================================================================
// Connector
// ============================================================================

/// Factory seam for transports.
///
/// The production implementation is [`WsConnector`]; tests substitute
/// in-memory transports driven through [`TransportHandle::pair`].
pub trait Connector: Send + Sync + 'static {
    /// Begins a connection attempt toward `endpoint`.
    ///
    /// Never blocks: the returned handle is usable immediately and every
    /// outcome of the attempt surfaces on `events`.
    fn connect(
        &self,
        endpoint: &Url,
        events: mpsc::UnboundedSender<TransportEvent>,
    ) -> TransportHandle;
}

// ============================================================================
// Tests
// ============================================================================
