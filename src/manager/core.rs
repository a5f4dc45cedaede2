//! Connection manager and event loop.
//!
//! The manager owns the whole connection lifecycle: it translates transport
//! events into state transitions and renderer notifications, gates outbound
//! sends on the current state, and drives automatic reconnection.
//!
//! # Event Loop
//!
//! [`ConnectionManager`] is a cheap cloneable handle; the state itself
//! lives in a spawned task whose `select!` loop reacts to three sources:
//!
//! - entry points (`start()`, `request_increment()`, `shutdown()`) arriving
//!   as commands over an mpsc channel
//! - lifecycle events from the live transport
//! - the one-shot reconnect timer
//!
//! One reaction runs at a time, so no manager state needs locking.

// ============================================================================
// Imports
// ============================================================================

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{Sleep, sleep};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::protocol::{Command, Inbound};
use crate::render::{StatusRenderer, StatusStyle};
use crate::transport::{Connector, TransportEvent, TransportHandle};

use super::builder::ManagerBuilder;
use super::state::ConnectionState;

// ============================================================================
// ManagerCommand
// ============================================================================

/// Entry-point calls, serialized into the event loop.
enum ManagerCommand {
    /// Begin a connection attempt.
    Start,
    /// Try to send an increment; the outcome goes back on `reply`.
    RequestIncrement {
        reply: oneshot::Sender<Result<()>>,
    },
    /// Stop the event loop.
    Shutdown,
}

// ============================================================================
// ConnectionManager
// ============================================================================

/// Handle to a running connection manager.
///
/// Cloning is cheap; all clones drive the same event loop. Dropping every
/// clone stops the loop, as does an explicit [`shutdown`](Self::shutdown).
#[derive(Debug, Clone)]
pub struct ConnectionManager {
    /// Channel for sending commands to the event loop.
    command_tx: mpsc::UnboundedSender<ManagerCommand>,
    /// Published connection state.
    state_rx: watch::Receiver<ConnectionState>,
}

impl ConnectionManager {
    /// Returns a builder for configuring a new manager.
    #[inline]
    #[must_use]
    pub fn builder() -> ManagerBuilder {
        ManagerBuilder::new()
    }

    /// Spawns the event loop task for a validated configuration.
    pub(crate) fn spawn(
        endpoint: Url,
        reconnect_delay: Duration,
        connector: Arc<dyn Connector>,
        renderer: Arc<dyn StatusRenderer>,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Idle);

        let event_loop = EventLoop {
            endpoint,
            reconnect_delay,
            connector,
            renderer,
            state: ConnectionState::Idle,
            state_tx,
            handle: None,
            transport_rx: None,
            reconnect: None,
            command_rx,
        };
        tokio::spawn(event_loop.run());

        Self {
            command_tx,
            state_rx,
        }
    }

    /// Begins connecting to the counter service.
    ///
    /// Honored from `Idle` and `Closed`; ignored while an attempt is
    /// already in flight (`Connecting` or `Open`). Fire-and-forget: the
    /// outcome shows up as state transitions.
    pub fn start(&self) {
        let _ = self.command_tx.send(ManagerCommand::Start);
    }

    /// Attempts to send one increment command.
    ///
    /// Sends if and only if the connection is `Open` and the transport
    /// handle is ready; otherwise the command is dropped, never queued.
    ///
    /// # Errors
    ///
    /// - [`Error::NotOpen`] if the connection is not open
    /// - [`Error::ConnectionClosed`] if the send raced with the socket
    ///   going away
    /// - [`Error::ManagerStopped`] if the manager has been shut down
    pub async fn request_increment(&self) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(ManagerCommand::RequestIncrement { reply: reply_tx })
            .map_err(|_| Error::ManagerStopped)?;

        reply_rx.await.map_err(|_| Error::ManagerStopped)?
    }

    /// Returns the current connection state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Returns a watch receiver for observing state transitions.
    #[inline]
    #[must_use]
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Waits until the manager reaches `target`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManagerStopped`] if the manager stops first.
    pub async fn wait_for(&self, target: ConnectionState) -> Result<()> {
        let mut state_rx = self.state_rx.clone();
        loop {
            if *state_rx.borrow_and_update() == target {
                return Ok(());
            }
            state_rx.changed().await.map_err(|_| Error::ManagerStopped)?;
        }
    }

    /// Stops the event loop.
    ///
    /// Cancels any pending reconnect and closes the live transport, so a
    /// disposed manager is never resurrected by a stale timer.
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(ManagerCommand::Shutdown);
    }
}

// ============================================================================
// EventLoop
// ============================================================================

/// What woke the loop up.
enum Wake {
    Command(Option<ManagerCommand>),
    Transport(Option<TransportEvent>),
    RetryDue,
}

/// The actor owning all connection state.
struct EventLoop {
    /// Counter service endpoint.
    endpoint: Url,
    /// Fixed delay before automatic reconnects.
    reconnect_delay: Duration,
    /// Transport factory.
    connector: Arc<dyn Connector>,
    /// Status renderer collaborator.
    renderer: Arc<dyn StatusRenderer>,
    /// Current lifecycle state.
    state: ConnectionState,
    /// Publishes `state` to manager handles.
    state_tx: watch::Sender<ConnectionState>,
    /// Live transport handle; `Some` implies an attempt or connection.
    handle: Option<TransportHandle>,
    /// Event channel of the live transport.
    transport_rx: Option<mpsc::UnboundedReceiver<TransportEvent>>,
    /// Pending one-shot reconnect timer.
    reconnect: Option<Pin<Box<Sleep>>>,
    /// Commands from manager handles.
    command_rx: mpsc::UnboundedReceiver<ManagerCommand>,
}

impl EventLoop {
    /// Runs until shutdown or until every manager handle is dropped.
    async fn run(mut self) {
        loop {
            let wake = tokio::select! {
                command = self.command_rx.recv() => Wake::Command(command),
                event = next_event(&mut self.transport_rx) => Wake::Transport(event),
                () = retry_due(&mut self.reconnect) => Wake::RetryDue,
            };

            match wake {
                Wake::Command(Some(ManagerCommand::Start)) => self.handle_start(),

                Wake::Command(Some(ManagerCommand::RequestIncrement { reply })) => {
                    let _ = reply.send(self.handle_increment());
                }

                Wake::Command(Some(ManagerCommand::Shutdown)) => {
                    debug!("shutdown requested");
                    break;
                }

                Wake::Command(None) => {
                    debug!("all manager handles dropped");
                    break;
                }

                Wake::Transport(Some(event)) => self.handle_transport_event(event),

                Wake::Transport(None) => {
                    // Socket task ended without a final event.
                    self.transport_rx = None;
                    self.handle_closed();
                }

                Wake::RetryDue => {
                    self.reconnect = None;
                    debug!("reconnect timer fired");
                    self.handle_start();
                }
            }
        }

        // A stale timer must not resurrect a disposed manager.
        self.reconnect = None;
        if let Some(handle) = self.handle.take() {
            handle.close();
        }
        info!("connection manager stopped");
    }

    /// Begins a connection attempt, replacing any previous transport.
    fn handle_start(&mut self) {
        if !self.state.accepts_start() {
            debug!(state = %self.state, "start ignored: attempt already in flight");
            return;
        }

        info!(endpoint = %self.endpoint, "connecting");
        self.set_state(ConnectionState::Connecting);
        self.renderer
            .set_status("Connecting...", StatusStyle::Connecting);
        self.renderer.set_increment_enabled(false);

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        self.handle = Some(self.connector.connect(&self.endpoint, events_tx));
        self.transport_rx = Some(events_rx);
    }

    /// Sends an increment if the connection is open, else refuses.
    fn handle_increment(&mut self) -> Result<()> {
        let handle = match (self.state, self.handle.as_ref()) {
            (ConnectionState::Open, Some(handle)) if handle.is_ready() => handle,
            _ => {
                warn!(state = %self.state, "cannot send: connection is not open");
                return Err(Error::not_open(self.state));
            }
        };

        handle.send(Command::Increment.encode()?)?;
        debug!("increment command sent");
        Ok(())
    }

    /// Dispatches one transport lifecycle event.
    fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Opened => self.handle_opened(),
            TransportEvent::Frame(text) => self.handle_frame(&text),
            TransportEvent::Errored(reason) => self.handle_errored(&reason),
            TransportEvent::Closed => self.handle_closed(),
        }
    }

    /// Opened is only meaningful while an attempt is in flight.
    fn handle_opened(&mut self) {
        if self.state != ConnectionState::Connecting {
            debug!(state = %self.state, "opened event ignored outside Connecting");
            return;
        }

        info!("connection established");
        self.set_state(ConnectionState::Open);
        self.renderer.set_status("Connected", StatusStyle::Open);
        self.renderer.set_increment_enabled(true);
    }

    /// Decodes an inbound frame; a well-formed update is the sole path by
    /// which the displayed counter changes.
    fn handle_frame(&mut self, text: &str) {
        match Inbound::decode(text) {
            Ok(Some(Inbound::Update { value })) => {
                debug!(value, "counter update received");
                self.renderer.set_counter_display(value);
            }
            // Other message shapes are not ours to report
            Ok(None) => {}
            Err(e) => warn!(error = %e, "failed to decode inbound frame"),
        }
    }

    /// A transport error does not transition state; it triggers an active
    /// close, and the resulting closed event drives the transition.
    fn handle_errored(&mut self, reason: &str) {
        error!(reason, "transport error");
        self.renderer
            .set_status("Connection Error", StatusStyle::Closed);

        if let Some(handle) = &self.handle {
            handle.close();
        }
    }

    /// Transitions into `Closed` and schedules exactly one reconnect.
    fn handle_closed(&mut self) {
        if self.state == ConnectionState::Closed {
            debug!("closed event ignored: already closed");
            return;
        }

        warn!("connection closed");
        self.set_state(ConnectionState::Closed);
        self.renderer
            .set_status("Disconnected", StatusStyle::Closed);
        self.renderer.set_increment_enabled(false);
        self.handle = None;
        self.schedule_reconnect();
    }

    /// Arms the one-shot reconnect timer.
    ///
    /// One slot: a pending one-shot from an earlier close is superseded,
    /// and a firing that lands while an attempt is in flight is absorbed
    /// by the `start()` guard.
    fn schedule_reconnect(&mut self) {
        debug!(
            delay_ms = self.reconnect_delay.as_millis() as u64,
            "reconnect scheduled"
        );
        self.reconnect = Some(Box::pin(sleep(self.reconnect_delay)));
    }

    /// Applies and publishes a state transition.
    fn set_state(&mut self, next: ConnectionState) {
        debug!(from = %self.state, to = %next, "state transition");
        self.state = next;
        let _ = self.state_tx.send(next);
    }
}

// ============================================================================
// Select Helpers
// ============================================================================

/// Receives from the live transport; pends forever while there is none.
async fn next_event(
    transport_rx: &mut Option<mpsc::UnboundedReceiver<TransportEvent>>,
) -> Option<TransportEvent> {
    match transport_rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Resolves when the reconnect timer fires; pends forever while unarmed.
async fn retry_due(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(sleep) => sleep.await,
        None => std::future::pending().await,
    }
}

// ============================================================================
// Tests
// ============================================================================
