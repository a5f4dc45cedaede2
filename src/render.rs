//! Status renderer collaborator.
//!
//! The connection manager owns no display state of its own; every
//! user-visible change flows out through [`StatusRenderer`]. The counter
//! value in particular lives on the renderer side and is only ever pushed,
//! never read back.
//!
//! Implementations must tolerate being called from the manager's event loop
//! task; all methods take `&self` so a renderer can be shared with whatever
//! drives the actual display.

// ============================================================================
// Imports
// ============================================================================

use parking_lot::Mutex;

// ============================================================================
// StatusStyle
// ============================================================================

/// Style tag accompanying every status message.
///
/// Maps one-to-one onto the display's status classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusStyle {
    /// A connection attempt is in flight.
    Connecting,
    /// The connection is established and believed healthy.
    Open,
    /// The connection is down or has just failed.
    Closed,
}

impl StatusStyle {
    /// Returns the style class name for this tag.
    #[inline]
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Connecting => "status-connecting",
            Self::Open => "status-open",
            Self::Closed => "status-closed",
        }
    }
}

// ============================================================================
// StatusRenderer
// ============================================================================

/// Outbound notification interface consumed by the connection manager.
///
/// Called on every state transition and on every accepted counter update.
/// Calls arrive serialized (one at a time) from the manager's event loop.
pub trait StatusRenderer: Send + Sync + 'static {
    /// Displays a human-readable status label with its style tag.
    fn set_status(&self, message: &str, style: StatusStyle);

    /// Displays a new counter value.
    ///
    /// This is the sole path by which the displayed counter changes.
    fn set_counter_display(&self, value: u64);

    /// Enables or disables the increment affordance.
    fn set_increment_enabled(&self, enabled: bool);
}

// ============================================================================
// ConsoleRenderer
// ============================================================================

/// Terminal renderer: status, counter and affordance as stdout lines.
///
/// Keeps the last counter value so callers embedding the renderer can read
/// it back, e.g. for display on demand.
#[derive(Debug, Default)]
pub struct ConsoleRenderer {
    /// Last counter value observed from the service.
    value: Mutex<u64>,
}

impl ConsoleRenderer {
    /// Creates a renderer with the counter at zero.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last displayed counter value.
    #[inline]
    #[must_use]
    pub fn value(&self) -> u64 {
        *self.value.lock()
    }
}

impl StatusRenderer for ConsoleRenderer {
    fn set_status(&self, message: &str, style: StatusStyle) {
        println!("[{}] {message}", style.class_name());
    }

    fn set_counter_display(&self, value: u64) {
        *self.value.lock() = value;
        println!("counter: {value}");
    }

    fn set_increment_enabled(&self, enabled: bool) {
        if enabled {
            println!("increment available (type 'i' + Enter)");
        } else {
            println!("increment unavailable");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
