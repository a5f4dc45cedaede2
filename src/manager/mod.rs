//! Connection manager module.
//!
//! This module provides the main entry point for talking to the counter
//! service.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ConnectionManager`] | Handle to a running manager: `start()`, `request_increment()` |
//! | [`ManagerBuilder`] | Fluent configuration builder |
//! | [`ConnectionState`] | The four lifecycle states |
//!
//! # Example
//!
//! ```no_run
//! use counter_client::{ConnectionManager, ConnectionState, Result};
//!
//! # async fn example() -> Result<()> {
//! let manager = ConnectionManager::builder()
//!     .endpoint("ws://localhost:8787/v1/counter")
//!     .build()?;
//!
//! manager.start();
//! manager.wait_for(ConnectionState::Open).await?;
//! manager.request_increment().await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder pattern for manager configuration.
pub mod builder;

/// Core manager implementation and event loop.
pub mod core;

/// Connection lifecycle state.
pub mod state;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::{DEFAULT_ENDPOINT, DEFAULT_RECONNECT_DELAY, ManagerBuilder};
pub use core::ConnectionManager;
pub use state::ConnectionState;
