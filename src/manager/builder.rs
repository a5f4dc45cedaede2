//! Builder pattern for manager configuration.
//!
//! Provides a fluent API for configuring and spawning
//! [`ConnectionManager`] instances.
//!
//! # Example
//!
//! ```no_run
//! use counter_client::ConnectionManager;
//!
//! # fn example() -> counter_client::Result<()> {
//! let manager = ConnectionManager::builder()
//!     .endpoint("ws://localhost:8787/v1/counter")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};
use crate::render::{ConsoleRenderer, StatusRenderer};
use crate::transport::{Connector, WsConnector};

use super::core::ConnectionManager;

// ============================================================================
// Constants
// ============================================================================

/// Endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8787/v1/counter";

/// Fixed delay between a close and the automatic reconnect attempt.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(3000);

// ============================================================================
// ManagerBuilder
// ============================================================================

/// Builder for configuring a [`ConnectionManager`] instance.
///
/// Use [`ConnectionManager::builder()`] to create a new builder.
pub struct ManagerBuilder {
    /// Counter service endpoint.
    endpoint: Option<String>,
    /// Delay before the automatic reconnect.
    reconnect_delay: Duration,
    /// Transport factory.
    connector: Option<Arc<dyn Connector>>,
    /// Status renderer collaborator.
    renderer: Option<Arc<dyn StatusRenderer>>,
}

// ============================================================================
// ManagerBuilder Implementation
// ============================================================================

impl ManagerBuilder {
    /// Creates a builder with all defaults.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            endpoint: None,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            connector: None,
            renderer: None,
        }
    }

    /// Sets the counter service endpoint.
    ///
    /// Must be a `ws://` or `wss://` URL. Defaults to
    /// [`DEFAULT_ENDPOINT`].
    #[inline]
    #[must_use]
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    /// Sets the fixed reconnect delay.
    ///
    /// There is no backoff and no retry cap; this single delay applies to
    /// every reconnect. Defaults to [`DEFAULT_RECONNECT_DELAY`].
    #[inline]
    #[must_use]
    pub fn reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Sets the transport factory.
    ///
    /// Defaults to [`WsConnector`].
    #[inline]
    #[must_use]
    pub fn connector(mut self, connector: impl Connector) -> Self {
        self.connector = Some(Arc::new(connector));
        self
    }

    /// Sets the status renderer collaborator.
    ///
    /// Defaults to [`ConsoleRenderer`].
    #[inline]
    #[must_use]
    pub fn renderer(mut self, renderer: impl StatusRenderer) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    /// Validates the configuration and spawns the manager's event loop.
    ///
    /// Must be called within a Tokio runtime. The returned manager is
    /// still `Idle`; nothing connects until `start()`.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the endpoint does not parse
    /// - [`Error::Config`] if the endpoint scheme is not `ws` or `wss`
    pub fn build(self) -> Result<ConnectionManager> {
        let endpoint = self.validate_endpoint()?;
        let connector = self
            .connector
            .unwrap_or_else(|| Arc::new(WsConnector));
        let renderer = self
            .renderer
            .unwrap_or_else(|| Arc::new(ConsoleRenderer::new()));

        Ok(ConnectionManager::spawn(
            endpoint,
            self.reconnect_delay,
            connector,
            renderer,
        ))
    }

    /// Parses and checks the endpoint.
    fn validate_endpoint(&self) -> Result<Url> {
        let raw = self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);
        let url = Url::parse(raw)
            .map_err(|e| Error::config(format!("invalid endpoint {raw:?}: {e}")))?;

        match url.scheme() {
            "ws" | "wss" => Ok(url),
            scheme => Err(Error::config(format!(
                "endpoint scheme must be ws or wss, got {scheme:?}"
            ))),
        }
    }
}

impl Default for ManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unparseable_endpoint_rejected() {
        let result = ManagerBuilder::new().endpoint("not a url").build();
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_non_websocket_scheme_rejected() {
        let result = ManagerBuilder::new()
            .endpoint("http://localhost:8787/v1/counter")
            .build();
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_default_endpoint_is_valid() {
        let builder = ManagerBuilder::new();
        let url = builder.validate_endpoint().expect("default parses");
        assert_eq!(url.as_str(), DEFAULT_ENDPOINT);
    }

    #[tokio::test]
    async fn test_default_build_spawns_idle_manager() {
        let manager = ManagerBuilder::new().build().expect("valid defaults");
        assert_eq!(
            manager.state(),
            crate::manager::ConnectionState::Idle
        );
        manager.shutdown();
    }
}
