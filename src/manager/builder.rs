//! Builder pattern for manager configuration.
//!
//! Provides a fluent API for configuring and creating
//! [`ConnectionManager`] instances.
//!
//! # Example
//!
//! ```no_run
//! use printer_websocket::ConnectionManager;
//!
//! # async fn example() -> printer_websocket::Result<()> {
//! let manager = ConnectionManager::builder()
//!     .endpoint("ws://192.168.1.20:8765")
//!     .build()?;
//!
//! manager.connect().await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::protocol::PrinterRecord;

use super::core::{ConnectionManager, DEFAULT_BRIDGE_URL, DisplayHook, validate_endpoint};

// ============================================================================
// ConnectionManagerBuilder
// ============================================================================

/// Builder for configuring a [`ConnectionManager`].
///
/// Use [`ConnectionManager::builder()`] to create a new builder.
#[derive(Default, Clone)]
pub struct ConnectionManagerBuilder {
    /// Endpoint used by [`ConnectionManager::connect`].
    endpoint: Option<String>,
    /// Display collaborator for discovery results.
    display_hook: Option<DisplayHook>,
}

// ============================================================================
// ConnectionManagerBuilder Implementation
// ============================================================================

impl ConnectionManagerBuilder {
    /// Creates a builder with no configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bridge endpoint. Defaults to [`DEFAULT_BRIDGE_URL`].
    #[inline]
    #[must_use]
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    /// Sets the hook called with the full printer list on every discovery
    /// result.
    #[inline]
    #[must_use]
    pub fn display_hook(
        mut self,
        hook: impl Fn(&[PrinterRecord]) + Send + Sync + 'static,
    ) -> Self {
        self.display_hook = Some(Arc::new(hook));
        self
    }

    /// Builds the manager.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`](crate::Error::InvalidEndpoint) if the endpoint is not a `ws://`
    /// URL.
    pub fn build(self) -> Result<ConnectionManager> {
        let endpoint = self
            .endpoint
            .unwrap_or_else(|| DEFAULT_BRIDGE_URL.to_string());

        validate_endpoint(&endpoint)?;

        Ok(ConnectionManager::from_parts(endpoint, self.display_hook))
    }
}

impl fmt::Debug for ConnectionManagerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManagerBuilder")
            .field("endpoint", &self.endpoint)
            .field("display_hook", &self.display_hook.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
