//! Connection manager for the printer bridge.
//!
//! [`ConnectionManager`] owns one logical connection, the session token,
//! the cached printer list and the last-known printer status.
//!
//! # Example
//!
//! ```no_run
//! use printer_websocket::ConnectionManager;
//!
//! # async fn example() -> printer_websocket::Result<()> {
//! let manager = ConnectionManager::builder()
//!     .display_hook(|printers| {
//!         for printer in printers {
//!             println!("found {printer}");
//!         }
//!     })
//!     .build()?;
//!
//! manager.initialize("ws://localhost:8765").await?;
//! let printers = manager.fetch_printers().await?;
//!
//! if let Some(name) = printers.first().and_then(|p| p.name()) {
//!     manager.print(name, "SIZE 50 mm,30 mm\r\nCLS\r\nPRINT 1\r\n");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Single outstanding request
//!
//! [`fetch_printers`](ConnectionManager::fetch_printers) and
//! [`server_version`](ConnectionManager::server_version) take over the
//! inbound handler for exactly the next message, whatever its shape. While
//! armed, that message bypasses the general dispatcher: the printer cache,
//! display hook and printer status are not updated from it. Only one such
//! call may be outstanding; arming another fails the earlier one with
//! [`Error::Superseded`].

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Instant;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, error, info, trace, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::identifiers::SessionToken;
use crate::protocol::{Call, InboundMessage, PrinterRecord, PrinterStatus, Request};
use crate::transport::{Connection, TransportEvent, TransportHandler};

use super::builder::ConnectionManagerBuilder;
use super::state::{ConnectionState, ManagerState};

// ============================================================================
// Constants
// ============================================================================

/// Listen address of the reference printer bridge.
pub const DEFAULT_BRIDGE_URL: &str = "ws://localhost:8765";

// ============================================================================
// Types
// ============================================================================

/// Display collaborator, called with the full list on every discovery result.
pub type DisplayHook = Arc<dyn Fn(&[PrinterRecord]) + Send + Sync>;

/// Connect outcome of one dial attempt.
type PendingConnect = Mutex<Option<oneshot::Sender<Result<()>>>>;

// ============================================================================
// ManagerInner
// ============================================================================

/// State shared with the connection task.
pub(crate) struct ManagerInner {
    state: Mutex<ManagerState>,
    display_hook: Mutex<Option<DisplayHook>>,
}

// ============================================================================
// ConnectionManager
// ============================================================================

/// Client for a local printer bridge.
///
/// Dropping the manager resets it, which closes the socket.
pub struct ConnectionManager {
    inner: Arc<ManagerInner>,
}

// ============================================================================
// ConnectionManager - Constructors
// ============================================================================

impl ConnectionManager {
    /// Creates a manager for [`DEFAULT_BRIDGE_URL`] with no display hook.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(DEFAULT_BRIDGE_URL.to_string(), None)
    }

    /// Creates a configuration builder.
    #[inline]
    #[must_use]
    pub fn builder() -> ConnectionManagerBuilder {
        ConnectionManagerBuilder::new()
    }

    pub(crate) fn from_parts(endpoint: String, display_hook: Option<DisplayHook>) -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                state: Mutex::new(ManagerState::new(endpoint)),
                display_hook: Mutex::new(display_hook),
            }),
        }
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// ConnectionManager - Connection
// ============================================================================

impl ConnectionManager {
    /// Connects to the bridge at `url`.
    ///
    /// The URL is recorded as the endpoint even if it is rejected. When a
    /// connection is already open this succeeds immediately and keeps the
    /// existing socket.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidEndpoint`] if `url` is not a `ws://` URL
    /// - [`Error::WebSocket`] if the dial fails before the socket opens
    pub async fn initialize(&self, url: impl Into<String>) -> Result<()> {
        let url = url.into();

        let connect_rx = {
            let mut state = self.inner.state.lock();
            state.endpoint.clone_from(&url);

            if state.is_connected() {
                warn!(
                    endpoint = %url,
                    "WebSocket connection already exists and is still active. Use the existing connection."
                );
                return Ok(());
            }

            validate_endpoint(&url)?;

            state.generation += 1;
            state.connection_state = ConnectionState::Connecting;

            let (connect_tx, connect_rx) = oneshot::channel();
            let handler =
                ManagerInner::transport_handler(Arc::downgrade(&self.inner), state.generation, connect_tx);

            // Replacing the handle closes any earlier socket
            state.connection = Some(Connection::open(url.as_str(), handler));
            debug!(endpoint = %url, generation = state.generation, "Connecting");

            connect_rx
        };

        connect_rx.await?
    }

    /// Connects to the configured endpoint.
    ///
    /// # Errors
    ///
    /// See [`initialize`](Self::initialize).
    pub async fn connect(&self) -> Result<()> {
        let endpoint = self.server_address();
        self.initialize(endpoint).await
    }

    /// Drops the socket, regenerates the session token and clears the
    /// printer list.
    ///
    /// The printer status is kept. Safe to call repeatedly.
    pub fn reset_connection(&self) {
        self.inner.state.lock().reset();
        debug!("Connection state reset");
    }
}

// ============================================================================
// ConnectionManager - Requests
// ============================================================================

impl ConnectionManager {
    /// Asks the bridge for its printers.
    ///
    /// The next inbound message answers the request: a discovery result
    /// resolves with its list, anything else fails. That message does not
    /// update [`printers`](Self::printers) or reach the display hook.
    /// There is no timeout.
    ///
    /// # Errors
    ///
    /// - [`Error::NotConnected`] if called while disconnected (nothing is sent)
    /// - [`Error::FetchFailed`] if the next message is not a discovery result
    /// - [`Error::Superseded`] if another request took over before the reply
    /// - [`Error::ConnectionClosed`] if the connection closed first
    pub async fn fetch_printers(&self) -> Result<Vec<PrinterRecord>> {
        let reply_rx = self.inner.request_reply(Call::FindPrinters)?;

        match reply_rx.await?? {
            InboundMessage::Discovery(printers) => {
                debug!(count = printers.len(), "Printers fetched");
                Ok(printers)
            }
            other => {
                warn!(kind = other.kind(), "Discovery reply carried no printer list");
                Err(Error::FetchFailed)
            }
        }
    }

    /// Asks the bridge for its version string.
    ///
    /// Uses the same single-message takeover as
    /// [`fetch_printers`](Self::fetch_printers).
    ///
    /// # Errors
    ///
    /// - [`Error::NotConnected`] if called while disconnected
    /// - [`Error::Protocol`] if the next message is not a version reply
    /// - [`Error::Superseded`] / [`Error::ConnectionClosed`] as for `fetch_printers`
    pub async fn server_version(&self) -> Result<String> {
        let reply_rx = self.inner.request_reply(Call::ServerVersion)?;

        match reply_rx.await?? {
            InboundMessage::ServerVersion(version) => Ok(version),
            other => Err(Error::protocol(format!(
                "expected server version, got {} message",
                other.kind()
            ))),
        }
    }

    /// Sends label data to `printer_name`.
    ///
    /// Fire-and-forget: while disconnected the job is logged and dropped.
    /// Completion is only visible through later status frames.
    pub fn print(&self, printer_name: impl Into<String>, label_data: impl Into<String>) {
        self.inner.send_call(Call::print(printer_name, label_data));
    }

    /// Asks the bridge for a printer's status.
    ///
    /// The reply is handled like any status frame and may update
    /// [`printer_status`](Self::printer_status).
    pub fn request_printer_status(&self, printer_name: impl Into<String>) {
        self.inner.send_call(Call::printer_status(printer_name));
    }
}

// ============================================================================
// ConnectionManager - Display Hook
// ============================================================================

impl ConnectionManager {
    /// Replaces the display hook.
    pub fn set_display_hook(&self, hook: impl Fn(&[PrinterRecord]) + Send + Sync + 'static) {
        *self.inner.display_hook.lock() = Some(Arc::new(hook));
    }

    /// Removes the display hook.
    pub fn clear_display_hook(&self) {
        *self.inner.display_hook.lock() = None;
    }
}

// ============================================================================
// ConnectionManager - Accessors
// ============================================================================

impl ConnectionManager {
    /// Returns the current session token.
    #[must_use]
    pub fn session_token(&self) -> SessionToken {
        self.inner.state.lock().session.clone()
    }

    /// Returns `true` once the socket has opened and until it closes.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.state.lock().is_connected()
    }

    /// Returns the connection lifecycle state.
    #[must_use]
    pub fn connection_state(&self) -> ConnectionState {
        self.inner.state.lock().connection_state
    }

    /// Returns the last-known printer status.
    #[must_use]
    pub fn printer_status(&self) -> PrinterStatus {
        self.inner.state.lock().printer_status
    }

    /// Returns the endpoint of the current or last connection attempt.
    #[must_use]
    pub fn server_address(&self) -> String {
        self.inner.state.lock().endpoint.clone()
    }

    /// Returns the printers from the last dispatched discovery result.
    #[must_use]
    pub fn printers(&self) -> Vec<PrinterRecord> {
        self.inner.state.lock().printers.clone()
    }

    /// Returns when the socket last opened or delivered a message.
    #[must_use]
    pub fn last_activity(&self) -> Option<Instant> {
        self.inner.state.lock().last_activity
    }
}

impl fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("ConnectionManager")
            .field("endpoint", &state.endpoint)
            .field("connection_state", &state.connection_state)
            .field("session", &state.session)
            .field("printers", &state.printers.len())
            .field("printer_status", &state.printer_status)
            .finish()
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        self.reset_connection();
    }
}

// ============================================================================
// ManagerInner - Transport Events
// ============================================================================

impl ManagerInner {
    /// Builds the callback for one dial attempt.
    ///
    /// Holds only a weak reference so the socket task never keeps the
    /// manager alive.
    fn transport_handler(
        inner: Weak<Self>,
        generation: u64,
        connect_tx: oneshot::Sender<Result<()>>,
    ) -> TransportHandler {
        let pending: PendingConnect = Mutex::new(Some(connect_tx));

        Box::new(move |event: TransportEvent| {
            if let Some(inner) = inner.upgrade() {
                inner.handle_event(generation, event, &pending);
            }
        })
    }

    /// Applies a transport event from attempt `generation`.
    ///
    /// Open and error always settle that attempt's own connect outcome;
    /// state only changes for the active attempt.
    pub(crate) fn handle_event(&self, generation: u64, event: TransportEvent, pending: &PendingConnect) {
        let active = self.state.lock().generation == generation;

        match event {
            TransportEvent::Open => {
                if active {
                    let mut state = self.state.lock();
                    state.connection_state = ConnectionState::Connected;
                    state.touch();
                    info!(endpoint = %state.endpoint, "Connected to WebSocket server.");
                }
                if let Some(tx) = pending.lock().take() {
                    let _ = tx.send(Ok(()));
                }
            }

            TransportEvent::Error(e) => {
                error!(error = %e, generation, "WebSocket error");
                if let Some(tx) = pending.lock().take() {
                    let _ = tx.send(Err(e));
                }
            }

            TransportEvent::Close if active => {
                info!("WebSocket connection closed.");
                let mut state = self.state.lock();
                state.connection_state = ConnectionState::Disconnected;
                state.reset();
            }

            TransportEvent::Message(text) if active => self.handle_message(&text),

            TransportEvent::Close | TransportEvent::Message(_) => {
                trace!(generation, "Ignoring event from superseded connection");
            }
        }
    }

    /// Parses an inbound frame and routes it to the takeover or the
    /// general dispatcher.
    pub(crate) fn handle_message(&self, text: &str) {
        let message = match InboundMessage::parse(text) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, text = %text, "Failed to parse incoming message");
                return;
            }
        };

        debug!(kind = message.kind(), "Received message");

        let takeover = {
            let mut state = self.state.lock();
            state.touch();
            state.takeover.take()
        };

        match takeover {
            Some(tx) => {
                let _ = tx.send(Ok(message));
            }
            None => self.dispatch(message),
        }
    }

    /// General dispatcher for messages nobody is waiting on.
    fn dispatch(&self, message: InboundMessage) {
        match message {
            InboundMessage::Discovery(printers) => {
                info!(count = printers.len(), "Received printer list");
                self.state.lock().printers.clone_from(&printers);

                let hook = self.display_hook.lock().clone();
                if let Some(hook) = hook {
                    hook(&printers);
                }
            }

            InboundMessage::ServerVersion(version) => {
                info!(%version, "Printer bridge version");
            }

            InboundMessage::Status(status) => {
                info!(status = %status.status, message = ?status.message, "Status");

                if status.is_error() {
                    error!(
                        status_code = ?status.status_code,
                        message = ?status.message,
                        "Translated Message: {}",
                        status.translated()
                    );
                }

                if let Some(printer_status) = status.printer_status() {
                    let mut state = self.state.lock();
                    if state.printer_status != printer_status {
                        debug!(from = %state.printer_status, to = %printer_status, "Printer status changed");
                    }
                    state.printer_status = printer_status;
                }
            }

            InboundMessage::Unknown(_) => {
                trace!("Ignoring message with unknown shape");
            }
        }
    }
}

// ============================================================================
// ManagerInner - Outbound
// ============================================================================

impl ManagerInner {
    /// Sends `call` and arms the takeover for its reply.
    fn request_reply(&self, call: Call) -> Result<oneshot::Receiver<Result<InboundMessage>>> {
        let mut state = self.state.lock();

        if !state.is_connected() {
            error!(call = call.name(), "Not connected to WebSocket server.");
            return Err(Error::NotConnected);
        }

        let request = Request::new(state.session.clone(), call);
        state
            .connection
            .as_ref()
            .ok_or(Error::ConnectionClosed)?
            .send(&request)?;

        let (reply_tx, reply_rx) = oneshot::channel();
        state.arm_takeover(reply_tx);

        Ok(reply_rx)
    }

    /// Sends `call` without waiting for anything; failures are logged.
    fn send_call(&self, call: Call) {
        let state = self.state.lock();

        if !state.is_connected() {
            error!(call = call.name(), "Not connected to WebSocket server.");
            return;
        }

        let Some(connection) = state.connection.as_ref() else {
            error!(call = call.name(), "No socket for connected state");
            return;
        };

        let request = Request::new(state.session.clone(), call);
        if let Err(e) = connection.send(&request) {
            error!(call = request.call.name(), error = %e, "Failed to send request");
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Accepts plain `ws://` URLs only.
pub(crate) fn validate_endpoint(endpoint: &str) -> Result<()> {
    let url = Url::parse(endpoint).map_err(|e| Error::invalid_endpoint(endpoint, e.to_string()))?;

    match url.scheme() {
        "ws" => Ok(()),
        "wss" => Err(Error::invalid_endpoint(endpoint, "TLS endpoints are not supported")),
        other => Err(Error::invalid_endpoint(
            endpoint,
            format!("unsupported scheme '{other}'"),
        )),
    }
}

// ============================================================================
// Test Support
// ============================================================================

#[cfg(test)]
impl ConnectionManager {
    /// Attaches a detached socket and marks it open.
    pub(crate) fn attach_detached(
        &self,
    ) -> tokio::sync::mpsc::UnboundedReceiver<crate::transport::connection::ConnectionCommand> {
        let (connection, commands) = Connection::detached();
        let generation = {
            let mut state = self.inner.state.lock();
            state.generation += 1;
            state.connection = Some(connection);
            state.generation
        };
        self.inject_for(generation, TransportEvent::Open);
        commands
    }

    /// Delivers an event as if it came from the active socket.
    pub(crate) fn inject(&self, event: TransportEvent) {
        let generation = self.inner.state.lock().generation;
        self.inject_for(generation, event);
    }

    pub(crate) fn inject_for(&self, generation: u64, event: TransportEvent) {
        self.inner.handle_event(generation, event, &Mutex::new(None));
    }
}

// ============================================================================
// Tests
// ============================================================================
