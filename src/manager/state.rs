//! Shared state behind a [`ConnectionManager`](super::ConnectionManager).

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::time::Instant;

use tokio::sync::oneshot;

use crate::error::{Error, Result};
use crate::identifiers::SessionToken;
use crate::protocol::{InboundMessage, PrinterRecord, PrinterStatus};
use crate::transport::Connection;

// ============================================================================
// ConnectionState
// ============================================================================

/// Lifecycle of the logical connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// No socket, or the last socket closed.
    #[default]
    Disconnected,
    /// Dial in progress.
    Connecting,
    /// Handshake completed.
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        };
        f.write_str(s)
    }
}

// ============================================================================
// Takeover
// ============================================================================

/// One-shot interception of the next inbound message.
pub(crate) type Takeover = oneshot::Sender<Result<InboundMessage>>;

// ============================================================================
// ManagerState
// ============================================================================

/// Mutable manager fields, guarded by one mutex.
pub(crate) struct ManagerState {
    /// Socket handle of the active attempt.
    pub connection: Option<Connection>,
    /// Generation of the active attempt. Events from older ones are ignored.
    pub generation: u64,
    pub connection_state: ConnectionState,
    pub session: SessionToken,
    pub printers: Vec<PrinterRecord>,
    pub printer_status: PrinterStatus,
    pub endpoint: String,
    pub last_activity: Option<Instant>,
    /// Armed by `fetch_printers`/`server_version`.
    pub takeover: Option<Takeover>,
}

impl ManagerState {
    pub fn new(endpoint: String) -> Self {
        Self {
            connection: None,
            generation: 0,
            connection_state: ConnectionState::Disconnected,
            session: SessionToken::generate(),
            printers: Vec::new(),
            printer_status: PrinterStatus::Idle,
            endpoint,
            last_activity: None,
            takeover: None,
        }
    }

    /// Drops the socket, regenerates the session and clears the printer list.
    ///
    /// Printer status survives a reset. An armed takeover fails with
    /// [`Error::ConnectionClosed`].
    pub fn reset(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.shutdown();
        }
        self.session = SessionToken::generate();
        self.printers.clear();

        if let Some(takeover) = self.takeover.take() {
            let _ = takeover.send(Err(Error::ConnectionClosed));
        }
    }

    /// Arms a takeover, failing any previous one with [`Error::Superseded`].
    pub fn arm_takeover(&mut self, takeover: Takeover) {
        if let Some(previous) = self.takeover.replace(takeover) {
            let _ = previous.send(Err(Error::Superseded));
        }
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.connection_state == ConnectionState::Connected
    }

    #[inline]
    pub fn touch(&mut self) {
        self.last_activity = Some(Instant::now());
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = ManagerState::new("ws://localhost:8765".to_string());
        assert_eq!(state.connection_state, ConnectionState::Disconnected);
        assert_eq!(state.printer_status, PrinterStatus::Idle);
        assert!(state.printers.is_empty());
        assert!(state.last_activity.is_none());
        assert!(!state.is_connected());
    }

    #[test]
    fn test_reset_keeps_printer_status() {
        let mut state = ManagerState::new(String::new());
        state.printer_status = PrinterStatus::Printing;
        state.printers.push(PrinterRecord::new(serde_json::json!("P1")));
        let before = state.session.clone();

        state.reset();

        assert_ne!(state.session, before);
        assert!(state.printers.is_empty());
        assert_eq!(state.printer_status, PrinterStatus::Printing);
    }

    #[test]
    fn test_reset_fails_armed_takeover() {
        let mut state = ManagerState::new(String::new());
        let (tx, mut rx) = oneshot::channel();
        state.arm_takeover(tx);

        state.reset();

        assert!(matches!(rx.try_recv(), Ok(Err(Error::ConnectionClosed))));
    }

    #[test]
    fn test_second_takeover_supersedes_first() {
        let mut state = ManagerState::new(String::new());
        let (first_tx, mut first_rx) = oneshot::channel();
        let (second_tx, mut second_rx) = oneshot::channel();

        state.arm_takeover(first_tx);
        state.arm_takeover(second_tx);

        assert!(matches!(first_rx.try_recv(), Ok(Err(Error::Superseded))));
        assert!(second_rx.try_recv().is_err());
        assert!(state.takeover.is_some());
    }

    #[test]
    fn test_connection_state_display() {
        assert_eq!(ConnectionState::Connecting.to_string(), "connecting");
    }
}
