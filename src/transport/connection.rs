//! WebSocket connection and event loop.
//!
//! Each [`Connection`] spawns one tokio task that dials the bridge, then
//! owns the socket for its whole lifetime:
//!
//! - Outgoing text frames queued by [`Connection::send`]
//! - Incoming text frames forwarded to the [`TransportHandler`]
//! - Lifecycle events (`Open`, `Error`, `Close`) forwarded the same way
//!
//! The handler sees events in socket order. A failed dial produces `Error`
//! followed by `Close`, like a browser WebSocket.

// ============================================================================
// Imports
// ============================================================================

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::protocol::Request;

// ============================================================================
// Types
// ============================================================================

/// Client-side socket stream.
type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Transport event callback.
///
/// Called from the connection task for every lifecycle event and inbound
/// text frame.
pub type TransportHandler = Box<dyn Fn(TransportEvent) + Send + Sync>;

// ============================================================================
// TransportEvent
// ============================================================================

/// Event emitted by the socket task.
#[derive(Debug)]
pub enum TransportEvent {
    /// Handshake completed.
    Open,
    /// Dial or socket error.
    Error(Error),
    /// Socket closed, by either side or by a dropped handle.
    Close,
    /// Inbound text frame.
    Message(String),
}

// ============================================================================
// ConnectionCommand
// ============================================================================

/// Internal commands for the event loop.
#[derive(Debug)]
pub(crate) enum ConnectionCommand {
    /// Send a text frame.
    Send(String),
    /// Close the socket.
    Shutdown,
}

// ============================================================================
// Connection
// ============================================================================

/// Handle to one WebSocket connection to the bridge.
///
/// Dropping the handle closes the socket: the event loop exits once its
/// command channel is gone.
#[derive(Debug)]
pub struct Connection {
    /// Channel for sending commands to the event loop.
    command_tx: mpsc::UnboundedSender<ConnectionCommand>,
}

impl Connection {
    /// Dials `url` in a background task.
    ///
    /// Returns immediately; progress is reported through `handler`.
    /// Frames sent before the handshake completes are queued.
    #[must_use]
    pub fn open(url: impl Into<String>, handler: TransportHandler) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        tokio::spawn(Self::run(url.into(), command_rx, handler));

        Self { command_tx }
    }

    /// Creates a handle whose commands go to the returned receiver.
    #[cfg(test)]
    pub(crate) fn detached() -> (Self, mpsc::UnboundedReceiver<ConnectionCommand>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        (Self { command_tx }, command_rx)
    }

    /// Queues a request for sending.
    ///
    /// # Errors
    ///
    /// - [`Error::Json`] if the request cannot be serialized
    /// - [`Error::ConnectionClosed`] if the event loop has exited
    pub fn send(&self, request: &Request) -> Result<()> {
        let frame = request.to_frame()?;
        trace!(call = request.call.name(), "Queueing request");
        self.send_text(frame)
    }

    /// Queues a raw text frame for sending.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] if the event loop has exited.
    pub fn send_text(&self, frame: String) -> Result<()> {
        self.command_tx
            .send(ConnectionCommand::Send(frame))
            .map_err(|_| Error::ConnectionClosed)
    }

    /// Returns `true` while the event loop is running.
    #[inline]
    #[must_use]
    pub fn is_alive(&self) -> bool {
        !self.command_tx.is_closed()
    }

    /// Closes the socket gracefully.
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(ConnectionCommand::Shutdown);
    }

    /// Connection task: dial, then pump frames until either side closes.
    async fn run(
        url: String,
        command_rx: mpsc::UnboundedReceiver<ConnectionCommand>,
        handler: TransportHandler,
    ) {
        let ws_stream = match connect_async(url.as_str()).await {
            Ok((ws_stream, response)) => {
                debug!(%url, status = %response.status(), "WebSocket handshake completed");
                ws_stream
            }
            Err(e) => {
                debug!(%url, error = %e, "WebSocket connect failed");
                handler(TransportEvent::Error(e.into()));
                handler(TransportEvent::Close);
                return;
            }
        };

        handler(TransportEvent::Open);

        Self::run_event_loop(ws_stream, command_rx, &handler).await;

        handler(TransportEvent::Close);
        debug!(%url, "Event loop terminated");
    }

    /// Event loop that handles WebSocket I/O.
    async fn run_event_loop(
        ws_stream: WsStream,
        mut command_rx: mpsc::UnboundedReceiver<ConnectionCommand>,
        handler: &TransportHandler,
    ) {
        let (mut ws_write, mut ws_read) = ws_stream.split();

        loop {
            tokio::select! {
                // Incoming frames from the bridge
                message = ws_read.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            handler(TransportEvent::Message(text.as_str().to_owned()));
                        }

                        Some(Ok(Message::Close(_))) => {
                            debug!("WebSocket closed by remote");
                            break;
                        }

                        Some(Err(e)) => {
                            debug!(error = %e, "WebSocket read failed");
                            handler(TransportEvent::Error(e.into()));
                            break;
                        }

                        None => {
                            debug!("WebSocket stream ended");
                            break;
                        }

                        // Ignore Binary, Ping, Pong
                        _ => {}
                    }
                }

                // Commands from the manager
                command = command_rx.recv() => {
                    match command {
                        Some(ConnectionCommand::Send(frame)) => {
                            if let Err(e) = ws_write.send(Message::Text(frame.into())).await {
                                warn!(error = %e, "Failed to send frame");
                                handler(TransportEvent::Error(e.into()));
                                break;
                            }
                            trace!("Frame sent");
                        }

                        Some(ConnectionCommand::Shutdown) => {
                            debug!("Shutdown command received");
                            let _ = ws_write.close().await;
                            break;
                        }

                        None => {
                            debug!("Command channel closed");
                            let _ = ws_write.close().await;
                            break;
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
