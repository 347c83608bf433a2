//! WebSocket transport layer.
//!
//! This module handles communication between the client and the local
//! printer bridge.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────┐                          ┌─────────────────┐
//! │ ConnectionManager │                          │ Printer bridge  │
//! │                   │        WebSocket         │                 │
//! │  → Connection     │◄────────────────────────►│  ws://host:8765 │
//! │    (event loop)   │                          │                 │
//! └───────────────────┘                          └─────────────────┘
//! ```
//!
//! # Connection Lifecycle
//!
//! 1. `Connection::open` - Spawn the task and dial the bridge
//! 2. `TransportEvent::Open` - Handshake done, frames flow
//! 3. `Connection::send` - Queue outbound requests
//! 4. `TransportEvent::Close` - Socket gone (remote close, error, or dropped handle)
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | WebSocket connection and event loop |

// ============================================================================
// Submodules
// ============================================================================

/// WebSocket connection and event loop.
pub mod connection;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{Connection, TransportEvent, TransportHandler};
