//! Printer WebSocket - client for local label-printer bridges.
//!
//! This library connects an application to a printer bridge running on the
//! local machine, lists the printers the bridge knows about, and submits
//! raw TSPL label jobs to them.
//!
//! # Architecture
//!
//! - **Client (Rust)**: [`ConnectionManager`] sends calls, tracks state
//! - **Bridge (remote)**: enumerates printers, spools raw jobs, pushes status
//!
//! Key design points:
//!
//! - One [`ConnectionManager`] owns one socket + session token + printer cache
//! - Calls use `module.method` style names (`printers.find`, `print`)
//! - Inbound frames are classified by shape, not by tag
//! - One outstanding reply at a time; no retries, no timeouts
//!
//! # Quick Start
//!
//! ```no_run
//! use printer_websocket::{ConnectionManager, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let manager = ConnectionManager::new();
//!     manager.initialize("ws://localhost:8765").await?;
//!
//!     for printer in manager.fetch_printers().await? {
//!         println!("Printer: {printer}");
//!     }
//!
//!     manager.print("LabelPrinter", "SIZE 50 mm,30 mm\r\nCLS\r\nPRINT 1\r\n");
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`manager`] | [`ConnectionManager`] and its builder |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Session token |
//! | [`protocol`] | Bridge message types |
//! | [`transport`] | WebSocket connection and event loop |

// ============================================================================
// Modules
// ============================================================================

/// Connection manager and configuration.
///
/// Use [`ConnectionManager::builder()`] to create a configured instance.
pub mod manager;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers.
pub mod identifiers;

/// Printer bridge message types.
pub mod protocol;

/// WebSocket transport layer.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Manager types
pub use manager::{
    ConnectionManager, ConnectionManagerBuilder, ConnectionState, DEFAULT_BRIDGE_URL, DisplayHook,
};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::SessionToken;

// Protocol types
pub use protocol::{InboundMessage, PrinterRecord, PrinterStatus, StatusCode, StatusNotification};
