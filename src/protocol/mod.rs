//! Printer bridge wire protocol.
//!
//! All frames are JSON text over a WebSocket.
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | `Request` | Client → Bridge | Call tagged with the session token |
//! | `InboundMessage` | Bridge → Client | Discovery result, version, or status |
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `command` | Call definitions |
//! | `message` | Inbound frame classification |
//! | `request` | Outbound request envelope |
//! | `status` | Status code table and printer status |

// ============================================================================
// Submodules
// ============================================================================

/// Call definitions.
pub mod command;

/// Inbound message types.
pub mod message;

/// Outbound request envelope.
pub mod request;

/// Status codes.
pub mod status;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::{Call, PrintParams, PrinterRef};
pub use message::{InboundMessage, PrinterRecord, StatusNotification};
pub use request::Request;
pub use status::{PrinterStatus, StatusCode, UNKNOWN_STATUS_TEXT};
