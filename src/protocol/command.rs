//! Calls understood by the printer bridge.
//!
//! Calls are discriminated by the `call` field:
//!
//! | Call | Reply |
//! |------|-------|
//! | `printers.find` | `{ "result": [...] }` |
//! | `print` | status frames, if any |
//! | `server.version` | `{ "result": "x.y.z" }` |
//! | `printerStatus` | status frame |

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

// ============================================================================
// Call
// ============================================================================

/// Bridge call with its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call")]
pub enum Call {
    /// Enumerate printers known to the bridge.
    #[serde(rename = "printers.find")]
    FindPrinters,

    /// Send raw label data to a printer.
    #[serde(rename = "print")]
    Print {
        /// Target printer and payload.
        params: PrintParams,
    },

    /// Ask the bridge for its version string.
    #[serde(rename = "server.version")]
    ServerVersion,

    /// Ask the bridge for a printer's current status.
    #[serde(rename = "printerStatus")]
    PrinterStatus {
        /// Printer to query.
        #[serde(rename = "PrinterName")]
        printer_name: String,
    },
}

impl Call {
    /// Creates a print call carrying `label_data` as the only data chunk.
    #[must_use]
    pub fn print(printer_name: impl Into<String>, label_data: impl Into<String>) -> Self {
        Self::Print {
            params: PrintParams {
                printer: PrinterRef {
                    name: printer_name.into(),
                },
                data: vec![label_data.into()],
            },
        }
    }

    /// Creates a printer status query.
    #[must_use]
    pub fn printer_status(printer_name: impl Into<String>) -> Self {
        Self::PrinterStatus {
            printer_name: printer_name.into(),
        }
    }

    /// Returns the wire name of this call.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::FindPrinters => "printers.find",
            Self::Print { .. } => "print",
            Self::ServerVersion => "server.version",
            Self::PrinterStatus { .. } => "printerStatus",
        }
    }
}

// ============================================================================
// Print Parameters
// ============================================================================

/// Parameters of a `print` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintParams {
    /// Target printer.
    pub printer: PrinterRef,
    /// Label payload chunks. The bridge concatenates them.
    pub data: Vec<String>,
}

/// Reference to a printer by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterRef {
    /// Printer name as reported by discovery.
    pub name: String,
}

// ============================================================================
// Tests
// ============================================================================
