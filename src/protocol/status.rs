//! Printer status codes and the coarse printer status flag.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Text logged for codes outside the known table.
pub const UNKNOWN_STATUS_TEXT: &str = "Unknown error code.";

// ============================================================================
// StatusCode
// ============================================================================

/// Numeric status code carried in a bridge status frame.
///
/// Codes 1 and 4 double as event codes: 4 marks a job in progress and 0
/// marks the printer idle again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StatusCode {
    /// 0: no error, printer idle.
    NoError = 0,
    /// 1: out of paper.
    OutOfPaper = 1,
    /// 2: paused.
    Paused = 2,
    /// 3: generic printer error.
    PrinterError = 3,
    /// 4: printing.
    Printing = 4,
    /// 5: job failed.
    JobFailed = 5,
    /// 6: jammed.
    Jammed = 6,
}

impl StatusCode {
    /// Maps a wire code to a known status code.
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::NoError),
            1 => Some(Self::OutOfPaper),
            2 => Some(Self::Paused),
            3 => Some(Self::PrinterError),
            4 => Some(Self::Printing),
            5 => Some(Self::JobFailed),
            6 => Some(Self::Jammed),
            _ => None,
        }
    }

    /// Returns the wire code.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns the human-readable explanation for this code.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::NoError => "No error",
            Self::OutOfPaper => "The printer is out of paper.",
            Self::Paused => "The printer is paused.",
            Self::PrinterError => "There is a printer error.",
            Self::Printing => "The printer is printing.",
            Self::JobFailed => "The job failed.",
            Self::Jammed => "The printer is jammed.",
        }
    }

    /// Translates a raw wire code, falling back to [`UNKNOWN_STATUS_TEXT`].
    #[must_use]
    pub fn describe(code: Option<i64>) -> &'static str {
        code.and_then(Self::from_code)
            .map_or(UNKNOWN_STATUS_TEXT, Self::description)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

// ============================================================================
// PrinterStatus
// ============================================================================

/// Last-known printer activity.
///
/// Best-effort: updated from any status frame with code 0 or 4, not tied to
/// a specific job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrinterStatus {
    /// No job in progress.
    #[default]
    Idle,
    /// A job is printing.
    Printing,
}

impl PrinterStatus {
    /// Returns the status implied by a status code, if the code implies one.
    #[must_use]
    pub const fn from_status_code(code: i64) -> Option<Self> {
        match StatusCode::from_code(code) {
            Some(StatusCode::Printing) => Some(Self::Printing),
            Some(StatusCode::NoError) => Some(Self::Idle),
            _ => None,
        }
    }

    /// Returns the lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Printing => "printing",
        }
    }
}

impl fmt::Display for PrinterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_table() {
        let table = [
            (0, "No error"),
            (1, "The printer is out of paper."),
            (2, "The printer is paused."),
            (3, "There is a printer error."),
            (4, "The printer is printing."),
            (5, "The job failed."),
            (6, "The printer is jammed."),
        ];

        for (code, text) in table {
            let status = StatusCode::from_code(code).expect("known code");
            assert_eq!(i64::from(status.code()), code);
            assert_eq!(status.description(), text);
        }
    }

    #[test]
    fn test_describe_unknown() {
        assert_eq!(StatusCode::describe(Some(7)), UNKNOWN_STATUS_TEXT);
        assert_eq!(StatusCode::describe(Some(-1)), UNKNOWN_STATUS_TEXT);
        assert_eq!(StatusCode::describe(None), UNKNOWN_STATUS_TEXT);
        assert_eq!(StatusCode::describe(Some(2)), "The printer is paused.");
    }

    #[test]
    fn test_printer_status_from_code() {
        assert_eq!(PrinterStatus::from_status_code(4), Some(PrinterStatus::Printing));
        assert_eq!(PrinterStatus::from_status_code(0), Some(PrinterStatus::Idle));
        for code in [1, 2, 3, 5, 6, 42] {
            assert_eq!(PrinterStatus::from_status_code(code), None);
        }
    }

    #[test]
    fn test_printer_status_wire_names() {
        assert_eq!(PrinterStatus::default(), PrinterStatus::Idle);
        assert_eq!(
            serde_json::to_string(&PrinterStatus::Printing).expect("serialize"),
            "\"printing\""
        );
        assert_eq!(PrinterStatus::Idle.to_string(), "idle");
    }
}
