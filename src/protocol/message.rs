//! Inbound message types.
//!
//! The bridge does not tag its frames. Messages are classified by shape:
//!
//! | Shape | Variant |
//! |-------|---------|
//! | `result` is an array | [`InboundMessage::Discovery`] |
//! | `result` is a string | [`InboundMessage::ServerVersion`] |
//! | `status` is present | [`InboundMessage::Status`] |
//! | anything else | [`InboundMessage::Unknown`] |
//!
//! `result` wins over `status` when both are present. Presence follows JSON
//! truthiness: `null`, `false`, `0` and `""` count as absent.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

use super::status::{PrinterStatus, StatusCode};

// ============================================================================
// PrinterRecord
// ============================================================================

/// A printer as reported by discovery.
///
/// The record is server-defined: the reference bridge sends bare names,
/// others send objects with a `name` field plus arbitrary metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrinterRecord(Value);

impl PrinterRecord {
    /// Wraps a raw record.
    #[inline]
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Returns the printer name used for print submission.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match &self.0 {
            Value::String(name) => Some(name.as_str()),
            Value::Object(fields) => fields.get("name").and_then(Value::as_str),
            _ => None,
        }
    }

    /// Returns the raw record.
    #[inline]
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the record, returning the raw value.
    #[inline]
    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for PrinterRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl fmt::Display for PrinterRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.0),
        }
    }
}

// ============================================================================
// StatusNotification
// ============================================================================

/// A status or event frame.
///
/// # Format
///
/// ```json
/// { "status": "error", "status_code": 2, "message": "paused" }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StatusNotification {
    /// Status text. `"error"` marks an error report.
    pub status: String,
    /// Numeric status code, if present and integral.
    pub status_code: Option<i64>,
    /// Server-provided message.
    pub message: Option<String>,
    /// Printer the status refers to, for `printerStatus` replies.
    pub printer_name: Option<String>,
}

impl StatusNotification {
    /// Returns `true` if the bridge reported an error.
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status == "error"
    }

    /// Returns the known status code, if any.
    #[inline]
    #[must_use]
    pub fn code(&self) -> Option<StatusCode> {
        self.status_code.and_then(StatusCode::from_code)
    }

    /// Returns the human-readable text for the status code.
    #[inline]
    #[must_use]
    pub fn translated(&self) -> &'static str {
        StatusCode::describe(self.status_code)
    }

    /// Returns the printer status this frame implies (codes 0 and 4 only).
    #[inline]
    #[must_use]
    pub fn printer_status(&self) -> Option<PrinterStatus> {
        self.status_code.and_then(PrinterStatus::from_status_code)
    }
}

// ============================================================================
// InboundMessage
// ============================================================================

/// A decoded frame from the bridge.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// Printer discovery result.
    Discovery(Vec<PrinterRecord>),
    /// Server version reply.
    ServerVersion(String),
    /// Status or event notification.
    Status(StatusNotification),
    /// Any other shape.
    Unknown(Value),
}

impl InboundMessage {
    /// Parses a text frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if the frame is not JSON.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(value))
    }

    /// Classifies an already-parsed JSON value.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        if let Some(result) = value.get("result").filter(|v| is_truthy(v)) {
            match result {
                Value::Array(items) => {
                    return Self::Discovery(items.iter().cloned().map(PrinterRecord::new).collect());
                }
                Value::Object(_) => {
                    return Self::Discovery(vec![PrinterRecord::new(result.clone())]);
                }
                Value::String(version) => return Self::ServerVersion(version.clone()),
                _ => {}
            }
            return Self::Unknown(value);
        }

        if let Some(status) = value.get("status").filter(|v| is_truthy(v)) {
            let status = match status {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Self::Status(StatusNotification {
                status,
                status_code: value.get("status_code").and_then(integral),
                message: get_string(&value, "message"),
                printer_name: get_string(&value, "PrinterName"),
            });
        }

        Self::Unknown(value)
    }

    /// Returns a short name for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Discovery(_) => "discovery",
            Self::ServerVersion(_) => "server_version",
            Self::Status(_) => "status",
            Self::Unknown(_) => "unknown",
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// JSON truthiness as the bridge's clients evaluate it.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Integer value of a JSON number without a fractional part, so `4.0`
/// reads as `4`.
fn integral(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

#[inline]
fn get_string(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_discovery_objects() {
        let msg = InboundMessage::parse(r#"{"result": [{"name":"P1"}]}"#).expect("parse");
        let InboundMessage::Discovery(printers) = msg else {
            panic!("expected discovery");
        };
        assert_eq!(printers, vec![PrinterRecord::new(json!({ "name": "P1" }))]);
        assert_eq!(printers[0].name(), Some("P1"));
    }

    #[test]
    fn test_discovery_bare_names() {
        let msg = InboundMessage::parse(
            r#"{"uid":"uid-1","result":["Zebra ZD420","TSC TE200"],"status_code":0}"#,
        )
        .expect("parse");
        let InboundMessage::Discovery(printers) = msg else {
            panic!("expected discovery");
        };
        let names: Vec<_> = printers.iter().filter_map(PrinterRecord::name).collect();
        assert_eq!(names, ["Zebra ZD420", "TSC TE200"]);
    }

    #[test]
    fn test_empty_discovery_is_still_discovery() {
        let msg = InboundMessage::parse(r#"{"result": []}"#).expect("parse");
        assert_eq!(msg, InboundMessage::Discovery(Vec::new()));
    }

    #[test]
    fn test_server_version() {
        let msg = InboundMessage::parse(r#"{"result":"0.1.0","info":"serverVersion"}"#)
            .expect("parse");
        assert_eq!(msg, InboundMessage::ServerVersion("0.1.0".to_string()));
    }

    #[test]
    fn test_status_frame() {
        let msg = InboundMessage::parse(r#"{"status":"error","status_code":2,"message":"paused"}"#)
            .expect("parse");
        let InboundMessage::Status(status) = msg else {
            panic!("expected status");
        };
        assert!(status.is_error());
        assert_eq!(status.code(), Some(StatusCode::Paused));
        assert_eq!(status.translated(), "The printer is paused.");
        assert_eq!(status.message.as_deref(), Some("paused"));
        assert_eq!(status.printer_status(), None);
    }

    #[test]
    fn test_printing_status() {
        let msg = InboundMessage::parse(r#"{"status":"ok","status_code":4,"message":"printing"}"#)
            .expect("parse");
        let InboundMessage::Status(status) = msg else {
            panic!("expected status");
        };
        assert!(!status.is_error());
        assert_eq!(status.printer_status(), Some(PrinterStatus::Printing));
    }

    #[test]
    fn test_printer_status_reply() {
        let msg = InboundMessage::parse(
            r#"{"uid":"u","status":"Printer status retrieved","PrinterName":"P1","status_code":0}"#,
        )
        .expect("parse");
        let InboundMessage::Status(status) = msg else {
            panic!("expected status");
        };
        assert_eq!(status.printer_name.as_deref(), Some("P1"));
        assert_eq!(status.printer_status(), Some(PrinterStatus::Idle));
    }

    #[test]
    fn test_whole_float_status_code() {
        let msg = InboundMessage::parse(r#"{"status":"ok","status_code":4.0}"#).expect("parse");
        let InboundMessage::Status(status) = msg else {
            panic!("expected status");
        };
        assert_eq!(status.status_code, Some(4));
        assert_eq!(status.printer_status(), Some(PrinterStatus::Printing));

        let msg = InboundMessage::parse(r#"{"status":"ok","status_code":4.5}"#).expect("parse");
        let InboundMessage::Status(status) = msg else {
            panic!("expected status");
        };
        assert_eq!(status.status_code, None);
    }

    #[test]
    fn test_single_object_result_is_one_printer() {
        let msg = InboundMessage::parse(r#"{"result":{"name":"P1"}}"#).expect("parse");
        assert_eq!(
            msg,
            InboundMessage::Discovery(vec![PrinterRecord::new(json!({ "name": "P1" }))])
        );
    }

    #[test]
    fn test_scalar_result_is_unknown() {
        let msg = InboundMessage::parse(r#"{"result":7}"#).expect("parse");
        assert_eq!(msg.kind(), "unknown");
    }

    #[test]
    fn test_result_wins_over_status() {
        let msg = InboundMessage::parse(r#"{"result":["P1"],"status":"error","status_code":3}"#)
            .expect("parse");
        assert!(matches!(msg, InboundMessage::Discovery(_)));
    }

    #[test]
    fn test_falsy_fields_are_absent() {
        let msg = InboundMessage::parse(r#"{"result":null,"status":"","status_code":4}"#)
            .expect("parse");
        assert!(matches!(msg, InboundMessage::Unknown(_)));
    }

    #[test]
    fn test_unknown_shape() {
        let msg = InboundMessage::parse(r#"{"hello":"world"}"#).expect("parse");
        assert_eq!(msg.kind(), "unknown");
    }

    #[test]
    fn test_invalid_json() {
        assert!(InboundMessage::parse("not json").is_err());
    }

    #[test]
    fn test_record_display() {
        assert_eq!(PrinterRecord::new(json!("P1")).to_string(), "P1");
        assert_eq!(PrinterRecord::new(json!({ "id": 3 })).to_string(), r#"{"id":3}"#);
    }
}
