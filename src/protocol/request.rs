//! Outbound request envelope.
//!
//! Every call is sent tagged with the session token so the bridge can
//! correlate requests from the same client.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::identifiers::SessionToken;

use super::Call;

// ============================================================================
// Request
// ============================================================================

/// A call from the client to the bridge.
///
/// # Format
///
/// ```json
/// {
///   "call": "print",
///   "uid": "uid-3f2a9c0d81b74e6a",
///   "params": { "printer": { "name": "LabelPrinter" }, "data": ["..."] }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Session token of the sending client.
    pub uid: SessionToken,

    /// Call name and parameters.
    #[serde(flatten)]
    pub call: Call,
}

impl Request {
    /// Creates a new request.
    #[inline]
    #[must_use]
    pub fn new(uid: SessionToken, call: Call) -> Self {
        Self { uid, call }
    }

    /// Serializes the request to a text frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
    pub fn to_frame(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::{Value, json};

    #[test]
    fn test_discovery_request_frame() {
        let uid = SessionToken::generate();
        let frame = Request::new(uid.clone(), Call::FindPrinters)
            .to_frame()
            .expect("serialize");

        let value: Value = serde_json::from_str(&frame).expect("parse");
        assert_eq!(value, json!({ "call": "printers.find", "uid": uid.as_str() }));
    }

    #[test]
    fn test_print_request_frame() {
        let uid = SessionToken::generate();
        let frame = Request::new(uid.clone(), Call::print("P1", "PRINT 1"))
            .to_frame()
            .expect("serialize");

        let value: Value = serde_json::from_str(&frame).expect("parse");
        assert_eq!(value["call"], "print");
        assert_eq!(value["uid"], uid.as_str());
        assert_eq!(value["params"]["printer"]["name"], "P1");
        assert_eq!(value["params"]["data"], json!(["PRINT 1"]));
    }

    #[test]
    fn test_request_parses_back() {
        let request = Request::new(SessionToken::generate(), Call::printer_status("P1"));
        let frame = request.to_frame().expect("serialize");
        let parsed: Request = serde_json::from_str(&frame).expect("parse");
        assert_eq!(parsed, request);
    }
}
