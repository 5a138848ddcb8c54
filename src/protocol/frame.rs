//! Primary channel frame types.
//!
//! Defines the JSON envelope exchanged with the TV over the primary
//! WebSocket.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::identifiers::CommandId;

// ============================================================================
// Constants
// ============================================================================

/// Scheme prepended to every request URI.
pub const SSAP_SCHEME: &str = "ssap://";

// ============================================================================
// FrameType
// ============================================================================

/// Kind of an outbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameType {
    /// Pairing handshake.
    Register,
    /// Command request.
    Request,
}

// ============================================================================
// OutboundFrame
// ============================================================================

/// A frame sent from the client to the TV.
///
/// # Format
///
/// ```json
/// {
///   "type": "request",
///   "id": "101",
///   "uri": "ssap://audio/volumeUp",
///   "payload": {}
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct OutboundFrame {
    /// Frame kind.
    #[serde(rename = "type")]
    pub frame_type: FrameType,

    /// Correlation identifier.
    pub id: CommandId,

    /// Target URI (absent for `register`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    /// Command payload.
    pub payload: Value,
}

impl OutboundFrame {
    /// Creates a `register` frame.
    #[inline]
    #[must_use]
    pub fn register(id: CommandId, payload: Value) -> Self {
        Self {
            frame_type: FrameType::Register,
            id,
            uri: None,
            payload,
        }
    }

    /// Creates a `request` frame for `ssap://{uri_suffix}`.
    ///
    /// A `null` payload is sent as an empty object.
    #[must_use]
    pub fn request(id: CommandId, uri_suffix: &str, payload: Value) -> Self {
        let payload = match payload {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };

        Self {
            frame_type: FrameType::Request,
            id,
            uri: Some(ssap_uri(uri_suffix)),
            payload,
        }
    }
}

/// Returns the full request URI for a suffix.
#[inline]
#[must_use]
pub fn ssap_uri(uri_suffix: &str) -> String {
    format!("{SSAP_SCHEME}{uri_suffix}")
}

// ============================================================================
// MessageKind
// ============================================================================

/// Kind of an inbound frame.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum MessageKind {
    /// Reply to a request, or "prompt shown" during pairing.
    Response,
    /// Pairing accepted; carries the client key.
    Registered,
    /// Failure reply; detail is in the `error` field.
    Error,
    /// Any kind this client does not know.
    Other(String),
}

impl From<String> for MessageKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "response" => Self::Response,
            "registered" => Self::Registered,
            "error" => Self::Error,
            _ => Self::Other(kind),
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Response => f.write_str("response"),
            Self::Registered => f.write_str("registered"),
            Self::Error => f.write_str("error"),
            Self::Other(kind) => f.write_str(kind),
        }
    }
}

// ============================================================================
// InboundFrame
// ============================================================================

/// A frame received from the TV.
///
/// # Format
///
/// ```json
/// { "type": "response", "id": "101", "payload": { "returnValue": true } }
/// { "type": "error", "id": "101", "error": "404 no such service or method" }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct InboundFrame {
    /// Frame kind.
    #[serde(rename = "type")]
    pub kind: MessageKind,

    /// Identifier of the command this answers.
    #[serde(default)]
    pub id: Option<CommandId>,

    /// Reply payload.
    #[serde(default)]
    pub payload: Option<Value>,

    /// Error detail (error frames only).
    #[serde(default)]
    pub error: Option<Value>,
}

impl InboundFrame {
    /// Splits the frame into its kind and the payload relevant to it.
    ///
    /// `error` frames yield their `error` field, all others their
    /// `payload`. A missing field yields `Value::Null`.
    #[must_use]
    pub fn into_parts(self) -> (MessageKind, Value) {
        let body = match self.kind {
            MessageKind::Error => self.error,
            _ => self.payload,
        };
        (self.kind, body.unwrap_or(Value::Null))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_request_frame_serialization() {
        let frame = OutboundFrame::request(CommandId::from("101"), "audio/volumeUp", json!({}));
        let value = serde_json::to_value(&frame).expect("serialize");

        assert_eq!(
            value,
            json!({
                "type": "request",
                "id": "101",
                "uri": "ssap://audio/volumeUp",
                "payload": {}
            })
        );
    }

    #[test]
    fn test_null_payload_becomes_object() {
        let frame = OutboundFrame::request(CommandId::from("102"), "system/turnOff", Value::Null);
        assert_eq!(frame.payload, json!({}));
    }

    #[test]
    fn test_register_frame_has_no_uri() {
        let frame = OutboundFrame::register(CommandId::register(), json!({"client-key": ""}));
        let json = serde_json::to_string(&frame).expect("serialize");

        assert!(json.contains("\"type\":\"register\""));
        assert!(json.contains("\"id\":\"reg0\""));
        assert!(!json.contains("uri"));
    }

    #[test]
    fn test_response_frame_parts() {
        let frame: InboundFrame = serde_json::from_str(
            r#"{"type":"response","id":"101","payload":{"returnValue":true}}"#,
        )
        .expect("parse");

        assert_eq!(frame.id, Some(CommandId::from("101")));
        let (kind, payload) = frame.into_parts();
        assert_eq!(kind, MessageKind::Response);
        assert_eq!(payload, json!({"returnValue": true}));
    }

    #[test]
    fn test_error_frame_uses_error_field() {
        let frame: InboundFrame = serde_json::from_str(
            r#"{"type":"error","id":"101","error":"401 insufficient permissions","payload":{}}"#,
        )
        .expect("parse");

        let (kind, detail) = frame.into_parts();
        assert_eq!(kind, MessageKind::Error);
        assert_eq!(detail, json!("401 insufficient permissions"));
    }

    #[test]
    fn test_unknown_kind_and_missing_id() {
        let frame: InboundFrame =
            serde_json::from_str(r#"{"type":"hello","payload":{}}"#).expect("parse");

        assert!(frame.id.is_none());
        assert_eq!(frame.kind, MessageKind::Other("hello".to_string()));
        assert_eq!(frame.kind.to_string(), "hello");
    }
}
