//! Text frame codec for ScreenLink messages.
//!
//! The transport delivers whole frames (WebSocket text messages), so unlike a
//! raw byte-stream protocol there is no length-prefix buffering to do here:
//! one frame is one JSON document. The codec's job is to pin down the
//! error taxonomy:
//!
//! - An outbound command serializes exactly once, at send time. A
//!   serialization failure is a programming error surfaced as
//!   [`ProtocolError::Encode`].
//! - An inbound frame either parses into a known [`InboundMessage`] or is
//!   rejected as [`ProtocolError::MalformedFrame`]. Callers drop malformed
//!   frames and keep the stream alive; one bad frame is never fatal.

use thiserror::Error;

use crate::protocol::messages::{InboundMessage, OutboundCommand};

/// Errors that can occur while encoding or decoding wire frames.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The inbound frame was not a well-formed envelope: invalid JSON, an
    /// unknown `"type"`, or a payload of the wrong shape.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// The outbound command could not be serialized.
    #[error("command serialization failed: {0}")]
    Encode(String),
}

/// Encodes one [`OutboundCommand`] into a single JSON text frame.
///
/// # Errors
///
/// Returns [`ProtocolError::Encode`] if serialization fails.
///
/// # Examples
///
/// ```rust
/// use screenlink_core::{encode_command, OutboundCommand};
///
/// let frame = encode_command(&OutboundCommand::ClickAt { x: 200, y: 100 }).unwrap();
/// assert_eq!(frame, r#"{"type":"click_at","payload":{"x":200,"y":100}}"#);
/// ```
pub fn encode_command(command: &OutboundCommand) -> Result<String, ProtocolError> {
    serde_json::to_string(command).map_err(|e| ProtocolError::Encode(e.to_string()))
}

/// Decodes one inbound text frame into an [`InboundMessage`].
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedFrame`] for anything that is not a
/// known, well-formed envelope.
///
/// # Examples
///
/// ```rust
/// use screenlink_core::{decode_frame, InboundMessage};
///
/// let msg = decode_frame(r#"{"type":"screenshot","payload":"aGk="}"#).unwrap();
/// assert_eq!(msg, InboundMessage::Screenshot("aGk=".to_string()));
/// ```
pub fn decode_frame(frame: &str) -> Result<InboundMessage, ProtocolError> {
    serde_json::from_str(frame).map_err(|e| ProtocolError::MalformedFrame(e.to_string()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::messages::{ScrollDirection, ScrollPayload};

    #[test]
    fn test_encode_click_produces_exact_frame() {
        let frame = encode_command(&OutboundCommand::ClickAt { x: 1, y: 2 }).unwrap();
        assert_eq!(frame, r#"{"type":"click_at","payload":{"x":1,"y":2}}"#);
    }

    #[test]
    fn test_encode_scroll_page_produces_exact_frame() {
        let frame = encode_command(&OutboundCommand::Scroll(ScrollPayload::Page {
            direction: ScrollDirection::Up,
            percent: 90,
        }))
        .unwrap();
        assert_eq!(
            frame,
            r#"{"type":"scroll","payload":{"direction":"up","percent":90}}"#
        );
    }

    #[test]
    fn test_decode_screenshot_frame() {
        let msg = decode_frame(r#"{"type":"screenshot","payload":"img=="}"#).unwrap();
        assert_eq!(msg, InboundMessage::Screenshot("img==".to_string()));
    }

    #[test]
    fn test_decode_invalid_json_is_malformed() {
        let result = decode_frame("{not json");
        assert!(matches!(result, Err(ProtocolError::MalformedFrame(_))));
    }

    #[test]
    fn test_decode_unknown_type_is_malformed() {
        let result = decode_frame(r#"{"type":"mystery","payload":1}"#);
        assert!(matches!(result, Err(ProtocolError::MalformedFrame(_))));
    }

    #[test]
    fn test_decode_empty_frame_is_malformed() {
        let result = decode_frame("");
        assert!(matches!(result, Err(ProtocolError::MalformedFrame(_))));
    }

    #[test]
    fn test_malformed_error_message_mentions_cause() {
        let err = decode_frame(r#"{"type":"screenshot"}"#).unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("malformed frame:"), "got: {text}");
    }
}
