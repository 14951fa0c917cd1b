//! All ScreenLink wire message types.
//!
//! Messages follow the JSON envelope `{"type": <tag>, "payload": <data>}`.
//! Serde's adjacently tagged representation (`tag = "type"`,
//! `content = "payload"`) produces this shape directly from the enums below.
//!
//! # Why separate outbound and inbound message types?
//!
//! The two directions carry different information:
//!
//! - The client *sends* input commands (open a URL, click, scroll, ...).
//! - The device *sends* screen updates.
//!
//! Using two distinct enums makes it a compile-time error to accidentally
//! treat a screenshot as a command, and lets each direction be exhaustively
//! matched. A frame whose `"type"` is not part of the expected enum fails
//! deserialization instead of flowing through untyped.

use serde::{Deserialize, Serialize};

// ── Field enums ───────────────────────────────────────────────────────────────

/// Hardware-style buttons the client can press on the remote device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonName {
    VolumeUp,
    VolumeDown,
    ExitFullscreen,
}

/// Direction for a button-driven page scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    Down,
}

// ── Scroll payload shapes ─────────────────────────────────────────────────────

/// The two payload shapes a `scroll` frame can carry.
///
/// Button-driven scrolls express intent as a fraction of the remote viewport
/// (`Page`); swipe-driven scrolls replay the finger's path (`Drag`). Both
/// shapes live under the same `"scroll"` wire type, so the enum is untagged
/// and the receiver distinguishes them by their fields:
///
/// ```json
/// {"direction":"down","percent":90}
/// {"startX":100,"startY":1000,"endX":100,"endY":200,"duration":120}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScrollPayload {
    /// Discrete scroll by a percentage of the remote viewport height.
    Page {
        direction: ScrollDirection,
        /// Percent of the viewport to scroll, typically 90.
        percent: u32,
    },

    /// Swipe-derived drag with both endpoints in source-space pixels.
    #[serde(rename_all = "camelCase")]
    Drag {
        start_x: i32,
        start_y: i32,
        end_x: i32,
        end_y: i32,
        /// Elapsed time of the gesture in milliseconds.
        duration: u64,
    },
}

// ── Outbound commands ─────────────────────────────────────────────────────────

/// All commands the client can send to the remote device.
///
/// Immutable once constructed; serialized to the wire envelope exactly once,
/// at send time, by [`crate::protocol::codec::encode_command`].
///
/// # Serde representation
///
/// ```json
/// {"type":"open_url","payload":"https://example.com/"}
/// {"type":"send_button","payload":"volume_up"}
/// {"type":"click_at","payload":{"x":200,"y":100}}
/// {"type":"scroll","payload":{"direction":"down","percent":90}}
/// {"type":"type_enter","payload":"search text"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum OutboundCommand {
    /// Navigate the remote device to a URL.
    OpenUrl(String),

    /// Press a hardware-style button on the remote device.
    SendButton(ButtonName),

    /// Click at a position, in source-space pixels of the remote screen.
    ClickAt { x: i32, y: i32 },

    /// Scroll the remote page, either by viewport percentage or by replaying
    /// a drag. See [`ScrollPayload`].
    Scroll(ScrollPayload),

    /// Type a line of text on the remote device and submit it with Enter.
    TypeEnter(String),
}

impl OutboundCommand {
    /// Returns the wire `"type"` tag for this command.
    ///
    /// Used in log messages so payload values (URLs, typed text) are never
    /// logged accidentally.
    pub fn wire_type(&self) -> &'static str {
        match self {
            OutboundCommand::OpenUrl(_) => "open_url",
            OutboundCommand::SendButton(_) => "send_button",
            OutboundCommand::ClickAt { .. } => "click_at",
            OutboundCommand::Scroll(_) => "scroll",
            OutboundCommand::TypeEnter(_) => "type_enter",
        }
    }
}

// ── Inbound messages ──────────────────────────────────────────────────────────

/// All messages the remote device can send to the client.
///
/// Each value is produced by parsing exactly one wire frame. Frames whose
/// `"type"` is unknown fail to parse and are dropped by the channel layer;
/// they never terminate the message stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum InboundMessage {
    /// A fresh capture of the remote screen. The payload is an opaque
    /// base64-encoded image; this crate never decodes it.
    Screenshot(String),
}

impl InboundMessage {
    /// Returns the wire `"type"` tag for this message.
    pub fn wire_type(&self) -> &'static str {
        match self {
            InboundMessage::Screenshot(_) => "screenshot",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
