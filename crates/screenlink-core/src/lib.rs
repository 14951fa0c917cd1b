//! # screenlink-core
//!
//! Shared library for ScreenLink containing the wire protocol message types,
//! the JSON frame codec, and the gesture recognition domain (coordinate
//! mapping plus the tap/swipe classifier).
//!
//! This crate is the pure core of the system: it has zero dependencies on
//! sockets, async runtimes, or UI frameworks, which keeps every decision
//! rule unit-testable in isolation.
//!
//! # Architecture overview
//!
//! ScreenLink lets a client watch a periodically updated screen image from a
//! remote-controlled device and send input back to it. The interesting logic
//! lives in two places, both in this crate:
//!
//! - **`protocol`** – What travels over the channel. Every frame is a JSON
//!   object `{"type": ..., "payload": ...}`; outbound frames carry input
//!   commands, inbound frames carry screenshot updates.
//!
//! - **`gesture`** – How raw pointer/touch input becomes commands. A small
//!   state machine classifies each pointer session as a tap, a swipe, or
//!   nothing, and a geometry snapshot maps display-space pixels back into
//!   the remote image's source-space pixels.
//!
//! The `screenlink-viewer` crate owns all I/O: it feeds UI events into the
//! recognizer and moves frames across a WebSocket.

pub mod gesture;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `screenlink_core::GestureRecognizer` instead of the full module path.
pub use gesture::geometry::{DisplayGeometry, DisplayPoint, SourcePoint};
pub use gesture::recognizer::{
    page_scroll, Gesture, GestureRecognizer, GestureThresholds, CLICK_THRESHOLD,
    PAGE_SCROLL_PERCENT, SWIPE_THRESHOLD,
};
pub use protocol::codec::{decode_frame, encode_command, ProtocolError};
pub use protocol::messages::{
    ButtonName, InboundMessage, OutboundCommand, ScrollDirection, ScrollPayload,
};
