//! screenlink-viewer library crate.
//!
//! This crate is the client application around `screenlink-core`: it owns the
//! WebSocket channel to the remote device, feeds UI input events through the
//! gesture recognizer, and relays the resulting commands.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! UI layer (pointer/touch events, rendered screenshot)
//!         ↕
//! [screenlink-viewer]
//!   ├── domain/           Pure types: ViewerConfig
//!   ├── application/      ViewerController: lifecycle + gesture wiring
//!   └── infrastructure/
//!         ├── channel/    ChannelManager: connection state + event streams
//!         ├── transport/  Transport trait, WebSocket + mock implementations
//!         └── storage/    TOML config persistence
//!         ↕
//! Remote device ({"type", "payload"} JSON frames over WebSocket)
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain` and `screenlink-core` only, plus the
//!   channel manager it drives.
//! - `infrastructure` depends on everything else plus `tokio` and
//!   `tungstenite`.
//!
//! The split keeps the decision logic (what a pointer sequence means, what
//! may be sent when) testable against the in-memory mock transport, with the
//! real WebSocket swapped in only at the binary's composition root.

/// Domain layer: pure configuration types (no I/O).
pub mod domain;

/// Application layer: the viewer controller.
pub mod application;

/// Infrastructure layer: channel manager, transports, config storage.
pub mod infrastructure;
