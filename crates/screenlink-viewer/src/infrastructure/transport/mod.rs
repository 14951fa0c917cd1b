//! The transport seam.
//!
//! [`ChannelManager`](crate::infrastructure::channel::ChannelManager) needs
//! exactly one thing from the outside world: a duplex, frame-oriented byte
//! pipe. The [`Transport`] trait captures that contract so the manager can
//! be driven by the real WebSocket implementation in production and by the
//! in-memory [`mock::MockTransport`] in tests, the same way the platform
//! input emulators are swapped behind a trait elsewhere in this workspace.
//!
//! # Contract
//!
//! - `open(endpoint)` resolves once the link is live; a resolved `open` is
//!   the "connection opened" signal.
//! - Everything that happens to the link afterwards (inbound frames, remote
//!   close, transport error) arrives in order on the
//!   [`TransportLink::events`] receiver. After `Closed` or `Errored` no
//!   further events are sent.
//! - [`FrameSink::send`] writes one whole frame; partial frames are the
//!   implementation's problem, never the caller's.

use async_trait::async_trait;
use tokio::sync::mpsc;

pub mod mock;
pub mod ws;

/// Capacity of the per-link event channel between the transport pump task
/// and the channel manager's receive loop.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Everything a live link can report back to its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// One complete inbound text frame.
    Frame(String),

    /// The remote side closed the link, or the stream ended.
    Closed,

    /// The link died from a transport-level error.
    Errored(String),
}

/// The write half of an open link.
#[async_trait]
pub trait FrameSink: Send {
    /// Writes one frame atomically.
    ///
    /// # Errors
    ///
    /// Returns an error when the link is no longer writable. Callers treat
    /// this as diagnostic only; the matching `Closed`/`Errored` event on the
    /// read side drives the actual state transition.
    async fn send(&mut self, frame: &str) -> anyhow::Result<()>;

    /// Closes the link. Best effort; errors are swallowed by the
    /// implementation because there is nothing a caller could do with them.
    async fn close(&mut self);
}

/// An open link: the write half plus the ordered event stream of the read half.
pub struct TransportLink {
    pub sink: Box<dyn FrameSink>,
    pub events: mpsc::Receiver<TransportEvent>,
}

/// Factory for links. One implementation per underlying medium.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Opens a link to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error when the link cannot be established (endpoint
    /// unreachable, handshake refused). The caller logs it and stays
    /// disconnected; connection errors are never fatal.
    async fn open(&self, endpoint: &str) -> anyhow::Result<TransportLink>;
}
