//! ChannelManager: connection lifecycle and the typed event streams.
//!
//! The manager turns one unreliable duplex frame pipe into:
//!
//! - a **status stream**: hot broadcast of `bool` connected-ness, one event
//!   per edge (never two identical values in a row), late subscribers see
//!   only future transitions;
//! - a **message stream**: hot broadcast of parsed [`InboundMessage`]s, one
//!   per well-formed frame, FIFO within a connection; a malformed frame is
//!   logged and skipped, never fatal;
//! - a `send` operation that silently (but audibly, via `warn!`) refuses to
//!   write unless the connection is Open.
//!
//! # State machine
//!
//! ```text
//!                connect()                 open ok
//! Disconnected ────────────▶ Connecting ────────────▶ Open
//!      ▲                        │  open failed          │
//!      │◀───────────────────────┘                       │ disconnect() /
//!      │                                                │ remote close /
//!      │                Closing ◀───────────────────────┘ transport error
//!      └───────────────────────┘
//! ```
//!
//! Exactly one physical link exists at a time; `connect` while Open or
//! Connecting is a logged no-op. Transport-level failures are state
//! transitions plus a log line, never errors returned to the caller.
//!
//! # Concurrency model
//!
//! All lifecycle operations serialize on one async mutex around the
//! connection state, so handlers never interleave mid-transition. Each open
//! link gets a spawned receive loop stamped with a generation number; a loop
//! whose generation is stale (its link was replaced or deliberately closed)
//! can neither flip state nor publish events. Frames already queued by a
//! torn-down link are discarded the same way: delivery is at-most-once.

use std::sync::{Arc, Mutex};

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};

use screenlink_core::{decode_frame, encode_command, InboundMessage, OutboundCommand};

use crate::infrastructure::transport::{FrameSink, Transport, TransportEvent};

/// Capacity of the status broadcast. Edges are rare; a small buffer is plenty.
pub const STATUS_CHANNEL_CAPACITY: usize = 16;

/// Capacity of the message broadcast. Screenshot frames arrive continuously,
/// so this buffers a short consumer stall before lagging.
pub const MESSAGE_CHANNEL_CAPACITY: usize = 64;

/// Connection lifecycle states. Owned exclusively by [`ChannelManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Open,
    Closing,
}

/// Mutable connection state behind the lifecycle mutex.
struct ConnState {
    state: ConnectionState,
    sink: Option<Box<dyn FrameSink>>,
    /// Bumped on every connect and disconnect; stamps receive loops so a
    /// stale one is inert.
    generation: u64,
    /// Set by `shutdown`; refuses any further connect.
    shut_down: bool,
}

/// The broadcast side. Kept behind a std mutex (never held across an await)
/// and separate from `ConnState` so subscribing stays synchronous.
struct EventBus {
    status_tx: Option<broadcast::Sender<bool>>,
    message_tx: Option<broadcast::Sender<InboundMessage>>,
    /// Edge-deduplication latch for the status stream.
    last_status: Option<bool>,
}

impl EventBus {
    /// Publishes a status edge, swallowing repeats of the same value.
    fn publish_status(&mut self, connected: bool) {
        if self.last_status == Some(connected) {
            return;
        }
        self.last_status = Some(connected);
        if let Some(tx) = &self.status_tx {
            // A send error just means nobody is subscribed right now.
            let _ = tx.send(connected);
        }
    }

    fn publish_message(&self, message: InboundMessage) {
        if let Some(tx) = &self.message_tx {
            let _ = tx.send(message);
        }
    }
}

/// Owns the single physical connection and the event streams around it.
pub struct ChannelManager {
    transport: Arc<dyn Transport>,
    conn: Arc<tokio::sync::Mutex<ConnState>>,
    bus: Arc<Mutex<EventBus>>,
}

impl ChannelManager {
    /// Creates a manager around a transport. No connection is opened yet.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let (status_tx, _) = broadcast::channel(STATUS_CHANNEL_CAPACITY);
        let (message_tx, _) = broadcast::channel(MESSAGE_CHANNEL_CAPACITY);
        Self {
            transport,
            conn: Arc::new(tokio::sync::Mutex::new(ConnState {
                state: ConnectionState::Disconnected,
                sink: None,
                generation: 0,
                shut_down: false,
            })),
            bus: Arc::new(Mutex::new(EventBus {
                status_tx: Some(status_tx),
                message_tx: Some(message_tx),
                last_status: None,
            })),
        }
    }

    /// Subscribes to connected-ness edges. Hot: only transitions after this
    /// call are delivered. After `shutdown` the receiver is already closed.
    pub fn subscribe_status(&self) -> broadcast::Receiver<bool> {
        let bus = self.bus.lock().unwrap();
        match &bus.status_tx {
            Some(tx) => tx.subscribe(),
            None => closed_receiver(),
        }
    }

    /// Subscribes to parsed inbound messages. Same hotness rules as
    /// [`Self::subscribe_status`].
    pub fn subscribe_messages(&self) -> broadcast::Receiver<InboundMessage> {
        let bus = self.bus.lock().unwrap();
        match &bus.message_tx {
            Some(tx) => tx.subscribe(),
            None => closed_receiver(),
        }
    }

    /// Current lifecycle state, mainly for diagnostics and tests.
    pub async fn connection_state(&self) -> ConnectionState {
        self.conn.lock().await.state
    }

    /// Opens the channel. Idempotent: a no-op while Open or Connecting, and
    /// refused after `shutdown`. A failed open logs a warning and leaves the
    /// manager Disconnected; it is never an error to the caller.
    pub async fn connect(&self, endpoint: &str) {
        let mut conn = self.conn.lock().await;
        if conn.shut_down {
            warn!("connect ignored: channel manager is shut down");
            return;
        }
        match conn.state {
            ConnectionState::Open | ConnectionState::Connecting => {
                debug!(state = ?conn.state, "connect ignored: channel already live");
                return;
            }
            ConnectionState::Disconnected | ConnectionState::Closing => {}
        }
        conn.state = ConnectionState::Connecting;

        // The lifecycle mutex stays held across the open so a concurrent
        // connect/disconnect cannot interleave and create a second link.
        match self.transport.open(endpoint).await {
            Ok(link) => {
                conn.generation += 1;
                let generation = conn.generation;
                conn.sink = Some(link.sink);
                conn.state = ConnectionState::Open;
                self.bus.lock().unwrap().publish_status(true);
                info!(endpoint, "channel open");

                tokio::spawn(run_receive_loop(
                    link.events,
                    Arc::clone(&self.conn),
                    Arc::clone(&self.bus),
                    generation,
                ));
            }
            Err(e) => {
                conn.state = ConnectionState::Disconnected;
                // No status edge: the stream never saw a `true` for this attempt.
                warn!("connect to {endpoint} failed: {e:#}");
            }
        }
    }

    /// Closes the channel. Idempotent when already Disconnected.
    pub async fn disconnect(&self) {
        let mut conn = self.conn.lock().await;
        if conn.state == ConnectionState::Disconnected {
            debug!("disconnect ignored: already disconnected");
            return;
        }
        conn.state = ConnectionState::Closing;
        // Invalidate the live receive loop before tearing the link down, so
        // whatever it still has queued is discarded rather than delivered.
        conn.generation += 1;
        if let Some(mut sink) = conn.sink.take() {
            sink.close().await;
        }
        conn.state = ConnectionState::Disconnected;
        self.bus.lock().unwrap().publish_status(false);
        info!("channel disconnected");
    }

    /// Sends one command, serializing it exactly once.
    ///
    /// When the connection is not Open this is a no-op surfaced only as a
    /// warning; nothing is written and nothing is thrown. A failed write is
    /// also only logged: the receive loop observes the dead link and owns
    /// the resulting state transition.
    pub async fn send(&self, command: &OutboundCommand) {
        let mut conn = self.conn.lock().await;
        if conn.state != ConnectionState::Open {
            warn!(
                command = command.wire_type(),
                state = ?conn.state,
                "send dropped: channel is not open"
            );
            return;
        }
        let frame = match encode_command(command) {
            Ok(frame) => frame,
            Err(e) => {
                error!("cannot encode {} command: {e}", command.wire_type());
                return;
            }
        };
        let Some(sink) = conn.sink.as_mut() else {
            warn!("send dropped: no live sink despite Open state");
            return;
        };
        match sink.send(&frame).await {
            Ok(()) => debug!(command = command.wire_type(), "command sent"),
            Err(e) => warn!("write of {} failed: {e:#}", command.wire_type()),
        }
    }

    /// Tears the manager down for good: disconnects, then closes both
    /// broadcast streams so no further event can ever be emitted. Subsequent
    /// `connect` calls are refused.
    pub async fn shutdown(&self) {
        self.disconnect().await;
        {
            let mut conn = self.conn.lock().await;
            conn.shut_down = true;
        }
        let mut bus = self.bus.lock().unwrap();
        bus.status_tx = None;
        bus.message_tx = None;
        info!("channel manager shut down");
    }
}

/// Returns a receiver whose channel is already closed, for subscriptions
/// arriving after `shutdown`.
fn closed_receiver<T: Clone>() -> broadcast::Receiver<T> {
    let (tx, rx) = broadcast::channel(1);
    drop(tx);
    rx
}

/// Per-link receive loop. Decodes frames into the message stream and turns
/// remote close / transport errors into the Disconnected transition, unless
/// this loop's generation has been superseded.
async fn run_receive_loop(
    mut events: mpsc::Receiver<TransportEvent>,
    conn: Arc<tokio::sync::Mutex<ConnState>>,
    bus: Arc<Mutex<EventBus>>,
    generation: u64,
) {
    while let Some(event) = events.recv().await {
        match event {
            TransportEvent::Frame(text) => {
                // Frames left over from a replaced link are discarded.
                if conn.lock().await.generation != generation {
                    debug!("discarding frame from a superseded link");
                    break;
                }
                match decode_frame(&text) {
                    Ok(message) => {
                        debug!(kind = message.wire_type(), "frame received");
                        bus.lock().unwrap().publish_message(message);
                    }
                    Err(e) => {
                        // One bad frame never stops the stream.
                        warn!("dropping malformed frame: {e}");
                    }
                }
            }
            TransportEvent::Closed => {
                handle_link_down(&conn, &bus, generation, "closed by remote").await;
                return;
            }
            TransportEvent::Errored(reason) => {
                handle_link_down(&conn, &bus, generation, &reason).await;
                return;
            }
        }
    }
    // The event stream ended without a terminal event; treat it the same.
    handle_link_down(&conn, &bus, generation, "transport stream ended").await;
}

/// Applies the Open→Disconnected transition for a dead link, if this loop is
/// still the current one.
async fn handle_link_down(
    conn: &Arc<tokio::sync::Mutex<ConnState>>,
    bus: &Arc<Mutex<EventBus>>,
    generation: u64,
    reason: &str,
) {
    let mut guard = conn.lock().await;
    if guard.generation != generation {
        // A disconnect or reconnect already dealt with this link.
        return;
    }
    if matches!(guard.state, ConnectionState::Open | ConnectionState::Connecting) {
        guard.state = ConnectionState::Disconnected;
        guard.sink = None;
        warn!("channel lost: {reason}");
        bus.lock().unwrap().publish_status(false);
    }
}
