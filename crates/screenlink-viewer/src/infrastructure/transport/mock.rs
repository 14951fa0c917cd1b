//! Mock transport for unit and integration testing.
//!
//! # Why a mock transport?
//!
//! The real [`WsTransport`](super::ws::WsTransport) needs a listening
//! WebSocket server, a TCP handshake, and real sockets, none of which belong
//! in a unit test. `MockTransport` replaces all of that with in-memory
//! recording: every frame written through the sink is pushed into a shared
//! `Vec`, and the test injects inbound frames, remote closes, and transport
//! errors at will.
//!
//! # Usage in tests
//!
//! ```ignore
//! let transport = Arc::new(MockTransport::new());
//! let manager = ChannelManager::new(Arc::clone(&transport) as Arc<dyn Transport>);
//!
//! manager.connect("mock://device").await;
//! transport.push_frame(r#"{"type":"screenshot","payload":"x"}"#).await;
//!
//! assert_eq!(transport.open_count(), 1);
//! ```
//!
//! # `refuse_next_open` flag
//!
//! Arm it to make the next `open` fail with a connection-refused error, so
//! callers' failed-connect paths can be tested without a broken network.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::infrastructure::transport::{
    FrameSink, Transport, TransportEvent, TransportLink, EVENT_CHANNEL_CAPACITY,
};

#[derive(Default)]
struct MockShared {
    /// Every frame written through any sink, in write order.
    sent: Vec<String>,
    /// Number of successful and refused `open` calls.
    open_count: usize,
    /// When `true`, the next `open` fails once and the flag clears.
    refuse_next_open: bool,
    /// When `true`, every sink write returns an error.
    fail_sends: bool,
    /// Number of times a sink was closed by the owner.
    closed_sinks: usize,
    /// Event injector for the most recently opened link.
    event_tx: Option<mpsc::Sender<TransportEvent>>,
}

/// A transport that records all traffic without any real I/O.
#[derive(Default)]
pub struct MockTransport {
    shared: Arc<Mutex<MockShared>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames written through the sink so far, in order.
    pub fn sent_frames(&self) -> Vec<String> {
        self.shared.lock().unwrap().sent.clone()
    }

    /// How many times `open` was called (successful or refused).
    pub fn open_count(&self) -> usize {
        self.shared.lock().unwrap().open_count
    }

    /// How many times a sink was closed by its owner.
    pub fn closed_sink_count(&self) -> usize {
        self.shared.lock().unwrap().closed_sinks
    }

    /// Makes the next `open` call fail with a connection-refused error.
    pub fn refuse_next_open(&self) {
        self.shared.lock().unwrap().refuse_next_open = true;
    }

    /// Makes every subsequent sink write fail.
    pub fn fail_sends(&self, fail: bool) {
        self.shared.lock().unwrap().fail_sends = fail;
    }

    /// Injects one inbound frame on the current link.
    pub async fn push_frame(&self, frame: &str) {
        self.emit(TransportEvent::Frame(frame.to_string())).await;
    }

    /// Simulates the remote side closing the current link.
    pub async fn close_remote(&self) {
        self.emit(TransportEvent::Closed).await;
    }

    /// Simulates a transport-level failure on the current link.
    pub async fn fail_remote(&self, reason: &str) {
        self.emit(TransportEvent::Errored(reason.to_string())).await;
    }

    async fn emit(&self, event: TransportEvent) {
        // Clone the sender out of the lock; the await must not hold it.
        let tx = self.shared.lock().unwrap().event_tx.clone();
        match tx {
            Some(tx) => {
                let _ = tx.send(event).await;
            }
            None => panic!("no link is open on this MockTransport"),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn open(&self, _endpoint: &str) -> anyhow::Result<TransportLink> {
        let mut shared = self.shared.lock().unwrap();
        shared.open_count += 1;
        if shared.refuse_next_open {
            shared.refuse_next_open = false;
            anyhow::bail!("connection refused (mock)");
        }
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        shared.event_tx = Some(event_tx);
        Ok(TransportLink {
            sink: Box::new(MockSink {
                shared: Arc::clone(&self.shared),
            }),
            events: event_rx,
        })
    }
}

struct MockSink {
    shared: Arc<Mutex<MockShared>>,
}

#[async_trait]
impl FrameSink for MockSink {
    async fn send(&mut self, frame: &str) -> anyhow::Result<()> {
        let mut shared = self.shared.lock().unwrap();
        if shared.fail_sends {
            anyhow::bail!("write failed (mock)");
        }
        shared.sent.push(frame.to_string());
        Ok(())
    }

    async fn close(&mut self) {
        let mut shared = self.shared.lock().unwrap();
        shared.closed_sinks += 1;
        // Dropping the injector ends the event stream, which is exactly what
        // closing a real socket does to the pump task.
        shared.event_tx = None;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_hands_out_a_recording_sink() {
        let transport = MockTransport::new();
        let mut link = transport.open("mock://x").await.unwrap();
        link.sink.send("frame-1").await.unwrap();
        link.sink.send("frame-2").await.unwrap();
        assert_eq!(transport.sent_frames(), vec!["frame-1", "frame-2"]);
        assert_eq!(transport.open_count(), 1);
    }

    #[tokio::test]
    async fn test_pushed_frames_arrive_on_the_event_stream() {
        let transport = MockTransport::new();
        let mut link = transport.open("mock://x").await.unwrap();
        transport.push_frame("hello").await;
        assert_eq!(
            link.events.recv().await,
            Some(TransportEvent::Frame("hello".to_string()))
        );
    }

    #[tokio::test]
    async fn test_refuse_next_open_fails_once() {
        let transport = MockTransport::new();
        transport.refuse_next_open();
        assert!(transport.open("mock://x").await.is_err());
        assert!(transport.open("mock://x").await.is_ok());
        assert_eq!(transport.open_count(), 2);
    }

    #[tokio::test]
    async fn test_closing_the_sink_ends_the_event_stream() {
        let transport = MockTransport::new();
        let mut link = transport.open("mock://x").await.unwrap();
        link.sink.close().await;
        assert_eq!(link.events.recv().await, None);
        assert_eq!(transport.closed_sink_count(), 1);
    }

    #[tokio::test]
    async fn test_fail_sends_errors_the_write() {
        let transport = MockTransport::new();
        let mut link = transport.open("mock://x").await.unwrap();
        transport.fail_sends(true);
        assert!(link.sink.send("frame").await.is_err());
        assert!(transport.sent_frames().is_empty());
    }
}
