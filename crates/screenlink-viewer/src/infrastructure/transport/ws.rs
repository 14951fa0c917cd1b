//! WebSocket transport implementation.
//!
//! Wraps `tokio-tungstenite` behind the [`Transport`] trait. After the
//! client handshake succeeds the stream is split: the write half becomes the
//! [`FrameSink`], the read half is drained by a pump task that translates
//! WebSocket messages into [`TransportEvent`]s on an mpsc channel.
//!
//! Protocol-level ping/pong is handled by tungstenite itself when the sink
//! is written to; the pump only logs them.

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use anyhow::Context;

use crate::infrastructure::transport::{
    FrameSink, Transport, TransportEvent, TransportLink, EVENT_CHANNEL_CAPACITY,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// The production transport: one WebSocket client connection per `open`.
#[derive(Debug, Default)]
pub struct WsTransport;

impl WsTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn open(&self, endpoint: &str) -> anyhow::Result<TransportLink> {
        // `connect_async` performs the TCP connect plus the HTTP Upgrade
        // handshake; the response is not interesting beyond success.
        let (ws_stream, _response) = connect_async(endpoint)
            .await
            .with_context(|| format!("WebSocket handshake with {endpoint} failed"))?;

        debug!(endpoint, "WebSocket link established");

        let (ws_tx, ws_rx) = ws_stream.split();
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        // The pump owns the read half for the lifetime of the link.
        tokio::spawn(pump_events(ws_rx, event_tx));

        Ok(TransportLink {
            sink: Box::new(WsFrameSink { inner: ws_tx }),
            events: event_rx,
        })
    }
}

/// Reads WebSocket messages until the link dies and forwards them as
/// [`TransportEvent`]s. Sends exactly one terminal `Closed`/`Errored` event.
async fn pump_events(mut ws_rx: SplitStream<WsStream>, event_tx: mpsc::Sender<TransportEvent>) {
    loop {
        match ws_rx.next().await {
            Some(Ok(WsMessage::Text(text))) => {
                if event_tx
                    .send(TransportEvent::Frame(text.to_string()))
                    .await
                    .is_err()
                {
                    // Receiver dropped: the owner is gone, stop pumping.
                    break;
                }
            }
            Some(Ok(WsMessage::Binary(_))) => {
                // The channel protocol is JSON text only.
                warn!("unexpected binary WebSocket frame (ignored)");
            }
            Some(Ok(WsMessage::Ping(_) | WsMessage::Pong(_))) => {
                debug!("WebSocket keepalive frame");
            }
            Some(Ok(WsMessage::Close(_))) => {
                debug!("WebSocket Close frame received");
                let _ = event_tx.send(TransportEvent::Closed).await;
                break;
            }
            Some(Ok(WsMessage::Frame(_))) => {
                debug!("raw WebSocket frame (ignored)");
            }
            Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) => {
                let _ = event_tx.send(TransportEvent::Closed).await;
                break;
            }
            Some(Err(e)) => {
                let _ = event_tx.send(TransportEvent::Errored(e.to_string())).await;
                break;
            }
            None => {
                // Stream ended without a Close frame; abrupt, but not an error.
                let _ = event_tx.send(TransportEvent::Closed).await;
                break;
            }
        }
    }
}

/// Write half of a WebSocket link.
struct WsFrameSink {
    inner: SplitSink<WsStream, WsMessage>,
}

#[async_trait]
impl FrameSink for WsFrameSink {
    async fn send(&mut self, frame: &str) -> anyhow::Result<()> {
        self.inner
            .send(WsMessage::Text(frame.to_string().into()))
            .await
            .context("WebSocket write failed")
    }

    async fn close(&mut self) {
        // Politely send a Close frame, then close the sink. Either step can
        // fail when the peer is already gone; that is fine.
        if let Err(e) = self.inner.send(WsMessage::Close(None)).await {
            debug!("Close frame not delivered: {e}");
        }
        if let Err(e) = self.inner.close().await {
            debug!("WebSocket sink close failed: {e}");
        }
    }
}
