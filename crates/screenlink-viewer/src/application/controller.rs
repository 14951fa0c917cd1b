//! ViewerController: wires the gesture recognizer to the channel manager.
//!
//! The controller is what the UI layer talks to. It owns:
//!
//! - the [`ChannelManager`] and its subscriptions,
//! - one [`GestureRecognizer`] fed by the raw pointer/touch callbacks,
//! - the [`ViewerState`] snapshot the UI renders from (connected flag plus
//!   the most recent screenshot payload).
//!
//! # Lifecycle
//!
//! `start()` subscribes to both event streams *before* connecting, so the
//! first status edge is never missed, then opens the channel. `stop()`
//! tears the listeners down and disconnects before returning; `shutdown()`
//! additionally closes the manager's streams for good.
//!
//! # Gesture guard
//!
//! Input only makes sense against a picture of the remote screen, so every
//! gesture entry point is ignored until the channel is connected and at
//! least one screenshot has arrived. Disconnecting clears the screenshot:
//! a stale image must not keep absorbing clicks.

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use screenlink_core::{
    page_scroll, ButtonName, DisplayGeometry, DisplayPoint, GestureRecognizer, GestureThresholds,
    InboundMessage, OutboundCommand, ScrollDirection,
};

use crate::domain::ViewerConfig;
use crate::infrastructure::channel::ChannelManager;
use crate::infrastructure::transport::Transport;

/// What the UI needs to render: connection flag and the latest frame.
#[derive(Debug, Default, Clone)]
pub struct ViewerState {
    pub connected: bool,
    /// Base64 payload of the most recent screenshot, opaque to this crate.
    pub latest_screenshot: Option<String>,
}

/// Drives one remote-control session.
pub struct ViewerController {
    config: ViewerConfig,
    channel: Arc<ChannelManager>,
    recognizer: tokio::sync::Mutex<GestureRecognizer>,
    state: Arc<Mutex<ViewerState>>,
    listeners: tokio::sync::Mutex<Vec<JoinHandle<()>>>,
}

impl ViewerController {
    /// Builds a controller over `transport` with the given configuration.
    pub fn new(transport: Arc<dyn Transport>, config: ViewerConfig) -> Self {
        let recognizer = GestureRecognizer::with_thresholds(GestureThresholds {
            click: config.click_threshold,
            swipe: config.swipe_threshold,
        });
        Self {
            channel: Arc::new(ChannelManager::new(transport)),
            recognizer: tokio::sync::Mutex::new(recognizer),
            state: Arc::new(Mutex::new(ViewerState::default())),
            listeners: tokio::sync::Mutex::new(Vec::new()),
            config,
        }
    }

    /// The channel manager, exposed for status subscriptions by the UI.
    pub fn channel(&self) -> Arc<ChannelManager> {
        Arc::clone(&self.channel)
    }

    /// Current connected-ness, from the last observed status edge.
    pub fn is_connected(&self) -> bool {
        self.state.lock().unwrap().connected
    }

    /// The most recent screenshot payload, if any.
    pub fn latest_screenshot(&self) -> Option<String> {
        self.state.lock().unwrap().latest_screenshot.clone()
    }

    /// Subscribes to the channel streams and opens the connection.
    pub async fn start(&self) {
        let mut status_rx = self.channel.subscribe_status();
        let mut message_rx = self.channel.subscribe_messages();

        let state = Arc::clone(&self.state);
        let status_listener = tokio::spawn(async move {
            loop {
                match status_rx.recv().await {
                    Ok(connected) => {
                        info!(connected, "connection status changed");
                        let mut state = state.lock().unwrap();
                        state.connected = connected;
                        if !connected {
                            // The last frame is stale the moment the link dies.
                            state.latest_screenshot = None;
                        }
                    }
                    Err(RecvError::Lagged(missed)) => {
                        warn!(missed, "status stream lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        let state = Arc::clone(&self.state);
        let message_listener = tokio::spawn(async move {
            loop {
                match message_rx.recv().await {
                    Ok(InboundMessage::Screenshot(payload)) => {
                        debug!(bytes = payload.len(), "screenshot frame");
                        state.lock().unwrap().latest_screenshot = Some(payload);
                    }
                    Err(RecvError::Lagged(missed)) => {
                        warn!(missed, "message stream lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        self.listeners
            .lock()
            .await
            .extend([status_listener, message_listener]);

        self.channel.connect(&self.config.endpoint).await;
    }

    /// Unsubscribes all listeners and disconnects, in that order, before
    /// returning. Safe to call more than once.
    pub async fn stop(&self) {
        let mut listeners = self.listeners.lock().await;
        for listener in listeners.drain(..) {
            listener.abort();
            // Await the abort so no listener outlives stop().
            let _ = listener.await;
        }
        drop(listeners);
        self.channel.disconnect().await;
        info!("viewer stopped");
    }

    /// Stops the controller and closes the channel streams for good.
    pub async fn shutdown(&self) {
        self.stop().await;
        self.channel.shutdown().await;
    }

    // ── Touch gesture entry points ────────────────────────────────────────────

    /// Pointer-down / touch-start from the UI layer.
    pub async fn touch_start(&self, contacts: usize, at: DisplayPoint, at_ms: u64) {
        if !self.gestures_enabled() {
            return;
        }
        self.recognizer.lock().await.touch_start(contacts, at, at_ms);
    }

    /// Pointer-move / touch-move. Returns `true` when the UI layer must
    /// suppress the native default (scrolling/selection) for this session.
    pub async fn touch_move(&self, contacts: usize, at: DisplayPoint) -> bool {
        if !self.gestures_enabled() {
            return false;
        }
        self.recognizer.lock().await.touch_move(contacts, at)
    }

    /// Pointer-up / touch-end. `geometry` must be sampled from the
    /// screenshot element at this moment, not cached.
    pub async fn touch_end(
        &self,
        contacts: usize,
        at: DisplayPoint,
        at_ms: u64,
        geometry: DisplayGeometry,
    ) {
        if !self.gestures_enabled() {
            return;
        }
        let gesture = self
            .recognizer
            .lock()
            .await
            .touch_end(contacts, at, at_ms, &geometry);
        if let Some(gesture) = gesture {
            self.channel.send(&gesture.into_command()).await;
        }
    }

    /// Direct click from a non-touch pointer device.
    pub async fn pointer_click(&self, at: DisplayPoint, geometry: DisplayGeometry) {
        if !self.gestures_enabled() {
            return;
        }
        let gesture = self.recognizer.lock().await.click(at, &geometry);
        if let Some(gesture) = gesture {
            self.channel.send(&gesture.into_command()).await;
        }
    }

    // ── Discrete intents ──────────────────────────────────────────────────────

    /// Scroll-button press: fixed percent-of-viewport scroll.
    pub async fn scroll_page(&self, direction: ScrollDirection) {
        self.channel
            .send(&page_scroll(direction, self.config.scroll_percent))
            .await;
    }

    /// Navigates the remote device to `url`.
    pub async fn open_url(&self, url: &str) {
        if url.is_empty() {
            warn!("open_url ignored: empty URL");
            return;
        }
        self.channel
            .send(&OutboundCommand::OpenUrl(url.to_string()))
            .await;
    }

    /// Presses a hardware-style button on the remote device.
    pub async fn press_button(&self, button: ButtonName) {
        self.channel.send(&OutboundCommand::SendButton(button)).await;
    }

    /// Types a line of text on the remote device and submits it with Enter.
    pub async fn type_enter(&self, text: &str) {
        self.channel
            .send(&OutboundCommand::TypeEnter(text.to_string()))
            .await;
    }

    fn gestures_enabled(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.connected && state.latest_screenshot.is_some()
    }
}
