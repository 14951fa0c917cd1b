//! ScreenLink viewer entry point.
//!
//! Connects to a remote-controlled device over WebSocket, watches its screen
//! frames arrive, and relays input commands. This binary is the headless
//! composition root: it builds the real WebSocket transport, merges the TOML
//! config file with CLI/environment overrides, and runs the controller until
//! Ctrl+C. Rendering the screenshot and capturing pointer events belong to a
//! UI embedding this crate; here the frames are only logged.
//!
//! # Usage
//!
//! ```text
//! screenlink-viewer [OPTIONS]
//!
//! Options:
//!   --endpoint <URL>          WebSocket endpoint of the device
//!                             [default: from config file, else ws://127.0.0.1:8080/ws]
//!   --scroll-percent <PCT>    Viewport percent per scroll-button press
//!   --click-threshold <PX>    Tap classification threshold in display pixels
//!   --swipe-threshold <PX>    Swipe classification threshold in display pixels
//! ```
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.
//!
//! | Variable                     | Description                           |
//! |------------------------------|---------------------------------------|
//! | `SCREENLINK_ENDPOINT`        | WebSocket endpoint                    |
//! | `SCREENLINK_SCROLL_PERCENT`  | Viewport percent per scroll press     |
//! | `SCREENLINK_CLICK_THRESHOLD` | Tap threshold (display px)            |
//! | `SCREENLINK_SWIPE_THRESHOLD` | Swipe threshold (display px)          |
//!
//! Log verbosity is controlled by `RUST_LOG` (e.g. `RUST_LOG=debug`).

use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use screenlink_viewer::application::ViewerController;
use screenlink_viewer::domain::ViewerConfig;
use screenlink_viewer::infrastructure::storage::load_config;
use screenlink_viewer::infrastructure::WsTransport;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// ScreenLink viewer.
///
/// Observes a remote device's screen over WebSocket and relays clicks,
/// swipes, scrolls, button presses, and URL navigation back to it.
#[derive(Debug, Parser)]
#[command(
    name = "screenlink-viewer",
    about = "Remote screen viewer and input relay for ScreenLink devices",
    version
)]
struct Cli {
    /// WebSocket endpoint of the remote device (e.g. ws://192.168.1.20:8080/ws).
    #[arg(long, env = "SCREENLINK_ENDPOINT")]
    endpoint: Option<String>,

    /// Percent of the remote viewport moved by one scroll-button press.
    #[arg(long, env = "SCREENLINK_SCROLL_PERCENT")]
    scroll_percent: Option<u32>,

    /// Displacement in display pixels below which a touch is a tap.
    #[arg(long, env = "SCREENLINK_CLICK_THRESHOLD")]
    click_threshold: Option<f64>,

    /// Displacement in display pixels above which a touch is a swipe.
    #[arg(long, env = "SCREENLINK_SWIPE_THRESHOLD")]
    swipe_threshold: Option<f64>,
}

impl Cli {
    /// Applies any explicitly given flags on top of `config`.
    fn apply_to(self, config: &mut ViewerConfig) {
        if let Some(endpoint) = self.endpoint {
            config.endpoint = endpoint;
        }
        if let Some(percent) = self.scroll_percent {
            config.scroll_percent = percent;
        }
        if let Some(threshold) = self.click_threshold {
            config.click_threshold = threshold;
        }
        if let Some(threshold) = self.swipe_threshold {
            config.swipe_threshold = threshold;
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `RUST_LOG` controls verbosity; default to `info` when unset or invalid.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Config file first, then CLI/env overrides on top.
    let mut config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            warn!("config file unusable, falling back to defaults: {e}");
            ViewerConfig::default()
        }
    };
    cli.apply_to(&mut config);

    info!(endpoint = %config.endpoint, "ScreenLink viewer starting");

    let controller = ViewerController::new(Arc::new(WsTransport::new()), config);
    controller.start().await;

    // Run until Ctrl+C. Status edges and frame arrivals are logged by the
    // controller's listener tasks in the meantime.
    tokio::signal::ctrl_c().await?;
    info!("received Ctrl+C, shutting down");

    controller.shutdown().await;
    info!("ScreenLink viewer stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
