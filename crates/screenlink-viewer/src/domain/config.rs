//! Viewer configuration types.
//!
//! [`ViewerConfig`] is the single source of truth for runtime settings. It
//! can be populated from the TOML config file, CLI arguments, or defaults;
//! the domain layer itself never reads the environment or the file system,
//! which keeps the controller easy to embed in tests.

use serde::{Deserialize, Serialize};

/// All runtime configuration for the viewer.
///
/// Serde defaults let a partial config file (or an older one missing newer
/// fields) load cleanly, the same way first-run works with no file at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// WebSocket endpoint of the remote device, e.g. `ws://192.168.1.20:8080/ws`.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Displacement in display pixels below which a touch session can still
    /// classify as a tap.
    #[serde(default = "default_click_threshold")]
    pub click_threshold: f64,

    /// Displacement in display pixels above which a touch session classifies
    /// as a swipe.
    #[serde(default = "default_swipe_threshold")]
    pub swipe_threshold: f64,

    /// Percent of the remote viewport moved by one scroll-button press.
    #[serde(default = "default_scroll_percent")]
    pub scroll_percent: u32,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_endpoint() -> String {
    // The remote device binds 0.0.0.0:8080 and serves the channel on /ws;
    // localhost is the single-host development setup.
    "ws://127.0.0.1:8080/ws".to_string()
}
fn default_click_threshold() -> f64 {
    screenlink_core::CLICK_THRESHOLD
}
fn default_swipe_threshold() -> f64 {
    screenlink_core::SWIPE_THRESHOLD
}
fn default_scroll_percent() -> u32 {
    screenlink_core::PAGE_SCROLL_PERCENT
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            click_threshold: default_click_threshold(),
            swipe_threshold: default_swipe_threshold(),
            scroll_percent: default_scroll_percent(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint_is_local_ws() {
        let cfg = ViewerConfig::default();
        assert_eq!(cfg.endpoint, "ws://127.0.0.1:8080/ws");
    }

    #[test]
    fn test_default_thresholds_match_core_constants() {
        let cfg = ViewerConfig::default();
        assert_eq!(cfg.click_threshold, 10.0);
        assert_eq!(cfg.swipe_threshold, 30.0);
    }

    #[test]
    fn test_default_scroll_percent_is_90() {
        let cfg = ViewerConfig::default();
        assert_eq!(cfg.scroll_percent, 90);
    }

    #[test]
    fn test_config_can_be_cloned() {
        // Cloneability is required so the controller can keep its own copy
        // while the binary keeps another for logging.
        let cfg = ViewerConfig::default();
        assert_eq!(cfg, cfg.clone());
    }

    #[test]
    fn test_partial_toml_fills_in_defaults() {
        // Only the endpoint is present; everything else must default.
        let cfg: ViewerConfig = toml::from_str(r#"endpoint = "ws://10.0.0.5:8080/ws""#).unwrap();
        assert_eq!(cfg.endpoint, "ws://10.0.0.5:8080/ws");
        assert_eq!(cfg.scroll_percent, 90);
        assert_eq!(cfg.click_threshold, 10.0);
    }

    #[test]
    fn test_empty_toml_yields_defaults() {
        let cfg: ViewerConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, ViewerConfig::default());
    }
}
