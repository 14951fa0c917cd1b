//! The gesture session state machine.
//!
//! One [`GestureRecognizer`] tracks at most one pointer session at a time:
//!
//! ```text
//!             touch_start (1 contact)
//!   Idle ───────────────────────────────▶ Tracking
//!    ▲                                       │
//!    │   touch_end: Tap / Swipe / nothing    │ touch_move: update moved flag
//!    └───────────────────────────────────────┘
//! ```
//!
//! Classification at session end:
//!
//! - displacement below [`CLICK_THRESHOLD`] with no excess movement → **Tap**
//! - displacement above [`SWIPE_THRESHOLD`] → **Swipe**
//! - anything in between is ambiguous and produces **no** gesture
//!
//! Any event reporting more than one simultaneous contact destroys the
//! session outright, so multi-touch sequences can never dispatch a command.
//!
//! Direct clicks from a non-touch pointer device have no move phase to
//! disambiguate and bypass the session machine entirely ([`GestureRecognizer::click`]).

use tracing::{debug, trace};

use crate::gesture::geometry::{DisplayGeometry, DisplayPoint, SourcePoint};
use crate::protocol::messages::{OutboundCommand, ScrollDirection, ScrollPayload};

/// Displacement in display pixels below which a gesture is still a click.
pub const CLICK_THRESHOLD: f64 = 10.0;

/// Displacement in display pixels above which a gesture becomes a swipe.
pub const SWIPE_THRESHOLD: f64 = 30.0;

/// Percent of the remote viewport that a discrete scroll button moves.
pub const PAGE_SCROLL_PERCENT: u32 = 90;

/// Classification thresholds, overridable from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureThresholds {
    /// Below this total displacement a session can still be a tap.
    pub click: f64,
    /// Above this total displacement a session becomes a swipe.
    pub swipe: f64,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            click: CLICK_THRESHOLD,
            swipe: SWIPE_THRESHOLD,
        }
    }
}

/// A recognized gesture with all coordinates already mapped to source space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    /// A stationary press-and-release, interpreted as a click at the
    /// release point.
    Tap { at: SourcePoint },

    /// A directional drag with start, end, and elapsed duration.
    Swipe {
        start: SourcePoint,
        end: SourcePoint,
        duration_ms: u64,
    },
}

impl Gesture {
    /// Converts the gesture into the outbound command it stands for.
    pub fn into_command(self) -> OutboundCommand {
        match self {
            Gesture::Tap { at } => OutboundCommand::ClickAt { x: at.x, y: at.y },
            Gesture::Swipe {
                start,
                end,
                duration_ms,
            } => OutboundCommand::Scroll(ScrollPayload::Drag {
                start_x: start.x,
                start_y: start.y,
                end_x: end.x,
                end_y: end.y,
                duration: duration_ms,
            }),
        }
    }
}

/// Builds the command for a discrete scroll-button press.
///
/// Distinct from swipe-derived scrolling: the magnitude is a fixed fraction
/// of the remote viewport, not a pixel path.
pub fn page_scroll(direction: ScrollDirection, percent: u32) -> OutboundCommand {
    OutboundCommand::Scroll(ScrollPayload::Page { direction, percent })
}

/// Ephemeral per-gesture state. Exists only between touch-start and
/// touch-end, and is destroyed when the sequence ends regardless of how it
/// was classified.
#[derive(Debug, Clone, Copy)]
struct GestureSession {
    start: DisplayPoint,
    started_at_ms: u64,
    moved: bool,
}

/// Classifies single-pointer sessions as taps, swipes, or nothing.
#[derive(Debug, Default)]
pub struct GestureRecognizer {
    thresholds: GestureThresholds,
    session: Option<GestureSession>,
}

impl GestureRecognizer {
    /// Creates a recognizer with the default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recognizer with custom thresholds.
    pub fn with_thresholds(thresholds: GestureThresholds) -> Self {
        Self {
            thresholds,
            session: None,
        }
    }

    /// Returns `true` while a pointer session is being tracked.
    pub fn is_tracking(&self) -> bool {
        self.session.is_some()
    }

    /// Pointer-down / touch-start.
    ///
    /// Starts a session only for exactly one contact; a second simultaneous
    /// contact cancels whatever was in flight.
    pub fn touch_start(&mut self, contacts: usize, at: DisplayPoint, at_ms: u64) {
        if contacts != 1 {
            trace!(contacts, "multi-touch start ignored");
            self.session = None;
            return;
        }
        self.session = Some(GestureSession {
            start: at,
            started_at_ms: at_ms,
            moved: false,
        });
    }

    /// Pointer-move / touch-move.
    ///
    /// Returns `true` when the surrounding UI layer must suppress native
    /// default handling (scrolling, selection) for the rest of the session,
    /// which happens once displacement exceeds the click threshold along
    /// either axis.
    pub fn touch_move(&mut self, contacts: usize, at: DisplayPoint) -> bool {
        if contacts != 1 {
            trace!(contacts, "multi-touch move cancels session");
            self.session = None;
            return false;
        }
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let dx = (at.x - session.start.x).abs();
        let dy = (at.y - session.start.y).abs();
        if dx > self.thresholds.click || dy > self.thresholds.click {
            session.moved = true;
        }
        session.moved
    }

    /// Pointer-up / touch-end: ends the session and classifies it.
    ///
    /// Returns the recognized gesture, or `None` when the displacement falls
    /// in the ambiguous band between the two thresholds, when the geometry
    /// snapshot is degenerate, or when no session was being tracked. The
    /// session is destroyed in every case.
    pub fn touch_end(
        &mut self,
        contacts: usize,
        at: DisplayPoint,
        at_ms: u64,
        geometry: &DisplayGeometry,
    ) -> Option<Gesture> {
        if contacts != 1 {
            trace!(contacts, "multi-touch end cancels session");
            self.session = None;
            return None;
        }
        let session = self.session.take()?;

        if !geometry.is_displayable() {
            debug!("gesture suppressed: image has a zero display dimension");
            return None;
        }

        let distance = session.start.distance_to(at);
        if !session.moved && distance < self.thresholds.click {
            let at = geometry.map_to_source(at)?;
            trace!(x = at.x, y = at.y, "classified tap");
            Some(Gesture::Tap { at })
        } else if distance > self.thresholds.swipe {
            let start = geometry.map_to_source(session.start)?;
            let end = geometry.map_to_source(at)?;
            let duration_ms = at_ms.saturating_sub(session.started_at_ms);
            trace!(duration_ms, "classified swipe");
            Some(Gesture::Swipe {
                start,
                end,
                duration_ms,
            })
        } else {
            trace!(distance, "ambiguous gesture dropped");
            None
        }
    }

    /// Direct click from a non-touch pointer device.
    ///
    /// Maps the point immediately and returns a tap; no threshold logic
    /// applies because there is no move phase. Returns `None` only for
    /// degenerate geometry.
    pub fn click(&self, at: DisplayPoint, geometry: &DisplayGeometry) -> Option<Gesture> {
        let at = geometry.map_to_source(at)?;
        Some(Gesture::Tap { at })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
