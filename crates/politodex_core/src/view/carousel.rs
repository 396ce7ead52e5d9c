//! Card-track scrolling, navigation buttons and pointer drag handling.
//!
//! # Responsibility
//! - Turn button/key input into scroll instructions.
//! - Derive navigation-button enablement from scroll metrics.
//! - Distinguish pointer drags from taps and suppress the click that
//!   follows a drag.
//!
//! # Invariants
//! - Only one pointer drives the track at a time.
//! - A drag starts once horizontal travel reaches the threshold; the click
//!   that follows it is swallowed exactly once.

/// Scroll distance of the previous/next buttons.
pub const NAV_BUTTON_STEP: f64 = 300.0;
/// Scroll distance of the Left/Right arrow keys.
pub const ARROW_KEY_STEP: f64 = 250.0;
/// Horizontal travel (px) after which a press becomes a drag.
pub const DRAG_THRESHOLD: f64 = 12.0;
/// Tolerance (px) when deciding the track is at its right edge.
pub const EDGE_TOLERANCE: f64 = 1.0;

/// How a scroll instruction should animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// Relative scroll instruction for the card track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollCommand {
    pub delta: f64,
    pub behavior: ScrollBehavior,
}

/// Smooth scroll by `delta` pixels; fire-and-forget.
pub fn scroll_by(delta: f64) -> ScrollCommand {
    ScrollCommand {
        delta,
        behavior: ScrollBehavior::Smooth,
    }
}

/// Scroll geometry reported by the UI runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrackMetrics {
    pub scroll_left: f64,
    pub scroll_width: f64,
    pub client_width: f64,
}

/// Enablement of the previous/next buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavButtonState {
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

/// Disables "previous" at the left edge and "next" at the right edge.
pub fn nav_button_state(metrics: TrackMetrics) -> NavButtonState {
    let max_scroll = metrics.scroll_width - metrics.client_width;
    NavButtonState {
        prev_disabled: metrics.scroll_left <= 0.0,
        next_disabled: metrics.scroll_left >= max_scroll - EDGE_TOLERANCE,
    }
}

/// Pointer device class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

/// Pointer-down event on the track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPress {
    pub pointer_id: i64,
    pub kind: PointerKind,
    /// Mouse button index; 0 is the main button.
    pub button: i16,
    pub is_primary: bool,
    pub client_x: f64,
}

/// Result of a pointer move that counts as dragging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragUpdate {
    /// Absolute scroll offset to apply to the track.
    pub scroll_left: f64,
    /// Pointer to capture, on the first move past the threshold.
    pub capture_pointer: Option<i64>,
}

/// Result of releasing the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerRelease {
    /// Pointer capture to release.
    pub release_pointer: Option<i64>,
    pub was_drag: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActivePress {
    pointer_id: i64,
    start_x: f64,
    scroll_start: f64,
    captured: bool,
}

/// Drag-to-scroll state for one card track.
#[derive(Debug, Clone, PartialEq)]
pub struct DragTracker {
    threshold: f64,
    active: Option<ActivePress>,
    dragged: bool,
    /// Clear `dragged` on the next animation frame.
    reset_pending: bool,
}

impl Default for DragTracker {
    fn default() -> Self {
        Self::with_threshold(DRAG_THRESHOLD)
    }
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker whose presses become drags after `threshold` px of travel.
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            active: None,
            dragged: false,
            reset_pending: false,
        }
    }

    /// Starts tracking a press; returns `false` when the press is ignored
    /// (secondary pointer or non-main mouse button).
    pub fn press(&mut self, press: PointerPress, scroll_left: f64) -> bool {
        if press.kind == PointerKind::Mouse && press.button != 0 {
            return false;
        }
        if !press.is_primary {
            return false;
        }
        self.active = Some(ActivePress {
            pointer_id: press.pointer_id,
            start_x: press.client_x,
            scroll_start: scroll_left,
            captured: false,
        });
        self.dragged = false;
        self.reset_pending = false;
        true
    }

    /// Handles pointer movement; `None` while below the drag threshold.
    pub fn move_to(&mut self, client_x: f64) -> Option<DragUpdate> {
        let active = self.active.as_mut()?;
        let delta_x = client_x - active.start_x;
        if delta_x.abs() < self.threshold {
            return None;
        }
        let capture_pointer = if active.captured {
            None
        } else {
            active.captured = true;
            Some(active.pointer_id)
        };
        self.dragged = true;
        Some(DragUpdate {
            scroll_left: active.scroll_start - delta_x,
            capture_pointer,
        })
    }

    /// Ends the press (pointer up, cancel or leave).
    ///
    /// After a drag the click suppression survives until the next
    /// `animation_frame`, so the click fired by the same release is eaten.
    pub fn release(&mut self) -> Option<PointerRelease> {
        let active = self.active.take()?;
        let was_drag = self.dragged;
        if was_drag {
            self.reset_pending = true;
        } else {
            self.dragged = false;
        }
        Some(PointerRelease {
            release_pointer: active.captured.then_some(active.pointer_id),
            was_drag,
        })
    }

    /// Animation-frame tick from the UI runtime.
    pub fn animation_frame(&mut self) {
        if self.reset_pending {
            self.dragged = false;
            self.reset_pending = false;
        }
    }

    /// Decides whether a card click should open the detail modal.
    ///
    /// Consumes the drag flag, so at most one click is suppressed per drag.
    pub fn take_click(&mut self) -> bool {
        if self.dragged {
            self.dragged = false;
            self.reset_pending = false;
            return false;
        }
        true
    }

    pub fn is_pressed(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some() && self.dragged
    }
}
