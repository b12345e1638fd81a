//! Pointer input shared by the resize and drag controllers.
//!
//! The host binds the move/end listeners named by [`PointerInput`], extracts
//! coordinates from each native event, and forwards them as [`PointerEvent`]s
//! to the session. A session is consumed by its `finish`, so once the end
//! event has been handled there is nothing left to unbind.

use core::time::Duration;

/// Input device driving a gesture.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointerInput {
    #[default]
    Mouse,
    Touch,
}

impl PointerInput {
    /// Event the host listens on for movement.
    pub fn move_event(self) -> &'static str {
        match self {
            Self::Mouse => "mousemove",
            Self::Touch => "touchmove",
        }
    }

    /// Event the host listens on to end the gesture.
    pub fn end_event(self) -> &'static str {
        match self {
            Self::Mouse => "mouseup",
            Self::Touch => "touchend",
        }
    }
}

/// Pointer coordinates in viewport space, stamped with the event time.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    /// Monotonic event time, only compared against earlier events.
    pub timestamp: Duration,
}

impl PointerEvent {
    pub const fn new(x: f64, y: f64, timestamp: Duration) -> Self {
        Self { x, y, timestamp }
    }

    /// Event at time zero; convenient when throttling is off.
    pub const fn at(x: f64, y: f64) -> Self {
        Self::new(x, y, Duration::ZERO)
    }
}

/// Admits at most one move per window.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Throttle {
    window: Duration,
    last: Option<Duration>,
}

impl Throttle {
    pub(crate) fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Whether a move at `now` should be applied.
    pub(crate) fn admit(&mut self, now: Duration) -> bool {
        let open = match self.last {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.window,
        };
        if open {
            self.last = Some(now);
        }
        open
    }
}
