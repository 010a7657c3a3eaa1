//! Scroll state, boundary snapping and the wheel settle timer

use std::time::{Duration, Instant};

/// Exponential smoothing step: move `from` toward `to` by fraction `t`.
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Sign that maps zero to zero (`f32::signum` returns 1.0 for +0.0).
pub fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Snap `target` to the nearest multiple of `slot_width`, preserving sign.
///
/// A non-positive or non-finite slot width leaves the target untouched, which
/// is what an empty ring needs.
pub fn snap_to_boundary(target: f32, slot_width: f32) -> f32 {
    if !(slot_width.is_finite() && slot_width > 0.0) {
        return target;
    }
    let index = (target.abs() / slot_width).round();
    let snapped = index * slot_width;
    if target < 0.0 { -snapped } else { snapped }
}

/// Which way the ring moved this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Left,
    Right,
}

/// Singleton scroll state owned by the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    /// Smoothed position the cards are laid out with.
    pub current: f32,
    /// Position input handlers steer toward.
    pub target: f32,
    /// `current` as of the end of the previous frame.
    pub previous: f32,
    /// Fraction of the remaining distance covered per frame, in `(0, 1]`.
    pub easing: f32,
}

impl ScrollState {
    pub fn new(easing: f32) -> Self {
        Self {
            current: 0.0,
            target: 0.0,
            previous: 0.0,
            easing,
        }
    }

    /// Pull `current` toward `target` and report the resulting direction.
    pub fn advance(&mut self) -> ScrollDirection {
        self.current = lerp(self.current, self.target, self.easing);
        self.direction()
    }

    pub fn direction(&self) -> ScrollDirection {
        if self.current > self.previous {
            ScrollDirection::Right
        } else {
            ScrollDirection::Left
        }
    }

    /// Distance moved since the previous frame.
    pub fn velocity(&self) -> f32 {
        self.current - self.previous
    }

    /// Close the frame: the next frame measures motion from here.
    pub fn commit(&mut self) {
        self.previous = self.current;
    }

    pub fn snap_target(&mut self, slot_width: f32) {
        self.target = snap_to_boundary(self.target, slot_width);
    }
}

/// Debounce for "snap after the wheel goes quiet".
///
/// Every wheel event re-arms the deadline; the frame loop polls it and the
/// first poll past the deadline reports a settle exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettleTimer {
    #[default]
    Idle,
    Scrolling {
        deadline: Instant,
    },
}

impl SettleTimer {
    pub fn debounce() -> Duration {
        Duration::from_millis(
            crate::infra::constants::motion::SETTLE_DEBOUNCE_MS,
        )
    }

    /// Enter (or stay in) the scrolling state with a fresh deadline.
    pub fn arm(&mut self, now: Instant) {
        *self = SettleTimer::Scrolling {
            deadline: now + Self::debounce(),
        };
    }

    /// Returns `true` once when the deadline has passed, then goes idle.
    pub fn poll(&mut self, now: Instant) -> bool {
        match *self {
            SettleTimer::Scrolling { deadline } if now >= deadline => {
                *self = SettleTimer::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn is_scrolling(&self) -> bool {
        matches!(self, SettleTimer::Scrolling { .. })
    }
}
