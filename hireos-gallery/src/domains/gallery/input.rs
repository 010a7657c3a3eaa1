//! Pointer and wheel input mapping

use crate::infra::constants::motion;

/// Unified mouse/touch drag state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        /// Pointer x (logical px) at press.
        start_x: f32,
        /// Scroll position recorded at press.
        start_scroll: f32,
    },
}

impl DragState {
    pub fn begin(start_x: f32, start_scroll: f32) -> Self {
        DragState::Dragging {
            start_x,
            start_scroll,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }

    /// Scroll target for a pointer now at `x`, or `None` when idle.
    pub fn target_for(&self, x: f32, speed_multiplier: f32) -> Option<f32> {
        match *self {
            DragState::Idle => None,
            DragState::Dragging {
                start_x,
                start_scroll,
            } => Some(
                start_scroll
                    + (start_x - x) * speed_multiplier * motion::DRAG_FACTOR,
            ),
        }
    }
}

/// Target increment for one wheel notch. Only the sign of the delta counts.
pub fn wheel_step(delta: f32, speed_multiplier: f32) -> f32 {
    super::scroll::sign(delta) * speed_multiplier * motion::WHEEL_FACTOR
}

/// Pick the axis to scroll by: vertical first, horizontal when vertical is
/// zero. Browser convention, so positive means "advance".
pub fn wheel_delta(delta: iced::mouse::ScrollDelta) -> f32 {
    let (x, y) = match delta {
        iced::mouse::ScrollDelta::Lines { x, y } => (x, y),
        iced::mouse::ScrollDelta::Pixels { x, y } => (x, y),
    };
    // iced reports wheel-down as negative y
    if y != 0.0 { -y } else { -x }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::mouse::ScrollDelta;

    #[test]
    fn drag_by_one_hundred_pixels() {
        let drag = DragState::begin(300.0, 0.0);
        let target = drag.target_for(200.0, 2.0);
        assert_eq!(target, Some(5.0));
        assert_eq!(DragState::Idle.target_for(200.0, 2.0), None);
    }

    #[test]
    fn wheel_uses_sign_only() {
        assert!((wheel_step(120.0, 2.0) - 0.4).abs() < 1e-6);
        assert!((wheel_step(-0.01, 2.0) + 0.4).abs() < 1e-6);
        assert_eq!(wheel_step(0.0, 2.0), 0.0);
    }

    #[test]
    fn wheel_delta_prefers_vertical() {
        assert_eq!(wheel_delta(ScrollDelta::Lines { x: 3.0, y: -1.0 }), 1.0);
        assert_eq!(wheel_delta(ScrollDelta::Pixels { x: 4.0, y: 0.0 }), -4.0);
        assert_eq!(wheel_delta(ScrollDelta::Pixels { x: 0.0, y: 0.0 }), 0.0);
    }
}
