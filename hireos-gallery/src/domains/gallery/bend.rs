//! Arc placement for the bent ring
//!
//! Cards ride a circular arc whose chord spans the viewport: the arc passes
//! through `(0, 0)` and drops (or rises) by `|bend|` at `x = ±H`. Positions
//! past the viewport edge are clamped to the edge so off-screen cards keep
//! the edge pose.

use super::scroll::sign;

/// Vertical offset and roll for a card centred at `x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcPose {
    pub y: f32,
    pub rotation_z: f32,
}

impl ArcPose {
    pub const FLAT: ArcPose = ArcPose {
        y: 0.0,
        rotation_z: 0.0,
    };
}

/// Radius of the circle through `(±H, -|B|)` tangent to the X axis at zero.
pub fn arc_radius(half_width: f32, bend: f32) -> f32 {
    let b = bend.abs();
    (half_width * half_width + b * b) / (2.0 * b)
}

/// Place a card at horizontal position `x` on an arc of bend `bend`.
pub fn arc_pose(x: f32, half_width: f32, bend: f32) -> ArcPose {
    if bend == 0.0 || half_width <= 0.0 {
        return ArcPose::FLAT;
    }

    let radius = arc_radius(half_width, bend);
    let effective_x = x.abs().min(half_width);
    // radius >= half_width always holds, so the root stays real
    let drop =
        radius - (radius * radius - effective_x * effective_x).max(0.0).sqrt();
    let roll = (effective_x / radius).clamp(-1.0, 1.0).asin();

    if bend > 0.0 {
        ArcPose {
            y: -drop,
            rotation_z: -sign(x) * roll,
        }
    } else {
        ArcPose {
            y: drop,
            rotation_z: sign(x) * roll,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const H: f32 = 12.0;

    #[test]
    fn flat_when_bend_is_zero() {
        for x in [-30.0, -1.0, 0.0, 4.0, 50.0] {
            assert_eq!(arc_pose(x, H, 0.0), ArcPose::FLAT);
        }
    }

    #[test]
    fn origin_is_on_the_arc() {
        for bend in [-3.0, -0.5, 0.5, 3.0] {
            let pose = arc_pose(0.0, H, bend);
            assert_eq!(pose.y, 0.0);
            assert_eq!(pose.rotation_z, 0.0);
        }
    }

    #[test]
    fn edge_drop_equals_bend() {
        let pose = arc_pose(H, H, 3.0);
        assert!((pose.y + 3.0).abs() < 1e-4);
        let pose = arc_pose(-H, H, -3.0);
        assert!((pose.y - 3.0).abs() < 1e-4);
    }

    #[test]
    fn y_keeps_one_sign_across_the_arc() {
        for bend in [3.0f32, -3.0] {
            let mut x = -2.0 * H;
            while x <= 2.0 * H {
                let y = arc_pose(x, H, bend).y;
                assert!(y * bend <= 0.0, "x={x} bend={bend} y={y}");
                x += 0.37;
            }
        }
    }

    #[test]
    fn continuous_through_zero_and_symmetric() {
        let eps = 1e-3;
        let left = arc_pose(-eps, H, 3.0);
        let right = arc_pose(eps, H, 3.0);
        assert!((left.y - right.y).abs() < 1e-6);
        assert!(left.rotation_z.abs() < 1e-3);
        assert!(right.rotation_z.abs() < 1e-3);
        assert!((left.rotation_z + right.rotation_z).abs() < 1e-6);

        let mut previous = arc_pose(-H, H, 3.0);
        let mut x = -H;
        while x <= H {
            let pose = arc_pose(x, H, 3.0);
            assert!((pose.y - previous.y).abs() < 0.05);
            assert!((pose.rotation_z - previous.rotation_z).abs() < 0.05);
            previous = pose;
            x += 0.01;
        }
    }

    #[test]
    fn positive_bend_rolls_cards_toward_the_centre() {
        let right = arc_pose(6.0, H, 3.0);
        assert!(right.rotation_z < 0.0);
        let left = arc_pose(-6.0, H, 3.0);
        assert!(left.rotation_z > 0.0);
    }
}
