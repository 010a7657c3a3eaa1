//! Ray casting against card planes
//!
//! Cards are unit quads on their local `z = 0` plane, scaled and rolled by
//! their model matrix. The ripple displacement is ignored here.

use glam::Mat4;

use super::camera::Ray;

/// Distance along `ray` to the card described by `model`, if it is hit.
pub fn intersect_card(ray: &Ray, model: &Mat4) -> Option<f32> {
    let inverse = model.inverse();
    if !inverse.is_finite() {
        return None;
    }
    let origin = inverse.transform_point3(ray.origin);
    let direction = inverse.transform_vector3(ray.direction);
    if direction.z.abs() <= f32::EPSILON {
        return None;
    }

    // An affine map keeps the ray parameter, so `t` is valid in world space.
    let t = -origin.z / direction.z;
    if t < 0.0 {
        return None;
    }
    let hit = origin + direction * t;
    (hit.x.abs() <= 0.5 && hit.y.abs() <= 0.5).then_some(t)
}

/// Per-model hit flags for `ray`; all false without a ray.
pub fn hit_cards(ray: Option<&Ray>, models: &[Mat4]) -> Vec<bool> {
    match ray {
        Some(ray) => models
            .iter()
            .map(|model| intersect_card(ray, model).is_some())
            .collect(),
        None => vec![false; models.len()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    fn ray_down_z(x: f32, y: f32) -> Ray {
        Ray {
            origin: Vec3::new(x, y, 20.0),
            direction: Vec3::NEG_Z,
        }
    }

    fn card(x: f32, rotation: f32) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::new(4.0, 6.0, 1.0),
            Quat::from_rotation_z(rotation),
            Vec3::new(x, 0.0, 0.0),
        )
    }

    #[test]
    fn hits_inside_misses_outside() {
        let model = card(10.0, 0.0);
        let t = intersect_card(&ray_down_z(10.0, 0.0), &model).unwrap();
        assert!((t - 20.0).abs() < 1e-4);
        assert!(intersect_card(&ray_down_z(11.9, 2.9), &model).is_some());
        assert!(intersect_card(&ray_down_z(12.1, 0.0), &model).is_none());
        assert!(intersect_card(&ray_down_z(10.0, 3.1), &model).is_none());
    }

    #[test]
    fn rotation_is_respected() {
        let model = card(0.0, std::f32::consts::FRAC_PI_2);
        // Rotated a quarter turn the card is 6 wide and 4 tall.
        assert!(intersect_card(&ray_down_z(2.9, 0.0), &model).is_some());
        assert!(intersect_card(&ray_down_z(0.0, 2.9), &model).is_none());
    }

    #[test]
    fn degenerate_model_is_never_hit() {
        let model = Mat4::from_scale(Vec3::ZERO);
        assert!(intersect_card(&ray_down_z(0.0, 0.0), &model).is_none());
    }

    #[test]
    fn no_pointer_means_no_hits() {
        let models = [card(0.0, 0.0), card(3.0, 0.0), card(9.0, 0.0)];
        assert_eq!(hit_cards(None, &models), vec![false, false, false]);
        let ray = ray_down_z(1.5, 0.0);
        // overlapping cards are both reported
        assert_eq!(hit_cards(Some(&ray), &models), vec![true, true, false]);
    }
}
