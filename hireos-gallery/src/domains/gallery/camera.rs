//! Camera, screen and viewport metrics

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

use crate::infra::constants::camera as cfg;

/// Container size in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Screen {
    pub width: f32,
    pub height: f32,
}

impl Screen {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

/// Visible extent of the `z = 0` plane in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn half_width(&self) -> f32 {
        self.width * 0.5
    }
}

/// A ray in world space. `direction` is normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Fixed perspective camera on the +Z axis looking at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub fov_y: f32,
    pub distance: f32,
    pub aspect: f32,
}

impl Camera {
    pub fn new(screen: Screen) -> Self {
        Self {
            fov_y: cfg::FOV_DEGREES.to_radians(),
            distance: cfg::DISTANCE,
            aspect: screen.aspect(),
        }
    }

    pub fn resize(&mut self, screen: Screen) {
        self.aspect = screen.aspect();
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.distance)
    }

    /// `height = 2·tan(fov/2)·distance`, `width = height·aspect`.
    pub fn viewport(&self) -> Viewport {
        let height = 2.0 * (self.fov_y / 2.0).tan() * self.distance;
        Viewport {
            width: height * self.aspect,
            height,
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), Vec3::ZERO, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, cfg::NEAR, cfg::FAR)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Ray from the camera through a point in normalized device
    /// coordinates (`-1..=1`, +Y up).
    pub fn ray_through(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection().inverse();
        let far = inverse * ndc.extend(1.0).extend(1.0);
        let far = far.xyz() / far.w;
        let origin = self.position();
        Ray {
            origin,
            direction: (far - origin).normalize(),
        }
    }
}

/// Convert a position inside a container of `size` to NDC.
pub fn to_ndc(x: f32, y: f32, screen: Screen) -> Vec2 {
    Vec2::new(
        (x / screen.width) * 2.0 - 1.0,
        -((y / screen.height) * 2.0 - 1.0),
    )
}
