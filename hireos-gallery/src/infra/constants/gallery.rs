//! Gallery constants
//!
//! Fixed tuning values for the bent carousel. Anything a host may want to
//! change lives in `GalleryConfig`; these are the values the layout and
//! motion math is calibrated against.

/// Camera placement shared by layout, projection and ray casting.
pub mod camera {
    /// Vertical field of view in degrees.
    pub const FOV_DEGREES: f32 = 45.0;
    /// Distance from the camera to the origin along +Z (world units).
    pub const DISTANCE: f32 = 20.0;
    /// Near clip plane.
    pub const NEAR: f32 = 0.1;
    /// Far clip plane.
    pub const FAR: f32 = 100.0;
}

/// Card sizing relative to the container.
pub mod card {
    /// Nominal card width in pixels at the reference screen height.
    pub const NOMINAL_WIDTH: f32 = 700.0;
    /// Nominal card height in pixels at the reference screen height.
    pub const NOMINAL_HEIGHT: f32 = 900.0;
    /// Screen height at which a card renders at its nominal size.
    pub const REFERENCE_SCREEN_HEIGHT: f32 = 1500.0;
    /// Horizontal gap between neighbouring cards (world units).
    pub const SLOT_PADDING: f32 = 2.0;
    /// Horizontal plane segments of the card mesh.
    pub const MESH_WIDTH_SEGMENTS: u32 = 100;
    /// Vertical plane segments of the card mesh.
    pub const MESH_HEIGHT_SEGMENTS: u32 = 50;
    /// Colour used for cards whose image has not arrived.
    pub const BACKDROP_RGBA: [f32; 4] = [0.08, 0.08, 0.1, 0.6];
}

/// Per-frame motion.
pub mod motion {
    /// Idle drift added to the scroll target each frame.
    pub const AUTO_SCROLL_STEP: f32 = 0.1;
    /// Wheel sensitivity on top of the configured speed multiplier.
    pub const WHEEL_FACTOR: f32 = 0.2;
    /// Drag sensitivity (world units per pixel) on top of the multiplier.
    pub const DRAG_FACTOR: f32 = 0.025;
    /// Quiet period after the last wheel event before snapping (ms).
    pub const SETTLE_DEBOUNCE_MS: u64 = 200;
    /// Smoothing factor for the hover blend.
    pub const HOVER_EASING: f32 = 0.1;
    /// Shader clock advance per frame.
    pub const TIME_STEP: f32 = 0.04;
    /// Upper bound of the random initial shader clock.
    pub const TIME_PHASE_MAX: f32 = 100.0;
}

/// Caption label rasterization.
pub mod label {
    /// Horizontal padding added to the widest line (px).
    pub const PADDING_X: u32 = 40;
    /// Extra vertical room below the two lines (px).
    pub const PADDING_Y: u32 = 20;
    /// Bitmap height as a multiple of the title font size.
    pub const HEIGHT_FACTOR: f32 = 2.5;
    /// Distance of each line from the vertical middle (px).
    pub const LINE_OFFSET: f32 = 5.0;
    /// Caption size relative to the title size.
    pub const CAPTION_SCALE: f32 = 0.6;
    /// Caption colour (white at reduced opacity).
    pub const CAPTION_RGBA: [f32; 4] = [1.0, 1.0, 1.0, 0.7];
    /// Horizontal shear used to synthesize the oblique caption face.
    pub const CAPTION_SHEAR: f32 = 0.2;
    /// Label height as a fraction of its card's height.
    pub const HEIGHT_FRACTION: f32 = 0.25;
    /// Gap between the card's lower edge and the label (world units).
    pub const GAP: f32 = 0.05;
}
