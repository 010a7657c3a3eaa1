use std::sync::Arc;
use std::time::Instant;

use iced::{Point, Size};

use super::scene::SceneId;
use crate::infra::image_loader::{CardImage, ImageLoadError};

#[derive(Debug, Clone)]
pub enum GalleryMessage {
    /// Display refresh tick from `window::frames()`
    Frame(Instant),

    // Window-scoped input
    /// Wheel delta, positive advances the ring
    Wheel(f32),
    /// Mouse button or finger down; touch carries its window x, a mouse
    /// press reuses the last cursor position
    PointerPressed(Option<f32>),
    PointerMoved(f32),
    PointerReleased,

    // Container-scoped input from the shader widget
    /// Cursor position relative to the carousel, `None` once it leaves
    HoverMoved(Option<Point>),
    /// New container size, with the hover as of the same event
    ContainerResized { size: Size, hover: Option<Point> },

    /// Result of an image fetch started at mount
    ImageLoaded {
        scene: SceneId,
        item: usize,
        result: Result<Arc<CardImage>, ImageLoadError>,
    },
}

impl GalleryMessage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Frame(_) => "Gallery::Frame",
            Self::Wheel(_) => "Gallery::Wheel",
            Self::PointerPressed(_) => "Gallery::PointerPressed",
            Self::PointerMoved(_) => "Gallery::PointerMoved",
            Self::PointerReleased => "Gallery::PointerReleased",
            Self::HoverMoved(_) => "Gallery::HoverMoved",
            Self::ContainerResized { .. } => "Gallery::ContainerResized",
            Self::ImageLoaded { .. } => "Gallery::ImageLoaded",
        }
    }
}
