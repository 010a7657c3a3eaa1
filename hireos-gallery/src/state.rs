use iced::Size;

use crate::domains::gallery::{CarouselHandle, GalleryConfig};

#[derive(Debug)]
pub struct State {
    pub config: GalleryConfig,
    pub window_size: Size,
    /// `None` while the gallery is unmounted
    pub gallery: Option<CarouselHandle>,
}

impl State {
    pub fn new(config: GalleryConfig, window_size: Size) -> Self {
        Self {
            config,
            window_size,
            gallery: None,
        }
    }

    pub fn is_gallery_mounted(&self) -> bool {
        self.gallery.is_some()
    }
}
