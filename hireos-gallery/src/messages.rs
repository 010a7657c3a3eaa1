use iced::Size;

use crate::domains::gallery::GalleryMessage;

#[derive(Debug, Clone)]
pub enum Message {
    Gallery(GalleryMessage),
    /// Mount the gallery if it is hidden, destroy it otherwise
    ToggleGallery,
    WindowResized(Size),
    CloseRequested,
}

impl Message {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gallery(message) => message.name(),
            Self::ToggleGallery => "App::ToggleGallery",
            Self::WindowResized(_) => "App::WindowResized",
            Self::CloseRequested => "App::CloseRequested",
        }
    }
}
