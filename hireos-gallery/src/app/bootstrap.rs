use iced::{Size, Task};

use crate::domains::gallery::{GalleryConfig, GalleryItem};
use crate::infra::config;
use crate::messages::Message;
use crate::state::State;
use crate::update::mount_gallery;

/// Window size the host opens with.
pub const INITIAL_WINDOW_SIZE: Size = Size::new(1280.0, 720.0);

/// Easing the landing page mounts its stories carousel with.
const STORIES_SCROLL_EASING: f32 = 0.02;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub gallery: GalleryConfig,
    pub mount_on_start: bool,
}

impl AppConfig {
    pub fn new(gallery: GalleryConfig) -> Self {
        Self {
            gallery,
            mount_on_start: true,
        }
    }

    /// Configuration file plus environment overrides; the built-in success
    /// stories fill in when no items are configured.
    pub fn from_environment() -> Self {
        Self::new(with_stories(config::load_from_environment()))
    }

    pub fn with_mount_on_start(mut self, enabled: bool) -> Self {
        self.mount_on_start = enabled;
        self
    }
}

/// Fill an empty item list with the success stories. Their slower easing
/// applies only while the configured easing is still the default.
pub fn with_stories(gallery: GalleryConfig) -> GalleryConfig {
    if !gallery.items.is_empty() {
        return gallery;
    }

    let scroll_easing =
        if gallery.scroll_easing == GalleryConfig::default().scroll_easing {
            STORIES_SCROLL_EASING
        } else {
            gallery.scroll_easing
        };

    GalleryConfig {
        scroll_easing,
        ..gallery
    }
    .with_items(success_stories())
}

/// Stories shown on the landing page.
pub fn success_stories() -> Vec<GalleryItem> {
    [
        (1011, "Alex - Google"),
        (1027, "Sarah - OpenAI"),
        (1012, "David - Tesla"),
        (1025, "Emily - Meta"),
        (1005, "Michael - AWS"),
        (1006, "Anna - Netflix"),
        (1009, "James - Stripe"),
    ]
    .into_iter()
    .map(|(id, text)| {
        GalleryItem::new(
            format!("https://picsum.photos/id/{id}/600/800?grayscale"),
            text,
            "",
        )
    })
    .collect()
}

pub fn runtime_boot(config: &AppConfig) -> (State, Task<Message>) {
    let mut state = State::new(config.gallery.clone(), INITIAL_WINDOW_SIZE);

    let task = if config.mount_on_start {
        mount_gallery(&mut state)
    } else {
        log::info!("Gallery starts unmounted; press Esc to mount it");
        Task::none()
    };

    (state, task)
}
