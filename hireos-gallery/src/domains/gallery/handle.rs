//! Mount/destroy boundary
//!
//! `mount` builds a scene for a container and returns the handle the host
//! keeps, together with the image fetches to run. While the handle is
//! running its subscription delivers frame ticks and window input; after
//! `destroy` the subscription is empty, late image results are dropped and
//! the renderer releases the scene's GPU resources on its next prepare,
//! driven by [`release_view`] once no carousel is left on screen.

use std::sync::Arc;
use std::time::Instant;

use iced::event::{self, Event};
use iced::widget::container;
use iced::{Element, Length, Size, Subscription, Task, mouse, touch, window};
use parking_lot::Mutex;

use super::camera::Screen;
use super::config::GalleryConfig;
use super::input::wheel_delta;
use super::messages::GalleryMessage;
use super::scene::{CarouselScene, SceneId};
use crate::infra::image_loader;
use crate::infra::shader_widgets::carousel::{CarouselProgram, release_view};

/// Scenes destroyed since the renderer last looked.
static RETIRED_SCENES: Mutex<Vec<SceneId>> =
    parking_lot::const_mutex(Vec::new());

/// Take the ids of scenes destroyed since the previous call.
pub fn take_retired_scenes() -> Vec<SceneId> {
    std::mem::take(&mut *RETIRED_SCENES.lock())
}

/// Whether a destroyed scene still waits for its GPU resources to be freed.
pub fn has_retired_scenes() -> bool {
    !RETIRED_SCENES.lock().is_empty()
}

#[derive(Debug)]
pub struct CarouselHandle {
    scene: CarouselScene,
    running: bool,
    /// Last window-level cursor x, used when a mouse press arrives.
    cursor_x: f32,
}

/// Create a carousel for a container of `container` logical pixels.
pub fn mount(
    container: Size,
    config: GalleryConfig,
) -> (CarouselHandle, Task<GalleryMessage>) {
    let screen = Screen::new(container.width, container.height);
    let scene = CarouselScene::new(screen, config);
    let scene_id = scene.id();

    let loads = scene.items().iter().enumerate().map(|(item, entry)| {
        let source = entry.image.clone();
        Task::perform(image_loader::load(source), move |result| {
            GalleryMessage::ImageLoaded {
                scene: scene_id,
                item,
                result: result.map(Arc::new),
            }
        })
    });
    let task = Task::batch(loads);

    log::info!(
        "Mounted gallery scene {} with {} cards ({}x{})",
        scene_id.get(),
        scene.ring_len(),
        container.width,
        container.height
    );

    (
        CarouselHandle {
            scene,
            running: true,
            cursor_x: 0.0,
        },
        task,
    )
}

impl CarouselHandle {
    pub fn scene(&self) -> &CarouselScene {
        &self.scene
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn update(&mut self, message: GalleryMessage) {
        if !self.running {
            if let GalleryMessage::ImageLoaded { scene, item, .. } = message {
                log::debug!(
                    "Dropping image {item} for destroyed scene {}",
                    scene.get()
                );
            }
            return;
        }

        match message {
            GalleryMessage::Frame(now) => self.scene.frame(now),
            GalleryMessage::Wheel(delta) => {
                self.scene.on_wheel(delta, Instant::now())
            }
            GalleryMessage::PointerPressed(x) => {
                let x = x.unwrap_or(self.cursor_x);
                self.cursor_x = x;
                self.scene.on_press(x);
            }
            GalleryMessage::PointerMoved(x) => {
                self.cursor_x = x;
                self.scene.on_move(x);
            }
            GalleryMessage::PointerReleased => self.scene.on_release(),
            GalleryMessage::HoverMoved(pointer) => {
                self.scene.set_pointer(pointer)
            }
            GalleryMessage::ContainerResized { size, hover } => {
                self.scene.resize(Screen::new(size.width, size.height));
                self.scene.set_pointer(hover);
            }
            GalleryMessage::ImageLoaded {
                scene,
                item,
                result,
            } => {
                if scene != self.scene.id() {
                    log::debug!(
                        "Dropping image {item} for stale scene {}",
                        scene.get()
                    );
                    return;
                }
                match result {
                    Ok(image) => {
                        self.scene.apply_image(item, image);
                    }
                    Err(e) => {
                        log::warn!(
                            "Card image `{}` failed to load: {e}",
                            self.scene
                                .items()
                                .get(item)
                                .map(|i| i.image.as_str())
                                .unwrap_or("?")
                        );
                    }
                }
            }
        }
    }

    /// Frame ticks and window input while running, nothing after destroy.
    pub fn subscription(&self) -> Subscription<GalleryMessage> {
        if !self.running {
            return Subscription::none();
        }
        Subscription::batch([
            window::frames().map(GalleryMessage::Frame),
            event::listen_with(window_input),
        ])
    }

    /// The carousel while running. After destroy only the 1x1 release
    /// widget remains, so the scene's GPU resources are still freed.
    pub fn view(&self) -> Element<'_, GalleryMessage> {
        if !self.running {
            return container(release_view())
                .width(Length::Fill)
                .height(Length::Fill)
                .into();
        }
        iced::widget::shader(CarouselProgram::new(Arc::new(
            self.scene.snapshot(),
        )))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }

    /// Stop the frame loop and hand the scene's GPU resources back.
    /// Calling it again is a no-op.
    pub fn destroy(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        RETIRED_SCENES.lock().push(self.scene.id());
        log::info!("Destroyed gallery scene {}", self.scene.id().get());
    }
}

impl Drop for CarouselHandle {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Window-scoped listener: wheel, mouse drag and touch drag.
fn window_input(
    event: Event,
    _status: event::Status,
    _window: window::Id,
) -> Option<GalleryMessage> {
    match event {
        Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
            let delta = wheel_delta(delta);
            (delta != 0.0).then_some(GalleryMessage::Wheel(delta))
        }
        Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
            Some(GalleryMessage::PointerPressed(None))
        }
        Event::Mouse(mouse::Event::CursorMoved { position }) => {
            Some(GalleryMessage::PointerMoved(position.x))
        }
        Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
            Some(GalleryMessage::PointerReleased)
        }
        Event::Touch(touch::Event::FingerPressed { position, .. }) => {
            Some(GalleryMessage::PointerPressed(Some(position.x)))
        }
        Event::Touch(touch::Event::FingerMoved { position, .. }) => {
            Some(GalleryMessage::PointerMoved(position.x))
        }
        Event::Touch(
            touch::Event::FingerLifted { .. } | touch::Event::FingerLost { .. },
        ) => Some(GalleryMessage::PointerReleased),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::Point;

    #[test]
    fn wheel_and_drag_map_to_messages() {
        let id = window::Id::unique();
        let wheel = Event::Mouse(mouse::Event::WheelScrolled {
            delta: mouse::ScrollDelta::Lines { x: 0.0, y: -1.0 },
        });
        assert!(matches!(
            window_input(wheel, event::Status::Ignored, id),
            Some(GalleryMessage::Wheel(d)) if d == 1.0
        ));

        let idle_wheel = Event::Mouse(mouse::Event::WheelScrolled {
            delta: mouse::ScrollDelta::Pixels { x: 0.0, y: 0.0 },
        });
        assert!(window_input(idle_wheel, event::Status::Ignored, id).is_none());

        let finger = Event::Touch(touch::Event::FingerPressed {
            id: touch::Finger(1),
            position: Point::new(42.0, 7.0),
        });
        assert!(matches!(
            window_input(finger, event::Status::Captured, id),
            Some(GalleryMessage::PointerPressed(Some(x))) if x == 42.0
        ));
    }
}
