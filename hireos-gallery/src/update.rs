use iced::Task;

use crate::domains::gallery::mount;
use crate::messages::Message;
use crate::state::State;

pub fn update(state: &mut State, message: Message) -> Task<Message> {
    log::trace!("{}", message.name());

    match message {
        Message::Gallery(message) => {
            // Results for an unmounted gallery have nowhere to go.
            if let Some(gallery) = state.gallery.as_mut() {
                gallery.update(message);
            }
            Task::none()
        }
        Message::ToggleGallery => match state.gallery.take() {
            Some(mut gallery) => {
                gallery.destroy();
                Task::none()
            }
            None => mount_gallery(state),
        },
        Message::WindowResized(size) => {
            state.window_size = size;
            Task::none()
        }
        Message::CloseRequested => {
            if let Some(mut gallery) = state.gallery.take() {
                gallery.destroy();
            }
            iced::exit()
        }
    }
}

/// Mount a fresh gallery sized to the current window.
pub fn mount_gallery(state: &mut State) -> Task<Message> {
    let (gallery, loads) = mount(state.window_size, state.config.clone());
    state.gallery = Some(gallery);
    loads.map(Message::Gallery)
}
