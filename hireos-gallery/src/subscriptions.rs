//! Root-level subscription composition

use iced::{Subscription, window};

use crate::messages::Message;
use crate::state::State;

pub fn subscription(state: &State) -> Subscription<Message> {
    let mut subscriptions = vec![
        window::resize_events().map(|(_id, size)| Message::WindowResized(size)),
        window::close_requests().map(|_id| Message::CloseRequested),
        keyboard_shortcuts(),
    ];

    // Frame ticks and pointer input only while a gallery is mounted
    if let Some(gallery) = &state.gallery {
        subscriptions.push(gallery.subscription().map(Message::Gallery));
    }

    Subscription::batch(subscriptions)
}

fn keyboard_shortcuts() -> Subscription<Message> {
    iced::keyboard::on_key_press(|key, _modifiers| {
        use iced::keyboard::{Key, key::Named};

        match key {
            Key::Named(Named::Escape) => Some(Message::ToggleGallery),
            _ => None,
        }
    })
}
