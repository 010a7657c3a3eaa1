use iced::widget::{column, container, text};
use iced::{Alignment, Element, Length};

use crate::domains::gallery::handle::has_retired_scenes;
use crate::infra::shader_widgets::carousel::release_view;
use crate::messages::Message;
use crate::state::State;

const HEADING: &str = "SUCCESS STORIES";
const SUBHEADING: &str = "They upgraded their career. Will you?";

pub fn view(state: &State) -> Element<'_, Message> {
    let header = column![
        text(HEADING).size(42),
        text(SUBHEADING).size(14),
    ]
    .spacing(8)
    .align_x(Alignment::Center);

    let body: Element<'_, Message> = match &state.gallery {
        Some(gallery) => gallery.view().map(Message::Gallery),
        None => {
            let hint =
                text("Gallery hidden. Press Esc to mount it again.").size(14);
            // Frees the unmounted carousel's GPU resources on the next frame.
            let hidden = if has_retired_scenes() {
                column![hint, release_view()]
            } else {
                column![hint]
            };
            container(hidden.align_x(Alignment::Center))
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into()
        }
    };

    column![
        container(header).center_x(Length::Fill).padding(24),
        body,
    ]
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}
