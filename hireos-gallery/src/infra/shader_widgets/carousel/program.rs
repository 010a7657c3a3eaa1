use std::sync::Arc;

use iced::widget::Action;
use iced::widget::shader::Program;
use iced::{Event, Point, Rectangle, Size, mouse};

use super::primitive::CarouselPrimitive;
use crate::domains::gallery::messages::GalleryMessage;
use crate::domains::gallery::scene::FrameSnapshot;

/// Shader program for one frame of the carousel.
///
/// Its `update` is the container-scoped listener: it reports the widget's
/// size whenever layout changes it, and the cursor position while the
/// cursor is over the widget.
#[derive(Debug, Clone)]
pub struct CarouselProgram {
    snapshot: Arc<FrameSnapshot>,
}

impl CarouselProgram {
    pub fn new(snapshot: Arc<FrameSnapshot>) -> Self {
        Self { snapshot }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CarouselProgramState {
    /// Size last reported to the host
    pub reported_size: Option<Size>,
    /// Cursor position last reported, widget-local
    pub hover: Option<Point>,
}

impl CarouselProgramState {
    /// Fold one widget event into the reported state.
    ///
    /// A size change is reported together with the current hover, so a
    /// cursor move delivered alongside a layout change is not lost.
    pub fn observe(
        &mut self,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<GalleryMessage> {
        let hover_changed = match event {
            Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                let hover = cursor.position_in(bounds);
                let changed = hover != self.hover;
                self.hover = hover;
                changed
            }
            Event::Mouse(mouse::Event::CursorLeft) => {
                self.hover.take().is_some()
            }
            _ => false,
        };

        let size = bounds.size();
        if self.reported_size != Some(size) {
            self.reported_size = Some(size);
            return Some(GalleryMessage::ContainerResized {
                size,
                hover: self.hover,
            });
        }

        hover_changed.then_some(GalleryMessage::HoverMoved(self.hover))
    }
}

impl Program<GalleryMessage> for CarouselProgram {
    type State = CarouselProgramState;
    type Primitive = CarouselPrimitive;

    fn draw(
        &self,
        _state: &Self::State,
        _cursor: mouse::Cursor,
        _bounds: Rectangle,
    ) -> Self::Primitive {
        CarouselPrimitive::new(Arc::clone(&self.snapshot))
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<Action<GalleryMessage>> {
        state.observe(event, bounds, cursor).map(Action::publish)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(width: f32, height: f32) -> Rectangle {
        Rectangle::new(Point::new(10.0, 20.0), Size::new(width, height))
    }

    fn moved(x: f32, y: f32) -> (Event, mouse::Cursor) {
        let position = Point::new(x, y);
        (
            Event::Mouse(mouse::Event::CursorMoved { position }),
            mouse::Cursor::Available(position),
        )
    }

    #[test]
    fn cursor_move_during_resize_keeps_hover() {
        let mut state = CarouselProgramState::default();
        let (event, cursor) = moved(110.0, 70.0);

        match state.observe(&event, bounds(400.0, 300.0), cursor) {
            Some(GalleryMessage::ContainerResized { size, hover }) => {
                assert_eq!(size, Size::new(400.0, 300.0));
                assert_eq!(hover, Some(Point::new(100.0, 50.0)));
            }
            other => panic!("expected resize, got {other:?}"),
        }

        // Same layout, same cursor: nothing new to say.
        assert!(state.observe(&event, bounds(400.0, 300.0), cursor).is_none());
    }

    #[test]
    fn hover_reports_widget_local_position_and_leave() {
        let mut state = CarouselProgramState {
            reported_size: Some(Size::new(400.0, 300.0)),
            hover: None,
        };
        let (event, cursor) = moved(60.0, 40.0);
        let same = bounds(400.0, 300.0);

        assert!(matches!(
            state.observe(&event, same, cursor),
            Some(GalleryMessage::HoverMoved(Some(p)))
                if p == Point::new(50.0, 20.0)
        ));

        let left = Event::Mouse(mouse::Event::CursorLeft);
        let away = mouse::Cursor::Unavailable;
        assert!(matches!(
            state.observe(&left, same, away),
            Some(GalleryMessage::HoverMoved(None))
        ));
        assert!(state.observe(&left, same, away).is_none());
    }

    #[test]
    fn leaving_during_resize_clears_hover() {
        let mut state = CarouselProgramState {
            reported_size: Some(Size::new(400.0, 300.0)),
            hover: Some(Point::new(5.0, 5.0)),
        };
        let left = Event::Mouse(mouse::Event::CursorLeft);

        let away = mouse::Cursor::Unavailable;

        assert!(matches!(
            state.observe(&left, bounds(200.0, 300.0), away),
            Some(GalleryMessage::ContainerResized { hover: None, .. })
        ));
        assert!(state.hover.is_none());
    }
}
