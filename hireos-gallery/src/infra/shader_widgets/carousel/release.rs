//! Release-only shader widget
//!
//! Destroyed scenes are only freed inside a prepare pass of the carousel
//! pipeline. Once the last carousel is unmounted nothing else prepares it,
//! so the host keeps this 1x1 widget in its tree instead. It draws nothing.

use iced::advanced::graphics::Viewport;
use iced::widget::Action;
use iced::widget::shader::{Primitive, Program};
use iced::{Element, Event, Length, Rectangle, mouse, wgpu};

use super::pipeline::CarouselPipeline;

#[derive(Debug, Clone, Copy, Default)]
pub struct ReleaseProgram;

#[derive(Debug, Clone, Copy, Default)]
pub struct ReleasePrimitive;

impl<Message> Program<Message> for ReleaseProgram {
    type State = ();
    type Primitive = ReleasePrimitive;

    fn draw(
        &self,
        _state: &Self::State,
        _cursor: mouse::Cursor,
        _bounds: Rectangle,
    ) -> Self::Primitive {
        ReleasePrimitive
    }

    fn update(
        &self,
        _state: &mut Self::State,
        _event: &Event,
        _bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Option<Action<Message>> {
        None
    }
}

impl Primitive for ReleasePrimitive {
    type Pipeline = CarouselPipeline;

    fn prepare(
        &self,
        pipeline: &mut Self::Pipeline,
        _device: &wgpu::Device,
        _queue: &wgpu::Queue,
        _bounds: &Rectangle,
        _viewport: &Viewport,
    ) {
        pipeline.release_retired();
    }

    fn draw(
        &self,
        _pipeline: &Self::Pipeline,
        _render_pass: &mut wgpu::RenderPass<'_>,
    ) -> bool {
        // Nothing to render
        true
    }
}

/// A 1x1 element that frees the GPU resources of destroyed scenes.
pub fn release_view<'a, Message: 'a>() -> Element<'a, Message> {
    iced::widget::shader(ReleaseProgram)
        .width(Length::Fixed(1.0))
        .height(Length::Fixed(1.0))
        .into()
}
