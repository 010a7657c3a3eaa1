use std::sync::Arc;

use iced::advanced::graphics::Viewport;
use iced::widget::shader::Primitive;
use iced::{Rectangle, wgpu};

use super::pipeline::CarouselPipeline;
use crate::domains::gallery::scene::FrameSnapshot;

#[derive(Debug, Clone)]
pub struct CarouselPrimitive {
    snapshot: Arc<FrameSnapshot>,
}

impl CarouselPrimitive {
    pub fn new(snapshot: Arc<FrameSnapshot>) -> Self {
        Self { snapshot }
    }
}

impl Primitive for CarouselPrimitive {
    type Pipeline = CarouselPipeline;

    fn prepare(
        &self,
        pipeline: &mut Self::Pipeline,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bounds: &Rectangle,
        viewport: &Viewport,
    ) {
        pipeline.prepare_frame(device, queue, &self.snapshot, bounds, viewport);
    }

    fn draw(
        &self,
        pipeline: &Self::Pipeline,
        render_pass: &mut wgpu::RenderPass<'_>,
    ) -> bool {
        pipeline.draw_frame(self.snapshot.scene, render_pass)
    }
}
