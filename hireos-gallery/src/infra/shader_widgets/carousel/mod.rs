//! Carousel shader widget: program, primitive and wgpu pipeline

pub mod pipeline;
pub mod primitive;
pub mod program;
pub mod release;

pub use pipeline::{CardUniforms, CarouselPipeline, LabelUniforms, plane_mesh};
pub use primitive::CarouselPrimitive;
pub use program::{CarouselProgram, CarouselProgramState};
pub use release::{ReleasePrimitive, ReleaseProgram, release_view};
