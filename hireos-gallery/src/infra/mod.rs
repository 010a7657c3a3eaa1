pub mod config;
pub mod constants;
pub mod image_loader;
pub mod shader_widgets;
