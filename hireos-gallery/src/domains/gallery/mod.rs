//! Bent circular 3D image carousel
//!
//! Everything here is GPU-free: layout, motion, hit testing and label
//! rasterization run on the UI thread and hand the renderer a
//! [`scene::FrameSnapshot`] each frame.

pub mod bend;
pub mod camera;
pub mod card;
pub mod config;
pub mod handle;
pub mod hit_test;
pub mod input;
pub mod label;
pub mod messages;
pub mod scene;
pub mod scene_graph;
pub mod scroll;

pub use config::{FontSpec, GalleryConfig, GalleryItem, Rgba};
pub use handle::{CarouselHandle, mount};
pub use label::LabelError;
pub use messages::GalleryMessage;
pub use scene::{CarouselScene, FrameSnapshot, SceneId};
