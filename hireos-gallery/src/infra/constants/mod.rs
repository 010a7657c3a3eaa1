//! Constants module for centralized configuration values

pub mod gallery;

// Re-export commonly used items
pub use gallery::{camera, card, label, motion};
