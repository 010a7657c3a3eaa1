//! Hire.OS gallery
//!
//! A bent circular 3D image carousel rendered through an `iced` shader
//! widget, plus the small desktop host in `src/main.rs` that mounts it.
//!
//! Notes
//! - [`domains::gallery`] is the embeddable part: [`domains::gallery::mount`]
//!   returns a handle whose `update`, `subscription`, `view` and `destroy`
//!   are wired into the host's own loop.
//! - The remaining modules are application glue for the demo window.

pub mod app;
pub mod domains;
pub mod infra;
pub mod messages;
pub mod state;
pub mod subscriptions;
pub mod update;
pub mod view;
