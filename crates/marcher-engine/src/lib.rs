//! Marcher engine crate.
//!
//! Deferred ray-marching renderer: scene resources, binding layouts,
//! pipelines and the per-frame scheduler, plus the wgpu device layer and a
//! winit host that drives them.

pub mod bindings;
pub mod device;
pub mod error;
pub mod frame;
pub mod gfx;
pub mod input;
pub mod logging;
pub mod pipeline;
pub mod scene;
pub mod time;
pub mod window;

pub use error::{BindingMismatch, RenderError};
