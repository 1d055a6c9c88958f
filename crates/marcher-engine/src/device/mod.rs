//! wgpu device, surface and the production [`RenderBackend`].
//!
//! [`Gpu`] owns the instance/adapter/device/queue and the window surface.
//! [`WgpuBackend`] turns handle-based creation calls and recorded frames into
//! wgpu objects and command buffers.
//!
//! [`RenderBackend`]: crate::gfx::RenderBackend

mod error;
mod gpu;
mod init;
mod wgpu_backend;

pub use error::SurfaceErrorAction;
pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use wgpu_backend::WgpuBackend;
