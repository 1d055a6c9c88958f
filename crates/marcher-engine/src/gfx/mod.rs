//! Backend-neutral GPU vocabulary.
//!
//! Everything above this module talks to the GPU through [`RenderBackend`]:
//! resources are addressed by small typed handles and per-frame work is
//! recorded into [`FrameCommands`] before being handed to the backend in one
//! submission. `device::WgpuBackend` is the production implementation; tests
//! use an in-memory recording backend.

mod backend;
mod commands;
mod desc;
mod handle;

#[cfg(test)]
pub(crate) mod mock;

pub use backend::{Presented, RenderBackend};
pub use commands::{Command, FrameCommands, PassEncoder, PassRecord};
pub use desc::{
    BufferDesc, BufferInitDesc, PipelineDesc, ShaderDesc, TextureDesc, VertexAttribute,
    VertexLayout, ViewDesc,
};
pub use handle::{BindGroupId, BufferId, LayoutId, PipelineId, ShaderId, TextureId, ViewId};
