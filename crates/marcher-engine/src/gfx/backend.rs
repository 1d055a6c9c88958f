use crate::bindings::{BindingLayout, BindingSet};
use crate::error::RenderError;

use super::commands::FrameCommands;
use super::desc::{BufferDesc, BufferInitDesc, PipelineDesc, ShaderDesc, TextureDesc, ViewDesc};
use super::handle::{BindGroupId, BufferId, LayoutId, PipelineId, ShaderId, TextureId, ViewId};

/// Result of handing a recorded frame to the backend.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Presented {
    /// The frame was submitted and the surface image presented.
    Shown,
    /// The frame had no passes. Queued writes were flushed and no surface
    /// image was acquired.
    Offscreen,
    /// The frame was dropped (surface lost, outdated or timed out).
    Skipped,
}

/// Resource factory and submission queue.
///
/// Creation calls are setup-time operations and fail fatally; `write_buffer`
/// is an explicit queue copy that is ordered before the next `submit`.
pub trait RenderBackend {
    /// Format of the presentable surface image.
    fn surface_format(&self) -> wgpu::TextureFormat;

    fn create_buffer(&mut self, desc: &BufferDesc<'_>) -> Result<BufferId, RenderError>;

    /// Creates a buffer and fills it in a single bulk copy while mapped.
    fn create_buffer_init(&mut self, desc: &BufferInitDesc<'_>) -> Result<BufferId, RenderError>;

    /// Queues a copy of `data` into `buffer` at `offset`.
    fn write_buffer(&mut self, buffer: BufferId, offset: u64, data: &[u8])
    -> Result<(), RenderError>;

    fn create_texture(&mut self, desc: &TextureDesc<'_>) -> Result<TextureId, RenderError>;

    fn create_view(
        &mut self,
        texture: TextureId,
        desc: &ViewDesc<'_>,
    ) -> Result<ViewId, RenderError>;

    /// Drops a texture and every view created from it.
    fn release_texture(&mut self, texture: TextureId);

    fn create_layout(&mut self, layout: &BindingLayout) -> Result<LayoutId, RenderError>;

    /// Creates a bind group from an already validated binding set.
    fn create_bind_group(&mut self, set: &BindingSet) -> Result<BindGroupId, RenderError>;

    /// Drops a bind group. The handle must not be used afterwards.
    fn release_bind_group(&mut self, group: BindGroupId);

    fn create_shader(&mut self, desc: &ShaderDesc<'_>) -> Result<ShaderId, RenderError>;

    fn create_pipeline(&mut self, desc: &PipelineDesc<'_>) -> Result<PipelineId, RenderError>;

    /// Submits the frame as one unit and presents it if it has passes.
    fn submit(&mut self, frame: FrameCommands) -> Result<Presented, RenderError>;
}
