//! In-memory backend for tests (no GPU required).
//!
//! Buffers keep their bytes so tests can read uniform contents back; every
//! layout, binding set, pipeline and submitted frame is kept for inspection.

use crate::bindings::{BindingLayout, BindingSet};
use crate::error::RenderError;

use super::backend::{Presented, RenderBackend};
use super::commands::FrameCommands;
use super::desc::{BufferDesc, BufferInitDesc, PipelineDesc, ShaderDesc, TextureDesc, ViewDesc};
use super::handle::{BindGroupId, BufferId, LayoutId, PipelineId, ShaderId, TextureId, ViewId};

#[derive(Debug, Clone)]
pub(crate) struct MockBuffer {
    pub label: String,
    pub usage: wgpu::BufferUsages,
    pub data: Vec<u8>,
    /// Whether the contents were supplied at creation.
    pub initialised_at_creation: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct MockTexture {
    pub width: u32,
    pub height: u32,
    pub layers: u32,
    pub format: wgpu::TextureFormat,
    pub usage: wgpu::TextureUsages,
    pub released: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct MockView {
    pub base_layer: u32,
}

#[derive(Debug, Clone)]
pub(crate) struct MockPipeline {
    pub layouts: Option<Vec<LayoutId>>,
    pub vertex_buffers: usize,
    pub color_targets: Vec<wgpu::TextureFormat>,
    pub cull_mode: Option<wgpu::Face>,
}

/// A write recorded through `write_buffer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BufferWrite {
    pub buffer: BufferId,
    pub offset: u64,
    pub len: usize,
}

#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    pub buffers: Vec<MockBuffer>,
    pub textures: Vec<MockTexture>,
    pub views: Vec<MockView>,
    pub layouts: Vec<BindingLayout>,
    pub bind_groups: Vec<BindingSet>,
    pub released_bind_groups: Vec<BindGroupId>,
    pub shaders: Vec<String>,
    pub pipelines: Vec<MockPipeline>,
    pub writes: Vec<BufferWrite>,
    pub submitted: Vec<FrameCommands>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self, id: BufferId) -> &MockBuffer {
        &self.buffers[id.index()]
    }

    /// Reads a POD value from the start of a buffer.
    pub fn read<T: bytemuck::Pod>(&self, id: BufferId) -> T {
        let data = &self.buffer(id).data;
        bytemuck::pod_read_unaligned(&data[..std::mem::size_of::<T>()])
    }

    /// Number of `write_buffer` calls that targeted `id`.
    pub fn writes_to(&self, id: BufferId) -> usize {
        self.writes.iter().filter(|w| w.buffer == id).count()
    }

    /// Textures created and not yet released.
    pub fn live_textures(&self) -> usize {
        self.textures.iter().filter(|t| !t.released).count()
    }

    /// Bind groups created and not yet released.
    pub fn live_bind_groups(&self) -> usize {
        self.bind_groups.len() - self.released_bind_groups.len()
    }

    /// Count of resources created so far, of any kind.
    pub fn resource_count(&self) -> usize {
        self.buffers.len()
            + self.textures.len()
            + self.views.len()
            + self.layouts.len()
            + self.bind_groups.len()
            + self.shaders.len()
            + self.pipelines.len()
    }
}

fn check<T>(table: &[T], index: usize, kind: &'static str) -> Result<(), RenderError> {
    if index < table.len() {
        Ok(())
    } else {
        Err(RenderError::InvalidHandle {
            kind,
            index: index as u32,
        })
    }
}

impl RenderBackend for RecordingBackend {
    fn surface_format(&self) -> wgpu::TextureFormat {
        wgpu::TextureFormat::Bgra8UnormSrgb
    }

    fn create_buffer(&mut self, desc: &BufferDesc<'_>) -> Result<BufferId, RenderError> {
        self.buffers.push(MockBuffer {
            label: desc.label.to_string(),
            usage: desc.usage,
            data: vec![0; desc.size as usize],
            initialised_at_creation: false,
        });
        Ok(BufferId::from_index(self.buffers.len() - 1))
    }

    fn create_buffer_init(&mut self, desc: &BufferInitDesc<'_>) -> Result<BufferId, RenderError> {
        self.buffers.push(MockBuffer {
            label: desc.label.to_string(),
            usage: desc.usage,
            data: desc.contents.to_vec(),
            initialised_at_creation: true,
        });
        Ok(BufferId::from_index(self.buffers.len() - 1))
    }

    fn write_buffer(
        &mut self,
        buffer: BufferId,
        offset: u64,
        data: &[u8],
    ) -> Result<(), RenderError> {
        check(&self.buffers, buffer.index(), BufferId::KIND)?;
        let target = &mut self.buffers[buffer.index()];
        assert!(
            target.usage.contains(wgpu::BufferUsages::COPY_DST),
            "write to `{}` without COPY_DST",
            target.label
        );
        let start = offset as usize;
        target.data[start..start + data.len()].copy_from_slice(data);
        self.writes.push(BufferWrite {
            buffer,
            offset,
            len: data.len(),
        });
        Ok(())
    }

    fn create_texture(&mut self, desc: &TextureDesc<'_>) -> Result<TextureId, RenderError> {
        self.textures.push(MockTexture {
            width: desc.width,
            height: desc.height,
            layers: desc.layers,
            format: desc.format,
            usage: desc.usage,
            released: false,
        });
        Ok(TextureId::from_index(self.textures.len() - 1))
    }

    fn create_view(
        &mut self,
        texture: TextureId,
        desc: &ViewDesc<'_>,
    ) -> Result<ViewId, RenderError> {
        check(&self.textures, texture.index(), TextureId::KIND)?;
        assert!(desc.base_layer < self.textures[texture.index()].layers);
        self.views.push(MockView {
            base_layer: desc.base_layer,
        });
        Ok(ViewId::from_index(self.views.len() - 1))
    }

    fn release_texture(&mut self, texture: TextureId) {
        if let Some(t) = self.textures.get_mut(texture.index()) {
            t.released = true;
        }
    }

    fn create_layout(&mut self, layout: &BindingLayout) -> Result<LayoutId, RenderError> {
        self.layouts.push(layout.clone());
        Ok(LayoutId::from_index(self.layouts.len() - 1))
    }

    fn create_bind_group(&mut self, set: &BindingSet) -> Result<BindGroupId, RenderError> {
        check(&self.layouts, set.layout().index(), LayoutId::KIND)?;
        self.bind_groups.push(set.clone());
        Ok(BindGroupId::from_index(self.bind_groups.len() - 1))
    }

    fn release_bind_group(&mut self, group: BindGroupId) {
        if group.index() < self.bind_groups.len() && !self.released_bind_groups.contains(&group) {
            self.released_bind_groups.push(group);
        }
    }

    fn create_shader(&mut self, desc: &ShaderDesc<'_>) -> Result<ShaderId, RenderError> {
        self.shaders.push(desc.label.to_string());
        Ok(ShaderId::from_index(self.shaders.len() - 1))
    }

    fn create_pipeline(&mut self, desc: &PipelineDesc<'_>) -> Result<PipelineId, RenderError> {
        check(&self.shaders, desc.vertex.index(), ShaderId::KIND)?;
        check(&self.shaders, desc.fragment.index(), ShaderId::KIND)?;
        if let Some(layouts) = desc.layouts {
            for layout in layouts {
                check(&self.layouts, layout.index(), LayoutId::KIND)?;
            }
        }
        self.pipelines.push(MockPipeline {
            layouts: desc.layouts.map(<[LayoutId]>::to_vec),
            vertex_buffers: desc.vertex_buffers.len(),
            color_targets: desc.color_targets.to_vec(),
            cull_mode: desc.cull_mode,
        });
        Ok(PipelineId::from_index(self.pipelines.len() - 1))
    }

    fn submit(&mut self, frame: FrameCommands) -> Result<Presented, RenderError> {
        let presented = if frame.is_empty() {
            Presented::Offscreen
        } else {
            Presented::Shown
        };
        self.submitted.push(frame);
        Ok(presented)
    }
}
