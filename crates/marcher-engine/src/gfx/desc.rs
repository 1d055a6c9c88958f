use super::handle::{LayoutId, ShaderId};

/// Describes an uninitialised buffer. Contents start zeroed.
#[derive(Debug, Clone)]
pub struct BufferDesc<'a> {
    pub label: &'a str,
    pub size: u64,
    pub usage: wgpu::BufferUsages,
}

/// Describes a buffer populated in one bulk copy at creation time.
#[derive(Debug, Clone)]
pub struct BufferInitDesc<'a> {
    pub label: &'a str,
    pub contents: &'a [u8],
    pub usage: wgpu::BufferUsages,
}

/// Describes a 2D (optionally layered) texture.
#[derive(Debug, Clone)]
pub struct TextureDesc<'a> {
    pub label: &'a str,
    pub width: u32,
    pub height: u32,
    pub layers: u32,
    pub format: wgpu::TextureFormat,
    pub usage: wgpu::TextureUsages,
}

/// Describes a single-layer 2D view into a texture.
#[derive(Debug, Clone)]
pub struct ViewDesc<'a> {
    pub label: &'a str,
    pub base_layer: u32,
}

#[derive(Debug, Clone)]
pub struct ShaderDesc<'a> {
    pub label: &'a str,
    pub source: &'a str,
}

/// One attribute inside a vertex buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub format: wgpu::VertexFormat,
    pub offset: u64,
}

/// Layout of a per-vertex buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    pub stride: u64,
    pub attributes: Vec<VertexAttribute>,
}

/// Describes a render pipeline.
///
/// `layouts == None` lets the backend derive the layout from the shader
/// interface; otherwise the slice position is the binding slot.
#[derive(Debug, Clone)]
pub struct PipelineDesc<'a> {
    pub label: &'a str,
    pub layouts: Option<&'a [LayoutId]>,
    pub vertex: ShaderId,
    pub fragment: ShaderId,
    pub entry_point: &'a str,
    pub vertex_buffers: &'a [VertexLayout],
    pub color_targets: &'a [wgpu::TextureFormat],
    pub topology: wgpu::PrimitiveTopology,
    pub cull_mode: Option<wgpu::Face>,
}
