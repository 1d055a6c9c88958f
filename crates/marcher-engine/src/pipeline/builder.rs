use crate::bindings::{LayoutKind, LayoutRegistry};
use crate::error::RenderError;
use crate::gfx::{PipelineDesc, PipelineId, RenderBackend, ShaderDesc, ShaderId};
use crate::scene::{GBufferTargets, MeshData};

use super::shaders::{ENTRY_POINT, SHADERS};

/// Handles of the compiled shader programs.
#[derive(Debug, Copy, Clone)]
pub struct ShaderSet {
    pub write_gbuffer_vs: ShaderId,
    pub texture_quad_vs: ShaderId,
    pub write_gbuffer_fs: ShaderId,
    /// Compiled for validation only; no pipeline uses it yet.
    pub gbuffer_debug_fs: ShaderId,
    pub ray_marching_fs: ShaderId,
}

impl ShaderSet {
    fn compile<B: RenderBackend>(backend: &mut B) -> Result<Self, RenderError> {
        let mut ids = Vec::with_capacity(SHADERS.len());
        for shader in SHADERS {
            ids.push(backend.create_shader(&ShaderDesc {
                label: shader.label,
                source: shader.source,
            })?);
        }
        log::debug!("compiled {} shader programs", ids.len());

        Ok(Self {
            write_gbuffer_vs: ids[0],
            texture_quad_vs: ids[1],
            write_gbuffer_fs: ids[2],
            gbuffer_debug_fs: ids[3],
            ray_marching_fs: ids[4],
        })
    }
}

/// The renderer's fixed pipelines. Immutable after startup.
#[derive(Debug, Clone)]
pub struct Pipelines {
    /// Full-screen ray-marching composition; bound every frame.
    pub raymarch: PipelineId,
    /// Mesh attributes into the G-buffer. Built, never bound.
    pub write_gbuffer: PipelineId,
    pub shaders: ShaderSet,
}

impl Pipelines {
    /// Slot order of the ray-marching layouts: targets, lights, canvas, pointer.
    pub const RAYMARCH_SLOTS: [LayoutKind; 4] = [
        LayoutKind::GBufferTextures,
        LayoutKind::Lights,
        LayoutKind::CanvasSize,
        LayoutKind::PointerOffset,
    ];

    pub fn build<B: RenderBackend>(
        backend: &mut B,
        registry: &LayoutRegistry,
    ) -> Result<Self, RenderError> {
        let shaders = ShaderSet::compile(backend)?;

        let raymarch_layouts = Self::RAYMARCH_SLOTS.map(|kind| registry.id(kind));
        let surface_format = backend.surface_format();
        let raymarch = backend.create_pipeline(&PipelineDesc {
            label: "raymarch",
            layouts: Some(raymarch_layouts.as_slice()),
            vertex: shaders.texture_quad_vs,
            fragment: shaders.ray_marching_fs,
            entry_point: ENTRY_POINT,
            vertex_buffers: &[],
            color_targets: &[surface_format],
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: Some(wgpu::Face::Back),
        })?;

        // model + camera uniforms come from the shader interface
        let mesh_layout = [MeshData::vertex_layout()];
        let write_gbuffer = backend.create_pipeline(&PipelineDesc {
            label: "write gbuffer",
            layouts: None,
            vertex: shaders.write_gbuffer_vs,
            fragment: shaders.write_gbuffer_fs,
            entry_point: ENTRY_POINT,
            vertex_buffers: &mesh_layout,
            color_targets: &GBufferTargets::formats(),
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: Some(wgpu::Face::Back),
        })?;

        log::info!("pipelines built (surface format {surface_format:?})");

        Ok(Self {
            raymarch,
            write_gbuffer,
            shaders,
        })
    }
}
