//! Intermediate image targets read by the composition pass.

use crate::error::RenderError;
use crate::gfx::{RenderBackend, TextureDesc, TextureId, ViewDesc, ViewId};

/// Format of the two float layers (normal, position).
pub const GBUFFER_FLOAT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

pub const ALBEDO_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8Unorm;

/// Presentation size in physical pixels; both axes non-zero.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PresentationSize {
    width: u32,
    height: u32,
}

impl PresentationSize {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSize { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(self) -> u32 {
        self.width
    }

    pub fn height(self) -> u32 {
        self.height
    }

    pub fn aspect(self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// The G-buffer: a two-layer float texture and an albedo texture.
#[derive(Debug, Clone)]
pub struct GBufferTargets {
    float_layers: TextureId,
    albedo: TextureId,

    /// Views in binding order: float layer 0, float layer 1, albedo.
    pub views: [ViewId; 3],

    pub size: PresentationSize,
}

impl GBufferTargets {
    pub fn create<B: RenderBackend>(
        backend: &mut B,
        size: PresentationSize,
    ) -> Result<Self, RenderError> {
        let usage = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;

        let float_layers = backend.create_texture(&TextureDesc {
            label: "gbuffer float layers",
            width: size.width,
            height: size.height,
            layers: 2,
            format: GBUFFER_FLOAT_FORMAT,
            usage,
        })?;

        let albedo = backend.create_texture(&TextureDesc {
            label: "gbuffer albedo",
            width: size.width,
            height: size.height,
            layers: 1,
            format: ALBEDO_FORMAT,
            usage,
        })?;

        let views = [
            backend.create_view(
                float_layers,
                &ViewDesc {
                    label: "gbuffer float layer 0",
                    base_layer: 0,
                },
            )?,
            backend.create_view(
                float_layers,
                &ViewDesc {
                    label: "gbuffer float layer 1",
                    base_layer: 1,
                },
            )?,
            backend.create_view(
                albedo,
                &ViewDesc {
                    label: "gbuffer albedo",
                    base_layer: 0,
                },
            )?,
        ];

        log::debug!("gbuffer targets created at {}x{}", size.width, size.height);

        Ok(Self {
            float_layers,
            albedo,
            views,
            size,
        })
    }

    /// Formats of the three attachments, in view order.
    pub fn formats() -> [wgpu::TextureFormat; 3] {
        [GBUFFER_FLOAT_FORMAT, GBUFFER_FLOAT_FORMAT, ALBEDO_FORMAT]
    }

    pub fn release<B: RenderBackend>(self, backend: &mut B) {
        backend.release_texture(self.float_layers);
        backend.release_texture(self.albedo);
    }
}
