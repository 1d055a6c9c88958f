use crate::error::RenderError;
use crate::gfx::{LayoutId, RenderBackend};

use super::layout::{BindingLayout, SlotKind};

/// The five binding layouts the renderer declares.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LayoutKind {
    /// Intermediate image targets: two float layers and albedo.
    GBufferTextures,
    /// Light storage plus the shape-selector uniform.
    Lights,
    CanvasSize,
    PointerOffset,
    /// Reserved for a texture-sampling variant; not bound by the active path.
    TextureSampler,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 5] = [
        LayoutKind::GBufferTextures,
        LayoutKind::Lights,
        LayoutKind::CanvasSize,
        LayoutKind::PointerOffset,
        LayoutKind::TextureSampler,
    ];

    /// Pure declaration of this layout's slots.
    pub fn declaration(self) -> BindingLayout {
        use wgpu::ShaderStages as S;

        match self {
            LayoutKind::GBufferTextures => BindingLayout::new("gbuffer textures")
                .slot(SlotKind::UnfilterableTexture, S::FRAGMENT)
                .slot(SlotKind::UnfilterableTexture, S::FRAGMENT)
                .slot(SlotKind::UnfilterableTexture, S::FRAGMENT),
            LayoutKind::Lights => BindingLayout::new("lights")
                .slot(SlotKind::ReadOnlyStorage, S::FRAGMENT | S::COMPUTE)
                .slot(SlotKind::Uniform, S::FRAGMENT | S::COMPUTE),
            LayoutKind::CanvasSize => {
                BindingLayout::new("canvas size").slot(SlotKind::Uniform, S::FRAGMENT)
            }
            LayoutKind::PointerOffset => {
                BindingLayout::new("pointer offset").slot(SlotKind::Uniform, S::FRAGMENT)
            }
            LayoutKind::TextureSampler => BindingLayout::new("texture sampler")
                .slot(SlotKind::ReadOnlyStorage, S::FRAGMENT)
                .slot(SlotKind::ReadOnlyStorage, S::FRAGMENT | S::COMPUTE),
        }
    }

    fn index(self) -> usize {
        match self {
            LayoutKind::GBufferTextures => 0,
            LayoutKind::Lights => 1,
            LayoutKind::CanvasSize => 2,
            LayoutKind::PointerOffset => 3,
            LayoutKind::TextureSampler => 4,
        }
    }
}

/// A layout declaration together with its backend handle.
#[derive(Debug, Clone)]
pub struct RegisteredLayout {
    pub decl: BindingLayout,
    pub id: LayoutId,
}

/// Owns the five registered layouts. Never mutated after creation.
#[derive(Debug, Clone)]
pub struct LayoutRegistry {
    layouts: Vec<RegisteredLayout>,
}

impl LayoutRegistry {
    pub fn create<B: RenderBackend>(backend: &mut B) -> Result<Self, RenderError> {
        let mut layouts = Vec::with_capacity(LayoutKind::ALL.len());
        for kind in LayoutKind::ALL {
            let decl = kind.declaration();
            let id = backend.create_layout(&decl)?;
            log::debug!("registered layout `{}` ({} slots)", decl.label, decl.entries.len());
            layouts.push(RegisteredLayout { decl, id });
        }
        Ok(Self { layouts })
    }

    pub fn get(&self, kind: LayoutKind) -> &RegisteredLayout {
        &self.layouts[kind.index()]
    }

    pub fn id(&self, kind: LayoutKind) -> LayoutId {
        self.get(kind).id
    }
}
