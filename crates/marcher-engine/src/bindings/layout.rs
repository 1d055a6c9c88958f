/// Access mode of a binding slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SlotKind {
    /// A 2D float texture read with `textureLoad` (no sampler).
    UnfilterableTexture,
    /// A storage buffer the shader may only read.
    ReadOnlyStorage,
    /// A uniform buffer.
    Uniform,
}

impl SlotKind {
    pub(crate) fn binding_type(self) -> wgpu::BindingType {
        match self {
            SlotKind::UnfilterableTexture => wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: false },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            SlotKind::ReadOnlyStorage => wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only: true },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            SlotKind::Uniform => wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
        }
    }
}

/// One slot of a layout.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LayoutEntry {
    pub slot: u32,
    pub kind: SlotKind,
    pub visibility: wgpu::ShaderStages,
}

/// Declaration of a binding layout. Slots are numbered in insertion order.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BindingLayout {
    pub label: &'static str,
    pub entries: Vec<LayoutEntry>,
}

impl BindingLayout {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            entries: Vec::new(),
        }
    }

    /// Appends a slot numbered after the existing ones.
    pub fn slot(mut self, kind: SlotKind, visibility: wgpu::ShaderStages) -> Self {
        let slot = self.entries.len() as u32;
        self.entries.push(LayoutEntry {
            slot,
            kind,
            visibility,
        });
        self
    }

    pub(crate) fn wgpu_entries(&self) -> Vec<wgpu::BindGroupLayoutEntry> {
        self.entries
            .iter()
            .map(|e| wgpu::BindGroupLayoutEntry {
                binding: e.slot,
                visibility: e.visibility,
                ty: e.kind.binding_type(),
                count: None,
            })
            .collect()
    }
}
