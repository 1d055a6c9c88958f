use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::bindings::{BindingLayout, BindingResource, BindingSet};
use crate::error::RenderError;
use crate::gfx::{
    BindGroupId, BufferDesc, BufferId, BufferInitDesc, Command, FrameCommands, LayoutId,
    PassRecord, PipelineDesc, PipelineId, Presented, RenderBackend, ShaderDesc, ShaderId,
    TextureDesc, TextureId, ViewDesc, ViewId,
};

use super::error::SurfaceErrorAction;
use super::gpu::Gpu;

/// Resource tables indexed by the typed handles.
///
/// Released textures, views and bind groups leave `None` behind; the next
/// creation of the same kind reuses the first free slot, so resizing does not
/// grow the tables.
#[derive(Default)]
struct Tables {
    buffers: Vec<wgpu::Buffer>,
    textures: Vec<Option<wgpu::Texture>>,
    views: Vec<Option<(TextureId, wgpu::TextureView)>>,
    layouts: Vec<wgpu::BindGroupLayout>,
    bind_groups: Vec<Option<wgpu::BindGroup>>,
    shaders: Vec<wgpu::ShaderModule>,
    pipelines: Vec<wgpu::RenderPipeline>,
}

fn invalid(kind: &'static str, index: usize) -> RenderError {
    RenderError::InvalidHandle {
        kind,
        index: index as u32,
    }
}

fn lookup<'a, T>(table: &'a [T], index: usize, kind: &'static str) -> Result<&'a T, RenderError> {
    table.get(index).ok_or_else(|| invalid(kind, index))
}

fn lookup_live<'a, T>(
    table: &'a [Option<T>],
    index: usize,
    kind: &'static str,
) -> Result<&'a T, RenderError> {
    table
        .get(index)
        .and_then(Option::as_ref)
        .ok_or_else(|| invalid(kind, index))
}

/// Stores `value` in the first free slot, or appends it.
fn insert<T>(table: &mut Vec<Option<T>>, value: T) -> usize {
    match table.iter().position(Option::is_none) {
        Some(index) => {
            table[index] = Some(value);
            index
        }
        None => {
            table.push(Some(value));
            table.len() - 1
        }
    }
}

impl Tables {
    fn buffer(&self, id: BufferId) -> Result<&wgpu::Buffer, RenderError> {
        lookup(&self.buffers, id.index(), BufferId::KIND)
    }

    fn texture(&self, id: TextureId) -> Result<&wgpu::Texture, RenderError> {
        lookup_live(&self.textures, id.index(), TextureId::KIND)
    }

    fn view(&self, id: ViewId) -> Result<&wgpu::TextureView, RenderError> {
        lookup_live(&self.views, id.index(), ViewId::KIND).map(|(_, view)| view)
    }

    fn layout(&self, id: LayoutId) -> Result<&wgpu::BindGroupLayout, RenderError> {
        lookup(&self.layouts, id.index(), LayoutId::KIND)
    }

    fn bind_group(&self, id: BindGroupId) -> Result<&wgpu::BindGroup, RenderError> {
        lookup_live(&self.bind_groups, id.index(), BindGroupId::KIND)
    }

    fn shader(&self, id: ShaderId) -> Result<&wgpu::ShaderModule, RenderError> {
        lookup(&self.shaders, id.index(), ShaderId::KIND)
    }

    fn pipeline(&self, id: PipelineId) -> Result<&wgpu::RenderPipeline, RenderError> {
        lookup(&self.pipelines, id.index(), PipelineId::KIND)
    }
}

/// [`RenderBackend`] over a real device, queue and window surface.
///
/// Validation failures inside wgpu are reported by its uncaptured-error
/// handler and abort the process.
pub struct WgpuBackend<'w> {
    gpu: Gpu<'w>,
    tables: Tables,
}

impl<'w> WgpuBackend<'w> {
    pub fn new(gpu: Gpu<'w>) -> Self {
        Self {
            gpu,
            tables: Tables::default(),
        }
    }

    pub fn gpu(&self) -> &Gpu<'w> {
        &self.gpu
    }

    /// Reconfigures the surface. Image targets are resized by the scheduler.
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.gpu.resize(size);
    }

    fn record_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        record: &PassRecord,
    ) -> Result<(), RenderError> {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(record.label.as_str()),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(record.clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        for command in &record.commands {
            match command {
                Command::SetPipeline(id) => pass.set_pipeline(self.tables.pipeline(*id)?),
                Command::SetBindGroup { slot, group } => {
                    pass.set_bind_group(*slot, self.tables.bind_group(*group)?, &[]);
                }
                Command::Draw {
                    vertices,
                    instances,
                } => pass.draw(vertices.clone(), instances.clone()),
            }
        }

        Ok(())
    }
}

impl RenderBackend for WgpuBackend<'_> {
    fn surface_format(&self) -> wgpu::TextureFormat {
        self.gpu.surface_format()
    }

    fn create_buffer(&mut self, desc: &BufferDesc<'_>) -> Result<BufferId, RenderError> {
        let buffer = self.gpu.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some(desc.label),
            size: desc.size,
            usage: desc.usage,
            mapped_at_creation: false,
        });
        log::debug!("buffer `{}` ({} bytes)", desc.label, desc.size);
        self.tables.buffers.push(buffer);
        Ok(BufferId::from_index(self.tables.buffers.len() - 1))
    }

    fn create_buffer_init(&mut self, desc: &BufferInitDesc<'_>) -> Result<BufferId, RenderError> {
        let buffer = self
            .gpu
            .device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(desc.label),
                contents: desc.contents,
                usage: desc.usage,
            });
        log::debug!(
            "buffer `{}` ({} bytes, populated at creation)",
            desc.label,
            desc.contents.len()
        );
        self.tables.buffers.push(buffer);
        Ok(BufferId::from_index(self.tables.buffers.len() - 1))
    }

    fn write_buffer(
        &mut self,
        buffer: BufferId,
        offset: u64,
        data: &[u8],
    ) -> Result<(), RenderError> {
        let buffer = self.tables.buffer(buffer)?;
        self.gpu.queue().write_buffer(buffer, offset, data);
        Ok(())
    }

    fn create_texture(&mut self, desc: &TextureDesc<'_>) -> Result<TextureId, RenderError> {
        let texture = self.gpu.device().create_texture(&wgpu::TextureDescriptor {
            label: Some(desc.label),
            size: wgpu::Extent3d {
                width: desc.width,
                height: desc.height,
                depth_or_array_layers: desc.layers,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: desc.format,
            usage: desc.usage,
            view_formats: &[],
        });
        Ok(TextureId::from_index(insert(&mut self.tables.textures, texture)))
    }

    fn create_view(
        &mut self,
        texture: TextureId,
        desc: &ViewDesc<'_>,
    ) -> Result<ViewId, RenderError> {
        let view = self
            .tables
            .texture(texture)?
            .create_view(&wgpu::TextureViewDescriptor {
                label: Some(desc.label),
                dimension: Some(wgpu::TextureViewDimension::D2),
                base_array_layer: desc.base_layer,
                array_layer_count: Some(1),
                ..Default::default()
            });
        Ok(ViewId::from_index(insert(&mut self.tables.views, (texture, view))))
    }

    fn release_texture(&mut self, texture: TextureId) {
        for slot in &mut self.tables.views {
            if matches!(slot, Some((owner, _)) if *owner == texture) {
                *slot = None;
            }
        }
        if let Some(Some(t)) = self.tables.textures.get_mut(texture.index()).map(Option::take) {
            t.destroy();
        }
    }

    fn create_layout(&mut self, layout: &BindingLayout) -> Result<LayoutId, RenderError> {
        let entries = layout.wgpu_entries();
        let bgl = self
            .gpu
            .device()
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(layout.label),
                entries: &entries,
            });
        self.tables.layouts.push(bgl);
        Ok(LayoutId::from_index(self.tables.layouts.len() - 1))
    }

    fn create_bind_group(&mut self, set: &BindingSet) -> Result<BindGroupId, RenderError> {
        let tables = &self.tables;
        let mut entries = Vec::with_capacity(set.entries().len());
        for (slot, resource) in set.entries() {
            let resource = match resource {
                BindingResource::Texture(view) => {
                    wgpu::BindingResource::TextureView(tables.view(*view)?)
                }
                BindingResource::ReadOnlyStorage(buffer) | BindingResource::Uniform(buffer) => {
                    tables.buffer(*buffer)?.as_entire_binding()
                }
            };
            entries.push(wgpu::BindGroupEntry {
                binding: *slot,
                resource,
            });
        }

        let group = self
            .gpu
            .device()
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(set.label()),
                layout: tables.layout(set.layout())?,
                entries: &entries,
            });
        Ok(BindGroupId::from_index(insert(&mut self.tables.bind_groups, group)))
    }

    fn release_bind_group(&mut self, group: BindGroupId) {
        if let Some(slot) = self.tables.bind_groups.get_mut(group.index()) {
            *slot = None;
        }
    }

    fn create_shader(&mut self, desc: &ShaderDesc<'_>) -> Result<ShaderId, RenderError> {
        let module = self
            .gpu
            .device()
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(desc.label),
                source: wgpu::ShaderSource::Wgsl(desc.source.into()),
            });
        log::debug!("shader `{}` compiled", desc.label);
        self.tables.shaders.push(module);
        Ok(ShaderId::from_index(self.tables.shaders.len() - 1))
    }

    fn create_pipeline(&mut self, desc: &PipelineDesc<'_>) -> Result<PipelineId, RenderError> {
        let tables = &self.tables;
        let device = self.gpu.device();

        let layout = match desc.layouts {
            Some(ids) => {
                let bgls = ids
                    .iter()
                    .map(|id| tables.layout(*id))
                    .collect::<Result<Vec<_>, _>>()?;
                Some(device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some(desc.label),
                    bind_group_layouts: &bgls,
                    immediate_size: 0,
                }))
            }
            None => None,
        };

        let attributes: Vec<Vec<wgpu::VertexAttribute>> = desc
            .vertex_buffers
            .iter()
            .map(|vb| {
                vb.attributes
                    .iter()
                    .map(|a| wgpu::VertexAttribute {
                        format: a.format,
                        offset: a.offset,
                        shader_location: a.location,
                    })
                    .collect()
            })
            .collect();
        let buffers: Vec<wgpu::VertexBufferLayout<'_>> = desc
            .vertex_buffers
            .iter()
            .zip(&attributes)
            .map(|(vb, attrs)| wgpu::VertexBufferLayout {
                array_stride: vb.stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: attrs,
            })
            .collect();

        let targets: Vec<Option<wgpu::ColorTargetState>> = desc
            .color_targets
            .iter()
            .map(|format| {
                Some(wgpu::ColorTargetState {
                    format: *format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })
            })
            .collect();

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: layout.as_ref(),

            vertex: wgpu::VertexState {
                module: tables.shader(desc.vertex)?,
                entry_point: Some(desc.entry_point),
                compilation_options: Default::default(),
                buffers: &buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: tables.shader(desc.fragment)?,
                entry_point: Some(desc.entry_point),
                compilation_options: Default::default(),
                targets: &targets,
            }),

            primitive: wgpu::PrimitiveState {
                topology: desc.topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: desc.cull_mode,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("pipeline `{}` built", desc.label);
        self.tables.pipelines.push(pipeline);
        Ok(PipelineId::from_index(self.tables.pipelines.len() - 1))
    }

    fn submit(&mut self, frame: FrameCommands) -> Result<Presented, RenderError> {
        // nothing to draw: flush queued writes without acquiring the surface
        if frame.is_empty() {
            self.gpu
                .submit_offscreen(self.gpu.encoder("marcher empty frame"));
            return Ok(Presented::Offscreen);
        }

        let mut target = match self.gpu.begin_frame() {
            Ok(target) => target,
            Err(err) => {
                return match self.gpu.handle_surface_error(&err) {
                    SurfaceErrorAction::Reconfigure | SurfaceErrorAction::SkipFrame => {
                        log::debug!("surface unavailable ({err}); frame dropped");
                        Ok(Presented::Skipped)
                    }
                    SurfaceErrorAction::Fatal => {
                        log::error!("surface error: {err}");
                        Err(RenderError::SurfaceFatal)
                    }
                };
            }
        };

        for record in &frame.passes {
            self.record_pass(&mut target.encoder, &target.view, record)?;
        }

        self.gpu.present(target);
        Ok(Presented::Shown)
    }
}
