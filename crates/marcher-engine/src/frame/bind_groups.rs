use crate::bindings::{BindingResource, BindingSet, LayoutKind, LayoutRegistry};
use crate::error::RenderError;
use crate::gfx::{BindGroupId, RenderBackend};
use crate::scene::{GBufferTargets, SceneResources};

/// Binding set over the three image-target views.
pub(super) fn gbuffer<B: RenderBackend>(
    backend: &mut B,
    registry: &LayoutRegistry,
    targets: &GBufferTargets,
) -> Result<BindGroupId, RenderError> {
    let [normal, position, albedo] = targets.views;
    let set = BindingSet::new(
        "gbuffer textures",
        registry.get(LayoutKind::GBufferTextures),
        vec![
            (0, BindingResource::Texture(normal)),
            (1, BindingResource::Texture(position)),
            (2, BindingResource::Texture(albedo)),
        ],
    )?;
    backend.create_bind_group(&set)
}

/// The four sets of the ray-marching pass, indexed by bind slot.
pub(super) fn raymarch<B: RenderBackend>(
    backend: &mut B,
    registry: &LayoutRegistry,
    resources: &SceneResources,
) -> Result<[BindGroupId; 4], RenderError> {
    let gbuffer = gbuffer(backend, registry, &resources.targets)?;

    let lights = BindingSet::new(
        "lights",
        registry.get(LayoutKind::Lights),
        vec![
            (0, BindingResource::ReadOnlyStorage(resources.lights)),
            (1, BindingResource::Uniform(resources.shape)),
        ],
    )?;
    let canvas = BindingSet::new(
        "canvas size",
        registry.get(LayoutKind::CanvasSize),
        vec![(0, BindingResource::Uniform(resources.canvas_size))],
    )?;
    let pointer = BindingSet::new(
        "pointer offset",
        registry.get(LayoutKind::PointerOffset),
        vec![(0, BindingResource::Uniform(resources.pointer_offset))],
    )?;

    Ok([
        gbuffer,
        backend.create_bind_group(&lights)?,
        backend.create_bind_group(&canvas)?,
        backend.create_bind_group(&pointer)?,
    ])
}
