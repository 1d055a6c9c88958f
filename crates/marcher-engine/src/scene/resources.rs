use rand::Rng;
use std::time::Duration;

use crate::error::RenderError;
use crate::gfx::{BufferDesc, BufferId, BufferInitDesc, RenderBackend};

use super::camera::OrbitCamera;
use super::config::SceneConfig;
use super::lights::{LightRecord, MAX_LIGHTS, generate_lights};
use super::mesh::MeshData;
use super::targets::{GBufferTargets, PresentationSize};
use super::uniforms::{
    CameraUniform, CanvasSizeUniform, ModelUniform, PointerOffsetUniform, ShapeUniform,
};

/// Vertex and index buffers of the single mesh.
#[derive(Debug, Copy, Clone)]
pub struct MeshBuffers {
    pub vertex: BufferId,
    pub index: BufferId,
    pub index_count: u32,
}

/// Every static GPU resource of the scene.
///
/// Buffers are created once; only the image targets are replaced (on resize).
#[derive(Debug, Clone)]
pub struct SceneResources {
    pub mesh: MeshBuffers,
    pub lights: BufferId,
    pub light_count: u32,

    pub camera: BufferId,
    pub model: BufferId,
    pub canvas_size: BufferId,
    pub pointer_offset: BufferId,
    pub shape: BufferId,

    pub targets: GBufferTargets,
    pub orbit: OrbitCamera,
}

fn uniform_desc<T>(label: &str) -> BufferDesc<'_> {
    BufferDesc {
        label,
        size: std::mem::size_of::<T>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    }
}

impl SceneResources {
    /// Creates and populates all static resources.
    ///
    /// Size, light count and mesh are checked up front, so a rejected call
    /// leaves the backend untouched.
    pub fn allocate<B, R>(
        backend: &mut B,
        config: &SceneConfig,
        mesh: &MeshData,
        size: (u32, u32),
        rng: &mut R,
    ) -> Result<Self, RenderError>
    where
        B: RenderBackend,
        R: Rng + ?Sized,
    {
        let size = PresentationSize::new(size.0, size.1)?;
        if config.light_count == 0 || config.light_count > MAX_LIGHTS {
            return Err(RenderError::InvalidLightCount {
                requested: config.light_count,
                max: MAX_LIGHTS,
            });
        }
        mesh.validate()?;
        let shape_id = config.settings.validated_shape()?;

        // static geometry, one bulk copy each
        let vertices = mesh.packed_vertices();
        let indices = mesh.packed_indices();
        let vertex = backend.create_buffer_init(&BufferInitDesc {
            label: "mesh vertices",
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        })?;
        let index = backend.create_buffer_init(&BufferInitDesc {
            label: "mesh indices",
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        })?;

        let records: Vec<LightRecord> =
            generate_lights(rng, config.light_count, &config.light_extent);
        let lights = backend.create_buffer_init(&BufferInitDesc {
            label: "lights",
            contents: bytemuck::cast_slice(&records),
            usage: wgpu::BufferUsages::STORAGE,
        })?;

        let shape = backend.create_buffer_init(&BufferInitDesc {
            label: "shape selector",
            contents: bytemuck::bytes_of(&ShapeUniform { shape_id }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })?;

        let camera = backend.create_buffer(&uniform_desc::<CameraUniform>("camera"))?;
        let model = backend.create_buffer(&uniform_desc::<ModelUniform>("model"))?;
        let canvas_size =
            backend.create_buffer(&uniform_desc::<CanvasSizeUniform>("canvas size"))?;
        let pointer_offset =
            backend.create_buffer(&uniform_desc::<PointerOffsetUniform>("pointer offset"))?;

        let targets = GBufferTargets::create(backend, size)?;

        let orbit = OrbitCamera::new(size.aspect());
        backend.write_buffer(
            camera,
            0,
            bytemuck::bytes_of(&CameraUniform::new(orbit.view_proj(Duration::ZERO))),
        )?;
        backend.write_buffer(model, 0, bytemuck::bytes_of(&ModelUniform::centered()))?;
        backend.write_buffer(
            canvas_size,
            0,
            bytemuck::bytes_of(&CanvasSizeUniform {
                size: [size.width() as f32, size.height() as f32],
            }),
        )?;

        log::info!(
            "scene resources allocated: {} vertices, {} indices, {} lights, {}x{}",
            mesh.positions.len(),
            indices.len(),
            config.light_count,
            size.width(),
            size.height()
        );

        Ok(Self {
            mesh: MeshBuffers {
                vertex,
                index,
                index_count: mesh.index_count(),
            },
            lights,
            light_count: config.light_count,
            camera,
            model,
            canvas_size,
            pointer_offset,
            shape,
            targets,
            orbit,
        })
    }

    pub fn size(&self) -> PresentationSize {
        self.targets.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::mock::RecordingBackend;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn config(lights: u32) -> SceneConfig {
        SceneConfig {
            light_count: lights,
            seed: Some(1),
            ..SceneConfig::default()
        }
    }

    fn allocate(
        backend: &mut RecordingBackend,
        config: &SceneConfig,
        size: (u32, u32),
    ) -> Result<SceneResources, RenderError> {
        let mut rng = StdRng::seed_from_u64(1);
        SceneResources::allocate(backend, config, &MeshData::quad(10.0), size, &mut rng)
    }

    // ── rejection before allocation ───────────────────────────────────────

    #[test]
    fn zero_size_allocates_nothing() {
        let mut backend = RecordingBackend::new();
        for size in [(0, 100), (100, 0), (0, 0)] {
            let err = allocate(&mut backend, &config(1), size).unwrap_err();
            assert!(matches!(err, RenderError::InvalidSize { .. }));
        }
        assert_eq!(backend.resource_count(), 0);
        assert!(backend.writes.is_empty());
    }

    #[test]
    fn light_count_bounds_are_checked() {
        let mut backend = RecordingBackend::new();
        for n in [0, MAX_LIGHTS + 1] {
            let err = allocate(&mut backend, &config(n), (10, 10)).unwrap_err();
            assert!(matches!(err, RenderError::InvalidLightCount { requested, .. } if requested == n));
        }
        assert_eq!(backend.resource_count(), 0);
    }

    #[test]
    fn invalid_mesh_allocates_nothing() {
        let mut backend = RecordingBackend::new();
        let mut rng = StdRng::seed_from_u64(0);
        let err = SceneResources::allocate(
            &mut backend,
            &config(1),
            &MeshData::default(),
            (10, 10),
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::InvalidMesh(_)));
        assert_eq!(backend.resource_count(), 0);
    }

    // ── populated contents ────────────────────────────────────────────────

    #[test]
    fn static_data_is_populated_at_creation() {
        let mut backend = RecordingBackend::new();
        let res = allocate(&mut backend, &config(3), (100, 100)).unwrap();

        let vertex = backend.buffer(res.mesh.vertex);
        assert!(vertex.initialised_at_creation);
        assert_eq!(vertex.data.len(), 4 * 32);
        assert_eq!(res.mesh.index_count, 6);
        assert!(backend.buffer(res.mesh.index).initialised_at_creation);

        let lights = backend.buffer(res.lights);
        assert!(lights.initialised_at_creation);
        assert_eq!(lights.data.len(), 3 * std::mem::size_of::<LightRecord>());
        assert_eq!(backend.writes_to(res.lights), 0);
        assert_eq!(backend.writes_to(res.mesh.vertex), 0);
    }

    #[test]
    fn light_records_respect_extent() {
        let mut backend = RecordingBackend::new();
        let cfg = config(64);
        let res = allocate(&mut backend, &cfg, (10, 10)).unwrap();
        let records: Vec<LightRecord> =
            bytemuck::pod_collect_to_vec(&backend.buffer(res.lights).data);
        assert_eq!(records.len(), 64);
        for l in &records {
            for axis in 0..3 {
                assert!(l.position[axis] >= cfg.light_extent.min[axis]);
                assert!(l.position[axis] <= cfg.light_extent.max[axis]);
            }
            assert_eq!(l.radius, 20.0);
        }
    }

    #[test]
    fn uniforms_start_with_expected_values() {
        let mut backend = RecordingBackend::new();
        let res = allocate(&mut backend, &config(1), (320, 200)).unwrap();

        let canvas: CanvasSizeUniform = backend.read(res.canvas_size);
        assert_eq!(canvas.size, [320.0, 200.0]);

        let model: ModelUniform = backend.read(res.model);
        assert_eq!(model, ModelUniform::centered());

        let pointer: PointerOffsetUniform = backend.read(res.pointer_offset);
        assert_eq!(pointer.offset, [0.0, 0.0]);
        assert_eq!(backend.writes_to(res.pointer_offset), 0);

        let shape: ShapeUniform = backend.read(res.shape);
        assert_eq!(shape.shape_id, 0);

        let camera: CameraUniform = backend.read(res.camera);
        assert_eq!(
            camera,
            CameraUniform::new(res.orbit.view_proj(Duration::ZERO))
        );
    }

    #[test]
    fn targets_match_presentation_size() {
        let mut backend = RecordingBackend::new();
        let res = allocate(&mut backend, &config(1), (100, 50)).unwrap();
        assert_eq!(res.size(), PresentationSize::new(100, 50).unwrap());
        assert!(backend.textures.iter().all(|t| t.width == 100 && t.height == 50));
    }
}
