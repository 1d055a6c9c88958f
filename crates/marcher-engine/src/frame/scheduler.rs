use rand::Rng;

use crate::bindings::LayoutRegistry;
use crate::error::RenderError;
use crate::gfx::{BindGroupId, FrameCommands, Presented, RenderBackend};
use crate::input::{PointerEvent, PointerTracker};
use crate::pipeline::Pipelines;
use crate::scene::{
    CameraUniform, GBufferTargets, MeshData, PointerOffsetUniform, PresentationSize, SceneConfig,
    SceneResources, ShapeUniform,
};
use crate::time::FrameTime;

use super::bind_groups;
use super::settings::{RenderMode, Settings, check_shape};
use super::state::{FrameOutcome, FrameState};

/// Vertices of the full-screen quad.
const QUAD_VERTICES: u32 = 6;

/// Owns the renderer's resources and drives the per-frame protocol.
///
/// Single-threaded: every method runs on the host's loop. All GPU access goes
/// through the backend passed in, so the same scheduler runs against wgpu or
/// an in-memory backend.
#[derive(Debug)]
pub struct Scheduler {
    registry: LayoutRegistry,
    resources: SceneResources,
    pipelines: Pipelines,
    /// Ray-marching sets by slot: targets, lights, canvas, pointer.
    bind_groups: [BindGroupId; 4],

    settings: Settings,
    pointer: PointerTracker,

    state: FrameState,
    attached: bool,
}

impl Scheduler {
    /// Allocates every resource, layout, pipeline and binding set.
    ///
    /// Fails fatally on invalid input or a structural mismatch; nothing is
    /// created when size, light count, mesh or shape selector are invalid.
    pub fn new<B, R>(
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
        let resources = SceneResources::allocate(backend, config, mesh, size, rng)?;
        let registry = LayoutRegistry::create(backend)?;
        let pipelines = Pipelines::build(backend, &registry)?;
        let bind_groups = bind_groups::raymarch(backend, &registry, &resources)?;

        log::info!(
            "scheduler ready: mode `{}`, shape {}",
            config.settings.mode,
            config.settings.shape_id
        );

        Ok(Self {
            registry,
            resources,
            pipelines,
            bind_groups,
            settings: config.settings,
            pointer: PointerTracker::new(),
            state: FrameState::Idle,
            attached: true,
        })
    }

    /// Advances one frame.
    ///
    /// Returns `Stopped` without touching the backend once the view is
    /// detached.
    pub fn tick<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        time: FrameTime,
    ) -> Result<FrameOutcome, RenderError> {
        if !self.attached {
            return Ok(FrameOutcome::Stopped);
        }

        let result = self.run_frame(backend, time);
        if result.is_err() {
            self.state = FrameState::Idle;
        }
        result
    }

    fn run_frame<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        time: FrameTime,
    ) -> Result<FrameOutcome, RenderError> {
        self.enter(FrameState::ComputeCamera, time);
        let view_proj = self.resources.orbit.view_proj(time.elapsed);

        self.enter(FrameState::UpdateUniforms, time);
        backend.write_buffer(
            self.resources.camera,
            0,
            bytemuck::bytes_of(&CameraUniform::new(view_proj)),
        )?;
        self.flush_pointer(backend)?;

        self.enter(FrameState::RecordPass, time);
        let frame = self.record();

        self.enter(FrameState::Submit, time);
        let presented = backend.submit(frame)?;

        self.enter(FrameState::Present, time);
        let outcome = match presented {
            Presented::Shown => FrameOutcome::Presented,
            Presented::Offscreen => FrameOutcome::Submitted,
            Presented::Skipped => {
                log::warn!("frame {} skipped: surface unavailable", time.frame_index);
                FrameOutcome::Skipped
            }
        };

        self.enter(FrameState::Idle, time);
        Ok(outcome)
    }

    fn enter(&mut self, next: FrameState, time: FrameTime) {
        log::trace!("frame {}: {:?} -> {:?}", time.frame_index, self.state, next);
        self.state = next;
    }

    /// Records this frame's passes for the current mode.
    fn record(&self) -> FrameCommands {
        let mut frame = FrameCommands::new();

        match self.settings.mode {
            RenderMode::RayMarch => {
                let mut pass = frame.begin_pass("raymarch", wgpu::Color::BLACK);
                pass.set_pipeline(self.pipelines.raymarch);
                for (slot, group) in self.bind_groups.iter().enumerate() {
                    pass.set_bind_group(slot as u32, *group);
                }
                pass.draw(0..QUAD_VERTICES, 0..1);
                pass.end();
            }
            RenderMode::EnvironmentMapping => {}
        }

        frame
    }

    fn flush_pointer<B: RenderBackend>(&mut self, backend: &mut B) -> Result<(), RenderError> {
        if let Some(offset) = self.pointer.take_dirty() {
            backend.write_buffer(
                self.resources.pointer_offset,
                0,
                bytemuck::bytes_of(&PointerOffsetUniform { offset }),
            )?;
        }
        Ok(())
    }

    /// Feeds a pointer event. An accepted move is copied to the GPU at once,
    /// outside the frame cadence.
    pub fn handle_pointer<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        event: PointerEvent,
    ) -> Result<(), RenderError> {
        if !self.attached {
            return Ok(());
        }
        if self.pointer.apply(event) {
            self.flush_pointer(backend)?;
        }
        Ok(())
    }

    /// Selects the implicit surface and writes the selector uniform.
    ///
    /// Out-of-range values are rejected and leave the GPU value untouched.
    pub fn set_shape_id<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        shape_id: u32,
    ) -> Result<(), RenderError> {
        let shape_id = check_shape(shape_id)?;
        backend.write_buffer(
            self.resources.shape,
            0,
            bytemuck::bytes_of(&ShapeUniform { shape_id }),
        )?;
        self.settings.shape_id = shape_id;
        log::debug!("shape selector set to {shape_id}");
        Ok(())
    }

    pub fn set_mode(&mut self, mode: RenderMode) {
        if self.settings.mode != mode {
            log::info!("render mode `{}` -> `{}`", self.settings.mode, mode);
        }
        self.settings.mode = mode;
    }

    /// Recreates the image targets at the new size and rebinds them. The
    /// previous targets and their binding set are released.
    ///
    /// The canvas-size uniform and the projection keep their initial values.
    pub fn resize<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let size = PresentationSize::new(width, height)?;
        if size == self.resources.size() {
            return Ok(());
        }

        let targets = GBufferTargets::create(backend, size)?;
        let group = bind_groups::gbuffer(backend, &self.registry, &targets)?;

        let old_group = std::mem::replace(&mut self.bind_groups[0], group);
        backend.release_bind_group(old_group);
        let old = std::mem::replace(&mut self.resources.targets, targets);
        old.release(backend);

        log::debug!("image targets recreated at {width}x{height}");
        Ok(())
    }

    /// Marks the owning view as gone. Later ticks return `Stopped`.
    pub fn detach(&mut self) {
        if self.attached {
            log::info!("view detached; frame loop stopping");
        }
        self.attached = false;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    pub fn resources(&self) -> &SceneResources {
        &self.resources
    }

    pub fn pipelines(&self) -> &Pipelines {
        &self.pipelines
    }

    pub fn registry(&self) -> &LayoutRegistry {
        &self.registry
    }

    pub fn bind_groups(&self) -> &[BindGroupId; 4] {
        &self.bind_groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::LayoutKind;
    use crate::gfx::Command;
    use crate::gfx::mock::RecordingBackend;
    use crate::scene::{CanvasSizeUniform, ModelUniform};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::time::Duration;

    fn config() -> SceneConfig {
        SceneConfig {
            light_count: 1,
            seed: Some(7),
            ..SceneConfig::default()
        }
    }

    fn setup() -> (RecordingBackend, Scheduler) {
        let mut backend = RecordingBackend::new();
        let mut rng = StdRng::seed_from_u64(7);
        let scheduler = Scheduler::new(
            &mut backend,
            &config(),
            &MeshData::quad(10.0),
            (100, 100),
            &mut rng,
        )
        .unwrap();
        (backend, scheduler)
    }

    fn at(ms: u64, frame_index: u64) -> FrameTime {
        FrameTime {
            frame_index,
            ..FrameTime::at(Duration::from_millis(ms))
        }
    }

    // ── end to end ────────────────────────────────────────────────────────

    #[test]
    fn one_pass_with_one_six_vertex_draw_per_frame() {
        let (mut backend, mut s) = setup();
        for i in 0..3 {
            let outcome = s.tick(&mut backend, at(16 * i, i)).unwrap();
            assert_eq!(outcome, FrameOutcome::Presented);
        }

        assert_eq!(backend.submitted.len(), 3);
        for frame in &backend.submitted {
            assert_eq!(frame.passes.len(), 1);
            let pass = &frame.passes[0];
            assert_eq!(pass.clear, wgpu::Color::BLACK);
            assert_eq!(pass.draw_count(), 1);
            assert!(pass.commands.contains(&Command::Draw {
                vertices: 0..6,
                instances: 0..1
            }));
        }
        assert_eq!(s.state(), FrameState::Idle);
    }

    #[test]
    fn pass_binds_pipeline_then_sets_in_slot_order() {
        let (mut backend, mut s) = setup();
        s.tick(&mut backend, at(0, 0)).unwrap();

        let commands = &backend.submitted[0].passes[0].commands;
        assert_eq!(commands[0], Command::SetPipeline(s.pipelines().raymarch));
        for slot in 0..4 {
            assert_eq!(
                commands[1 + slot],
                Command::SetBindGroup {
                    slot: slot as u32,
                    group: s.bind_groups()[slot]
                }
            );
        }
        assert!(matches!(commands[5], Command::Draw { .. }));
        assert_eq!(commands.len(), 6);
    }

    #[test]
    fn bound_sets_match_their_layouts() {
        let (backend, s) = setup();
        for (slot, kind) in Pipelines::RAYMARCH_SLOTS.iter().enumerate() {
            let set = &backend.bind_groups[s.bind_groups()[slot].index()];
            assert_eq!(set.layout(), s.registry().id(*kind));
        }
        assert_ne!(
            backend.bind_groups[s.bind_groups()[0].index()].layout(),
            s.registry().id(LayoutKind::TextureSampler)
        );
    }

    // ── uniforms ──────────────────────────────────────────────────────────

    #[test]
    fn camera_changes_every_frame_model_never_rewritten() {
        let (mut backend, mut s) = setup();
        let camera = s.resources().camera;
        let model = s.resources().model;

        let model_before: ModelUniform = backend.read(model);
        let model_writes = backend.writes_to(model);

        let mut last: CameraUniform = backend.read(camera);
        for i in 1..5 {
            s.tick(&mut backend, at(16 * i, i)).unwrap();
            let now: CameraUniform = backend.read(camera);
            assert_ne!(now, last);
            last = now;
        }

        assert_eq!(backend.writes_to(camera), 1 + 4);
        assert_eq!(backend.writes_to(model), model_writes);
        assert_eq!(backend.read::<ModelUniform>(model), model_before);
    }

    #[test]
    fn camera_block_holds_orbit_matrix() {
        let (mut backend, mut s) = setup();
        s.tick(&mut backend, at(2500, 0)).unwrap();
        let expected = CameraUniform::new(
            s.resources()
                .orbit
                .view_proj(Duration::from_millis(2500)),
        );
        assert_eq!(backend.read::<CameraUniform>(s.resources().camera), expected);
    }

    // ── pointer ───────────────────────────────────────────────────────────

    #[test]
    fn pointer_block_follows_drag() {
        let (mut backend, mut s) = setup();
        let buf = s.resources().pointer_offset;

        s.tick(&mut backend, at(0, 0)).unwrap();
        assert_eq!(backend.read::<PointerOffsetUniform>(buf).offset, [0.0, 0.0]);

        s.handle_pointer(&mut backend, PointerEvent::Pressed).unwrap();
        s.handle_pointer(&mut backend, PointerEvent::Moved { dx: 5.0, dy: -3.0 })
            .unwrap();
        // written before the next frame
        assert_eq!(backend.read::<PointerOffsetUniform>(buf).offset, [5.0, -3.0]);
        s.handle_pointer(&mut backend, PointerEvent::Released).unwrap();

        s.handle_pointer(&mut backend, PointerEvent::Moved { dx: 9.0, dy: 9.0 })
            .unwrap();
        s.tick(&mut backend, at(16, 1)).unwrap();

        assert_eq!(backend.read::<PointerOffsetUniform>(buf).offset, [5.0, -3.0]);
        assert_eq!(backend.writes_to(buf), 1);
    }

    #[test]
    fn pointer_without_press_never_writes() {
        let (mut backend, mut s) = setup();
        let buf = s.resources().pointer_offset;
        s.handle_pointer(&mut backend, PointerEvent::Moved { dx: 1.0, dy: 1.0 })
            .unwrap();
        s.tick(&mut backend, at(0, 0)).unwrap();
        assert_eq!(backend.writes_to(buf), 0);
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn detached_view_stops_without_work() {
        let (mut backend, mut s) = setup();
        s.tick(&mut backend, at(0, 0)).unwrap();
        let writes = backend.writes.len();

        s.detach();
        assert_eq!(s.tick(&mut backend, at(16, 1)).unwrap(), FrameOutcome::Stopped);
        assert_eq!(backend.submitted.len(), 1);
        assert_eq!(backend.writes.len(), writes);
        assert_eq!(s.state(), FrameState::Idle);
    }

    #[test]
    fn environment_mode_submits_empty_frame() {
        let (mut backend, mut s) = setup();
        s.set_mode(RenderMode::EnvironmentMapping);
        assert_eq!(
            s.tick(&mut backend, at(0, 0)).unwrap(),
            FrameOutcome::Submitted
        );
        assert!(backend.submitted[0].is_empty());

        s.set_mode(RenderMode::RayMarch);
        assert_eq!(
            s.tick(&mut backend, at(16, 1)).unwrap(),
            FrameOutcome::Presented
        );
        assert_eq!(backend.submitted[1].passes.len(), 1);
    }

    #[test]
    fn resize_recreates_targets_but_keeps_canvas_size() {
        let (mut backend, mut s) = setup();
        let canvas = s.resources().canvas_size;
        let canvas_writes = backend.writes_to(canvas);
        let old_group = s.bind_groups()[0];

        s.resize(&mut backend, 200, 50).unwrap();

        assert_eq!(s.resources().size(), PresentationSize::new(200, 50).unwrap());
        assert_ne!(s.bind_groups()[0], old_group);
        assert_eq!(backend.released_bind_groups, vec![old_group]);
        assert_eq!(backend.textures.len(), 4);
        assert!(backend.textures[..2].iter().all(|t| t.released));
        assert!(backend.textures[2..].iter().all(|t| !t.released && t.width == 200));

        assert_eq!(backend.writes_to(canvas), canvas_writes);
        assert_eq!(
            backend.read::<CanvasSizeUniform>(canvas).size,
            [100.0, 100.0]
        );

        s.tick(&mut backend, at(0, 0)).unwrap();
        let commands = &backend.submitted[0].passes[0].commands;
        assert!(commands.contains(&Command::SetBindGroup {
            slot: 0,
            group: s.bind_groups()[0]
        }));
    }

    #[test]
    fn repeated_resizes_keep_live_resources_constant() {
        let (mut backend, mut s) = setup();
        assert_eq!(backend.live_bind_groups(), 4);
        assert_eq!(backend.live_textures(), 2);

        for i in 0..100 {
            s.resize(&mut backend, 200 + i, 100 + i % 7).unwrap();
        }

        assert_eq!(backend.live_bind_groups(), 4);
        assert_eq!(backend.live_textures(), 2);
        for group in s.bind_groups() {
            assert!(!backend.released_bind_groups.contains(group));
        }
    }

    #[test]
    fn resize_to_same_size_creates_nothing() {
        let (mut backend, mut s) = setup();
        let count = backend.resource_count();
        s.resize(&mut backend, 100, 100).unwrap();
        assert_eq!(backend.resource_count(), count);
        assert!(backend.released_bind_groups.is_empty());
    }

    #[test]
    fn resize_to_zero_is_rejected() {
        let (mut backend, mut s) = setup();
        let textures = backend.textures.len();
        assert!(matches!(
            s.resize(&mut backend, 0, 10),
            Err(RenderError::InvalidSize { .. })
        ));
        assert_eq!(backend.textures.len(), textures);
    }

    // ── settings ──────────────────────────────────────────────────────────

    #[test]
    fn shape_setter_writes_selector() {
        let (mut backend, mut s) = setup();
        let shape = s.resources().shape;
        s.set_shape_id(&mut backend, 7).unwrap();
        assert_eq!(backend.read::<ShapeUniform>(shape).shape_id, 7);
        assert_eq!(s.settings().shape_id, 7);
    }

    #[test]
    fn out_of_range_shape_writes_nothing() {
        let (mut backend, mut s) = setup();
        let shape = s.resources().shape;
        assert!(matches!(
            s.set_shape_id(&mut backend, 11),
            Err(RenderError::ShapeOutOfRange(11))
        ));
        assert_eq!(backend.writes_to(shape), 0);
        assert_eq!(backend.read::<ShapeUniform>(shape).shape_id, 0);
    }

    #[test]
    fn invalid_initial_shape_fails_before_allocation() {
        let mut backend = RecordingBackend::new();
        let mut cfg = config();
        cfg.settings.shape_id = 42;
        let err = Scheduler::new(
            &mut backend,
            &cfg,
            &MeshData::quad(1.0),
            (10, 10),
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::ShapeOutOfRange(42)));
        assert_eq!(backend.resource_count(), 0);
    }
}
