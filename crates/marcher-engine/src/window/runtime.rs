use anyhow::{Context, Result};
use ouroboros::self_referencing;
use rand::SeedableRng;
use rand::rngs::StdRng;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::device::{Gpu, GpuInit, WgpuBackend};
use crate::frame::{FrameOutcome, SHAPE_ID_MAX, Scheduler};
use crate::input::PointerEvent;
use crate::scene::{MeshData, SceneConfig};
use crate::time::FrameClock;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "marcher".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Entry point: opens one window and drives the scheduler from its redraws.
pub struct Runtime;

impl Runtime {
    /// Runs until the window closes, Escape is pressed, or a fatal error occurs.
    pub fn run(
        config: RuntimeConfig,
        gpu_init: GpuInit,
        scene: SceneConfig,
        mesh: MeshData,
    ) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState {
            setup: Setup {
                config,
                gpu_init,
                scene,
                mesh,
            },
            entry: None,
            fatal: None,
        };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct Setup {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    scene: SceneConfig,
    mesh: MeshData,
}

/// Backend and scheduler for one window.
struct Viewer<'w> {
    backend: WgpuBackend<'w>,
    scheduler: Scheduler,
}

#[self_referencing]
struct WindowEntry {
    clock: FrameClock,
    last_cursor: Option<PhysicalPosition<f64>>,

    window: Window,

    #[borrows(window)]
    #[covariant]
    view: Viewer<'this>,
}

fn build_viewer<'w>(window: &'w Window, setup: &Setup) -> Result<Viewer<'w>> {
    let gpu = pollster::block_on(Gpu::new(window, setup.gpu_init.clone()))?;
    let mut backend = WgpuBackend::new(gpu);

    let mut rng = match setup.scene.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let size = window.inner_size();
    let scheduler = Scheduler::new(
        &mut backend,
        &setup.scene,
        &setup.mesh,
        (size.width, size.height),
        &mut rng,
    )
    .context("renderer setup failed")?;

    Ok(Viewer { backend, scheduler })
}

struct AppState {
    setup: Setup,
    entry: Option<WindowEntry>,
    /// First fatal error; returned from `Runtime::run`.
    fatal: Option<anyhow::Error>,
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        self.shutdown(event_loop);
    }

    /// Detaches the view, drops the window and leaves the loop.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut entry) = self.entry.take() {
            entry.with_view_mut(|view| view.scheduler.detach());
        }
        event_loop.exit();
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.setup.config.title.clone())
            .with_inner_size(self.setup.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        WindowEntry::try_new(FrameClock::new(), None, window, |w| {
            build_viewer(w, &self.setup)
        })
    }

    fn resize(&mut self, event_loop: &ActiveEventLoop, size: PhysicalSize<u32>) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        let result = entry.with_view_mut(|view| {
            view.backend.resize(size);
            if size.width == 0 || size.height == 0 {
                return Ok(());
            }
            view.scheduler
                .resize(&mut view.backend, size.width, size.height)
        });
        entry.with_window(|w| w.request_redraw());

        if let Err(err) = result {
            self.fail(event_loop, anyhow::Error::new(err).context("resize failed"));
        }
    }

    fn pointer(&mut self, event_loop: &ActiveEventLoop, event: PointerEvent) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };
        let result = entry.with_view_mut(|view| {
            view.scheduler.handle_pointer(&mut view.backend, event)
        });
        if let Err(err) = result {
            self.fail(event_loop, err.into());
        }
    }

    fn key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        if code == KeyCode::Escape {
            self.shutdown(event_loop);
            return;
        }

        let Some(entry) = self.entry.as_mut() else {
            return;
        };
        let result = entry.with_view_mut(|view| {
            let scheduler = &mut view.scheduler;
            let shape = scheduler.settings().shape_id;
            match code {
                KeyCode::ArrowUp => {
                    scheduler.set_shape_id(&mut view.backend, shape_step(shape, true))
                }
                KeyCode::ArrowDown => {
                    scheduler.set_shape_id(&mut view.backend, shape_step(shape, false))
                }
                KeyCode::KeyM => {
                    scheduler.set_mode(scheduler.settings().mode.toggled());
                    Ok(())
                }
                _ => Ok(()),
            }
        });
        if let Err(err) = result {
            self.fail(event_loop, err.into());
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        let result = entry.with_mut(|fields| {
            let time = fields.clock.tick();
            fields
                .view
                .scheduler
                .tick(&mut fields.view.backend, time)
        });

        match result {
            Ok(FrameOutcome::Stopped) => self.shutdown(event_loop),
            Ok(_) => {}
            Err(err) => self.fail(event_loop, anyhow::Error::new(err).context("frame failed")),
        }
    }
}

/// Next shape selector for an up/down key, saturating at the range ends.
fn shape_step(current: u32, up: bool) -> u32 {
    if up {
        (current + 1).min(SHAPE_ID_MAX)
    } else {
        current.saturating_sub(1)
    }
}

/// Per-event delta between two cursor positions.
fn cursor_delta(
    last: Option<PhysicalPosition<f64>>,
    now: PhysicalPosition<f64>,
) -> Option<(f32, f32)> {
    last.map(|prev| ((now.x - prev.x) as f32, (now.y - prev.y) as f32))
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        match self.create_window_entry(event_loop) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.entry = Some(entry);
            }
            Err(err) => self.fail(event_loop, err.context("failed to create initial window")),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // continuous animation
        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };
        if entry.with_window(|w| w.id()) != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => self.shutdown(event_loop),

            WindowEvent::Resized(size) => self.resize(event_loop, size),

            WindowEvent::ScaleFactorChanged { .. } => {
                let size = entry.with_window(|w| w.inner_size());
                self.resize(event_loop, size);
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let event = match state {
                    ElementState::Pressed => PointerEvent::Pressed,
                    ElementState::Released => PointerEvent::Released,
                };
                self.pointer(event_loop, event);
            }

            WindowEvent::CursorMoved { position, .. } => {
                let delta = entry.with_mut(|fields| {
                    let delta = cursor_delta(*fields.last_cursor, position);
                    *fields.last_cursor = Some(position);
                    delta
                });
                if let Some((dx, dy)) = delta {
                    self.pointer(event_loop, PointerEvent::Moved { dx, dy });
                }
            }

            WindowEvent::CursorLeft { .. } => {
                entry.with_last_cursor_mut(|last| *last = None);
                self.pointer(event_loop, PointerEvent::Released);
            }

            WindowEvent::KeyboardInput { event, .. } => self.key(event_loop, &event),

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_step_saturates() {
        assert_eq!(shape_step(0, false), 0);
        assert_eq!(shape_step(0, true), 1);
        assert_eq!(shape_step(SHAPE_ID_MAX, true), SHAPE_ID_MAX);
        assert_eq!(shape_step(SHAPE_ID_MAX, false), SHAPE_ID_MAX - 1);
    }

    #[test]
    fn first_cursor_position_has_no_delta() {
        assert_eq!(cursor_delta(None, PhysicalPosition::new(10.0, 10.0)), None);
    }

    #[test]
    fn cursor_delta_is_per_event() {
        let d = cursor_delta(
            Some(PhysicalPosition::new(10.0, 20.0)),
            PhysicalPosition::new(15.0, 17.0),
        );
        assert_eq!(d, Some((5.0, -3.0)));
    }

    #[test]
    fn default_window_config() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.title, "marcher");
        assert_eq!(cfg.initial_size, LogicalSize::new(1280.0, 720.0));
    }
}
