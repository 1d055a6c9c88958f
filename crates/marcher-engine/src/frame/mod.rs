//! Per-frame protocol.
//!
//! [`Scheduler`] owns every long-lived renderer object and advances one frame
//! per [`Scheduler::tick`]:
//!
//! `Idle → ComputeCamera → UpdateUniforms → RecordPass → Submit → Present → Idle`
//!
//! Any host loop can drive it; the winit runtime in `window` is one such host.

mod bind_groups;
mod scheduler;
mod settings;
mod state;

/// Highest valid implicit-surface selector.
pub const SHAPE_ID_MAX: u32 = 10;

pub use scheduler::Scheduler;
pub use settings::{RenderMode, Settings, UnknownRenderMode};
pub use state::{FrameOutcome, FrameState};
