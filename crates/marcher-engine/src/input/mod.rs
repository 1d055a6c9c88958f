//! Pointer input.
//!
//! Platform-agnostic: the runtime translates winit events into
//! `PointerEvent`s carrying per-event deltas.

mod tracker;
mod types;

pub use tracker::PointerTracker;
pub use types::PointerEvent;
