//! Frame timing.
//!
//! One `FrameClock` per render loop; call `tick()` once per redraw and hand
//! the resulting `FrameTime` to the scheduler.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
