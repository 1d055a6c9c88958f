//! winit host.
//!
//! Owns the event loop and the window, keeps the surface-borrowing backend
//! alongside the window, and translates platform events into scheduler calls.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
