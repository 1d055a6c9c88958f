use thiserror::Error;

use crate::bindings::SlotKind;

/// Errors raised while setting up or driving the renderer.
///
/// Every variant is a setup-time or fatal condition. Benign runtime conditions
/// (a detached view, a lost surface that was reconfigured) are reported through
/// `FrameOutcome` instead.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid presentation size {width}x{height}; both axes must be non-zero")]
    InvalidSize { width: u32, height: u32 },

    #[error("light count {requested} outside 1..={max}")]
    InvalidLightCount { requested: u32, max: u32 },

    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("binding set `{set}` does not match layout `{layout}`: {reason}")]
    BindingMismatch {
        set: String,
        layout: &'static str,
        reason: BindingMismatch,
    },

    #[error("unknown {kind} handle #{index}")]
    InvalidHandle { kind: &'static str, index: u32 },

    #[error("shape id {0} outside 0..={max}", max = crate::frame::SHAPE_ID_MAX)]
    ShapeOutOfRange(u32),

    #[error("surface failed beyond recovery")]
    SurfaceFatal,
}

/// Structural difference between a binding set and its declared layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BindingMismatch {
    #[error("expected {expected} resources, found {found}")]
    Count { expected: usize, found: usize },

    #[error("entry {position} targets slot {found}, layout declares slot {expected}")]
    Slot {
        position: usize,
        expected: u32,
        found: u32,
    },

    #[error("slot {slot} expects {expected:?}, found {found:?}")]
    Kind {
        slot: u32,
        expected: SlotKind,
        found: SlotKind,
    },
}
