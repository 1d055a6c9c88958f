/// Pointer event as seen by the renderer.
///
/// Deltas are in physical pixels, relative to the previous move event.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PointerEvent {
    /// Primary button went down.
    Pressed,
    Moved { dx: f32, dy: f32 },
    /// Primary button went up, or the pointer left the view.
    Released,
}
