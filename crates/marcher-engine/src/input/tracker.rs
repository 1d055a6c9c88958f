use super::types::PointerEvent;

/// Tracks drag state and the last raw pointer delta.
///
/// While pressed, each move replaces the stored delta with the event's own
/// delta (no accumulation, smoothing or clamping). Moves while released are
/// ignored. The dirty flag marks a delta not yet copied to the GPU.
#[derive(Debug, Default, Clone)]
pub struct PointerTracker {
    pressed: bool,
    offset: [f32; 2],
    dirty: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_press(&mut self) {
        self.pressed = true;
    }

    /// Returns `true` when the delta was accepted.
    pub fn on_move(&mut self, dx: f32, dy: f32) -> bool {
        if !self.pressed {
            return false;
        }
        self.offset = [dx, dy];
        self.dirty = true;
        true
    }

    pub fn on_release(&mut self) {
        self.pressed = false;
    }

    /// Applies an event; returns `true` if a new delta is pending.
    pub fn apply(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Pressed => {
                self.on_press();
                false
            }
            PointerEvent::Moved { dx, dy } => self.on_move(dx, dy),
            PointerEvent::Released => {
                self.on_release();
                false
            }
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn offset(&self) -> [f32; 2] {
        self.offset
    }

    /// Whether a delta is waiting to be copied. Does not clear the flag.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the pending delta once, clearing the dirty flag.
    pub fn take_dirty(&mut self) -> Option<[f32; 2]> {
        if std::mem::take(&mut self.dirty) {
            Some(self.offset)
        } else {
            None
        }
    }
}
