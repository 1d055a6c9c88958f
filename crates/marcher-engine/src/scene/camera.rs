use std::f64::consts::{PI, TAU};
use std::time::Duration;

use glam::{Mat3, Mat4, Vec3};

/// Camera orbiting the origin about the up axis, one half turn per 5 s.
///
/// The projection is fixed at construction; only the eye moves.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    eye: Vec3,
    target: Vec3,
    up: Vec3,
    projection: Mat4,
}

impl OrbitCamera {
    /// Milliseconds per half turn.
    pub const HALF_TURN_MS: f64 = 5000.0;

    pub const FOV_Y: f32 = 2.0 * std::f32::consts::PI / 5.0;
    pub const Z_NEAR: f32 = 1.0;
    pub const Z_FAR: f32 = 2000.0;

    pub fn new(aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 50.0, -100.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            projection: Mat4::perspective_rh(Self::FOV_Y, aspect, Self::Z_NEAR, Self::Z_FAR),
        }
    }

    /// Unwrapped rotation angle in radians: `π · ms / 5000`.
    pub fn angle_at(elapsed: Duration) -> f64 {
        PI * elapsed.as_secs_f64() * 1000.0 / Self::HALF_TURN_MS
    }

    /// Eye position after rotating the base eye about the up axis.
    pub fn eye_at(&self, elapsed: Duration) -> Vec3 {
        // Wrap in f64 so long sessions keep f32 precision.
        let angle = (Self::angle_at(elapsed) % TAU) as f32;
        self.target + Mat3::from_rotation_y(angle) * (self.eye - self.target)
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view_proj(&self, elapsed: Duration) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye_at(elapsed), self.target, self.up);
        self.projection * view
    }
}
