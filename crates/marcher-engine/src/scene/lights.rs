use bytemuck::{Pod, Zeroable};
use rand::distributions::Standard;
use rand::Rng;

use super::config::LightExtent;

/// Compile-time capacity of the light storage buffer.
pub const MAX_LIGHTS: u32 = 1024;

/// Radius given to every generated light.
pub const LIGHT_RADIUS: f32 = 20.0;

/// One point light as laid out in the storage buffer (8 floats).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LightRecord {
    /// xyz position, w = 1.
    pub position: [f32; 4],
    pub color: [f32; 3],
    pub radius: f32,
}

/// Samples `count` lights uniformly inside `extent`.
///
/// Color channels are uniform in `[0, 2)`.
pub fn generate_lights<R: Rng + ?Sized>(
    rng: &mut R,
    count: u32,
    extent: &LightExtent,
) -> Vec<LightRecord> {
    let size = extent.max - extent.min;
    let mut unit = || -> f32 { rng.sample(Standard) };

    (0..count)
        .map(|_| {
            let position = [
                unit() * size.x + extent.min.x,
                unit() * size.y + extent.min.y,
                unit() * size.z + extent.min.z,
                1.0,
            ];
            let color = [unit() * 2.0, unit() * 2.0, unit() * 2.0];
            LightRecord {
                position,
                color,
                radius: LIGHT_RADIUS,
            }
        })
        .collect()
}
