use glam::Vec3;

use crate::frame::Settings;

use super::lights::MAX_LIGHTS;

/// Axis-aligned box the light positions are sampled from.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LightExtent {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for LightExtent {
    fn default() -> Self {
        Self {
            min: Vec3::new(-50.0, -30.0, -50.0),
            max: Vec3::new(50.0, 50.0, 50.0),
        }
    }
}

/// Scene-level configuration consumed by the resource allocator and scheduler.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    /// Number of light records generated at init. Must be in `1..=MAX_LIGHTS`.
    pub light_count: u32,

    pub light_extent: LightExtent,

    /// Initial render mode and shape selector.
    pub settings: Settings,

    /// Seed for the light field; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            light_count: MAX_LIGHTS,
            light_extent: LightExtent::default(),
            settings: Settings::default(),
            seed: None,
        }
    }
}
