use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::error::RenderError;

use super::SHAPE_ID_MAX;

/// Which frame path the scheduler records.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum RenderMode {
    /// Deferred composition: one full-screen ray-marching pass.
    #[default]
    RayMarch,
    /// Placeholder; records no passes.
    EnvironmentMapping,
}

impl RenderMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderMode::RayMarch => "raymarch",
            RenderMode::EnvironmentMapping => "environment mapping on",
        }
    }

    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            RenderMode::RayMarch => RenderMode::EnvironmentMapping,
            RenderMode::EnvironmentMapping => RenderMode::RayMarch,
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown render mode `{0}`")]
pub struct UnknownRenderMode(pub String);

impl FromStr for RenderMode {
    type Err = UnknownRenderMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raymarch" => Ok(RenderMode::RayMarch),
            "environment mapping on" => Ok(RenderMode::EnvironmentMapping),
            other => Err(UnknownRenderMode(other.to_string())),
        }
    }
}

/// User-facing renderer parameters.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Settings {
    pub mode: RenderMode,
    /// Implicit surface selector, `0..=SHAPE_ID_MAX`.
    pub shape_id: u32,
}

impl Settings {
    pub fn validated_shape(&self) -> Result<u32, RenderError> {
        check_shape(self.shape_id)
    }
}

pub(crate) fn check_shape(shape_id: u32) -> Result<u32, RenderError> {
    if shape_id > SHAPE_ID_MAX {
        return Err(RenderError::ShapeOutOfRange(shape_id));
    }
    Ok(shape_id)
}
