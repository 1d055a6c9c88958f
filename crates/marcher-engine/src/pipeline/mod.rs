//! Shader programs and the fixed set of render pipelines.

mod builder;
mod shaders;

pub use builder::{Pipelines, ShaderSet};
pub use shaders::{SHADERS, ShaderSource};
