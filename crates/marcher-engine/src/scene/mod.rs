//! Scene resources: mesh, light field, uniform blocks and image targets.
//!
//! [`SceneResources::allocate`] creates and populates everything the frame
//! path binds. Static data (mesh, initial lights, shape selector) is uploaded
//! at creation; the remaining uniform blocks are written with explicit copies.

mod camera;
mod config;
mod lights;
mod mesh;
mod resources;
mod targets;
mod uniforms;

pub use camera::OrbitCamera;
pub use config::{LightExtent, SceneConfig};
pub use lights::{generate_lights, LightRecord, LIGHT_RADIUS, MAX_LIGHTS};
pub use mesh::{MeshData, VERTEX_STRIDE_FLOATS};
pub use resources::{MeshBuffers, SceneResources};
pub use targets::{GBufferTargets, PresentationSize, ALBEDO_FORMAT, GBUFFER_FLOAT_FORMAT};
pub use uniforms::{
    CameraUniform, CanvasSizeUniform, ModelUniform, PointerOffsetUniform, ShapeUniform,
};
