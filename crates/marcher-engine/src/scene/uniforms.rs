//! POD layouts of the uniform blocks, byte-exact with the shader interface.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// View-projection matrix (64 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new(view_proj: Mat4) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
        }
    }
}

/// Model matrix plus its inverse-transpose for normals (128 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
    pub normal_model: [[f32; 4]; 4],
}

impl ModelUniform {
    pub fn new(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal_model: model.inverse().transpose().to_cols_array_2d(),
        }
    }

    /// Fixed transform that recenters the mesh below the orbit target.
    pub fn centered() -> Self {
        let model = Mat4::from_translation(Vec3::new(0.0, -5.0, 0.0))
            * Mat4::from_translation(Vec3::new(0.0, -40.0, 0.0));
        Self::new(model)
    }
}

/// Presentation size in physical pixels (8 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CanvasSizeUniform {
    pub size: [f32; 2],
}

/// Last raw pointer delta in pixels (8 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Default, Pod, Zeroable)]
pub struct PointerOffsetUniform {
    pub offset: [f32; 2],
}

/// Selected implicit surface (4 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Pod, Zeroable)]
pub struct ShapeUniform {
    pub shape_id: u32,
}
