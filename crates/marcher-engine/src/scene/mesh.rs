use crate::error::RenderError;
use crate::gfx::{VertexAttribute, VertexLayout};

/// Floats per packed vertex: position (3), normal (3), uv (2).
pub const VERTEX_STRIDE_FLOATS: usize = 8;

/// Opaque mesh description supplied by the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub triangles: Vec<[u16; 3]>,
}

impl MeshData {
    /// Interleaved vertex data, `VERTEX_STRIDE_FLOATS` floats per vertex.
    pub fn packed_vertices(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.positions.len() * VERTEX_STRIDE_FLOATS);
        for ((p, n), uv) in self.positions.iter().zip(&self.normals).zip(&self.uvs) {
            out.extend_from_slice(p);
            out.extend_from_slice(n);
            out.extend_from_slice(uv);
        }
        out
    }

    /// Flattened triangle list.
    pub fn packed_indices(&self) -> Vec<u16> {
        self.triangles.iter().flatten().copied().collect()
    }

    pub fn index_count(&self) -> u32 {
        (self.triangles.len() * 3) as u32
    }

    /// Checks attribute counts and index ranges.
    pub fn validate(&self) -> Result<(), RenderError> {
        let n = self.positions.len();
        if n == 0 || self.triangles.is_empty() {
            return Err(RenderError::InvalidMesh("mesh has no geometry".into()));
        }
        if self.normals.len() != n || self.uvs.len() != n {
            return Err(RenderError::InvalidMesh(format!(
                "attribute counts differ: {} positions, {} normals, {} uvs",
                n,
                self.normals.len(),
                self.uvs.len()
            )));
        }
        if n > usize::from(u16::MAX) + 1 {
            return Err(RenderError::InvalidMesh(format!(
                "{n} vertices exceed 16-bit index range"
            )));
        }
        if let Some(bad) = self.packed_indices().into_iter().find(|&i| usize::from(i) >= n) {
            return Err(RenderError::InvalidMesh(format!(
                "index {bad} out of range for {n} vertices"
            )));
        }
        Ok(())
    }

    /// Vertex buffer layout matching [`MeshData::packed_vertices`].
    pub fn vertex_layout() -> VertexLayout {
        VertexLayout {
            stride: (VERTEX_STRIDE_FLOATS * std::mem::size_of::<f32>()) as u64,
            attributes: vec![
                VertexAttribute {
                    location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                },
                VertexAttribute {
                    location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 12,
                },
                VertexAttribute {
                    location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 24,
                },
            ],
        }
    }

    /// Two-triangle square in the XZ plane, facing +Y.
    pub fn quad(half: f32) -> Self {
        Self {
            positions: vec![
                [-half, 0.0, -half],
                [half, 0.0, -half],
                [half, 0.0, half],
                [-half, 0.0, half],
            ],
            normals: vec![[0.0, 1.0, 0.0]; 4],
            uvs: vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
            triangles: vec![[0, 2, 1], [0, 3, 2]],
        }
    }

    /// Axis-aligned cube with per-face normals (24 vertices, 12 triangles).
    pub fn cube(half: f32) -> Self {
        // (normal, tangent u, tangent v) per face.
        const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ];
        const CORNERS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

        let mut mesh = Self::default();
        for (face, (n, u, v)) in FACES.iter().enumerate() {
            for (cu, cv) in CORNERS {
                let p = [
                    (n[0] + u[0] * cu + v[0] * cv) * half,
                    (n[1] + u[1] * cu + v[1] * cv) * half,
                    (n[2] + u[2] * cu + v[2] * cv) * half,
                ];
                mesh.positions.push(p);
                mesh.normals.push(*n);
                mesh.uvs.push([(cu + 1.0) * 0.5, (1.0 - cv) * 0.5]);
            }
            let base = (face * 4) as u16;
            mesh.triangles.push([base, base + 1, base + 2]);
            mesh.triangles.push([base, base + 2, base + 3]);
        }
        mesh
    }
}
