use tracing::debug;

use crate::error::{Result, TerrainError};
use crate::heightfield::{HeightField, Normal3};
use crate::utils::{ColorMode, Rgb3, TerrainPalette};

// Triangle list ready for upload: one position, color and normal per
// grid vertex, and index triples into those arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainMesh {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<Rgb3>,
    pub normals: Vec<Normal3>,
    pub indices: Vec<[u32; 3]>,
    grid_size: usize,
    flat: bool,
}

impl TerrainMesh {
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    // Source field had a single elevation, callers may skip drawing it.
    // Taken from the field, so a zero height scale doesn't make relief flat.
    pub fn is_flat(&self) -> bool {
        self.flat
    }

    // Interleaved-free attribute buffers, as a vertex upload wants them
    pub fn position_buffer(&self) -> &[f32] {
        self.positions.as_flattened()
    }

    pub fn color_buffer(&self) -> &[f32] {
        self.colors.as_flattened()
    }

    pub fn normal_buffer(&self) -> &[f32] {
        self.normals.as_flattened()
    }

    pub fn index_buffer(&self) -> &[u32] {
        self.indices.as_flattened()
    }

    // Corner positions of triangle `t`
    pub fn triangle(&self, t: usize) -> [[f32; 3]; 3] {
        self.indices[t].map(|idx| self.positions[idx as usize])
    }
}

// Converts a finished height field into a `TerrainMesh`.
//
// Vertex (i, j) lands at (i·spacing, j·spacing, elevation·height_scale).
// Each grid cell is split along the (i+1, j)–(i, j+1) diagonal:
//
//   (i,j+1)──(i+1,j+1)
//      │  ╲      │      Triangle 1: (i,j), (i+1,j), (i,j+1)
//      │    ╲    │      Triangle 2: (i+1,j), (i+1,j+1), (i,j+1)
//   (i,j)────(i+1,j)
//
// Both are counter-clockwise seen from +z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshBuilder {
    spacing: f32,
    height_scale: f32,
    color_mode: ColorMode,
}

impl Default for MeshBuilder {
    fn default() -> Self {
        Self {
            spacing: 1.0,
            height_scale: 1.0,
            color_mode: ColorMode::default(),
        }
    }
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // Horizontal distance between neighboring vertices.
    // Clamped to a positive minimum so triangles keep their area.
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = if spacing.is_finite() {
            spacing.max(f32::EPSILON)
        } else {
            1.0
        };
        self
    }

    // Vertical exaggeration applied to elevations
    pub fn with_height_scale(mut self, scale: f32) -> Self {
        self.height_scale = if scale.is_finite() { scale } else { 1.0 };
        self
    }

    pub fn with_color_mode(mut self, mode: ColorMode) -> Self {
        self.color_mode = mode;
        self
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    // Fails if normals have not been estimated yet
    pub fn build(&self, field: &HeightField) -> Result<TerrainMesh> {
        let Some(field_normals) = field.normals() else {
            return Err(TerrainError::invalid(
                "height field has no normals, estimate them before meshing",
            ));
        };

        let n = field.size();
        let palette = TerrainPalette::new();
        // horizontal/vertical scaling changes the slope the normals describe
        let tilt = self.height_scale / self.spacing;

        let vertex_count = n * n;
        let mut positions = Vec::with_capacity(vertex_count);
        let mut colors = Vec::with_capacity(vertex_count);
        let mut normals = Vec::with_capacity(vertex_count);

        for i in 0..n {
            for j in 0..n {
                let h = field.get(i, j);
                let normal = rescale_normal(field_normals[i][j], tilt);
                positions.push([
                    i as f32 * self.spacing,
                    j as f32 * self.spacing,
                    h * self.height_scale,
                ]);
                colors.push(palette.color(self.color_mode, h, normal));
                normals.push(normal);
            }
        }

        let cells = n - 1;
        let mut indices = Vec::with_capacity(cells * cells * 2);
        let vertex = |i: usize, j: usize| (i * n + j) as u32;
        for i in 0..cells {
            for j in 0..cells {
                let a = vertex(i, j);
                let b = vertex(i + 1, j);
                let c = vertex(i, j + 1);
                let d = vertex(i + 1, j + 1);
                indices.push([a, b, c]);
                indices.push([b, d, c]);
            }
        }

        debug!(
            vertices = positions.len(),
            triangles = indices.len(),
            "built terrain mesh"
        );

        Ok(TerrainMesh {
            positions,
            colors,
            normals,
            indices,
            grid_size: n,
            flat: field.is_flat(),
        })
    }
}

// A normal of the unscaled surface, (−a, −b, 1)/L, becomes
// (−k·a, −k·b, 1)/L' once heights are stretched by k relative to spacing.
fn rescale_normal(normal: Normal3, k: f32) -> Normal3 {
    if k == 1.0 {
        return normal;
    }
    let n = [normal[0] * k, normal[1] * k, normal[2]];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len > f32::EPSILON {
        [n[0] / len, n[1] / len, n[2] / len]
    } else {
        normal
    }
}
