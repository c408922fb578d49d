use tracing::debug;

use crate::heightfield::{HeightField, Normal3};

// Per-vertex normals from 4-neighbor finite differences.
//
// Tangent along i: (1, 0, south − north)
// Tangent along j: (0, 1, east − west)
// Their cross product (−Δi, −Δj, 1) points up (+z) on flat ground,
// which matches the counter-clockwise winding of the mesh.
// Missing neighbors at the border clamp to the vertex itself.
pub fn estimate_normals(field: &mut HeightField) {
    let size = field.size();
    let normals: Vec<Vec<Normal3>> = (0..size)
        .map(|i| (0..size).map(|j| vertex_normal(field, i, j)).collect())
        .collect();
    field.set_normals(normals);
    debug!(size, "estimated vertex normals");
}

pub fn vertex_normal(field: &HeightField, i: usize, j: usize) -> Normal3 {
    let north = field.clamped(i, j, -1, 0);
    let south = field.clamped(i, j, 1, 0);
    let west = field.clamped(i, j, 0, -1);
    let east = field.clamped(i, j, 0, 1);

    let di = south - north;
    let dj = east - west;

    // (1, 0, di) × (0, 1, dj)
    let n = [-di, -dj, 1.0];
    // z is 1, length never drops below 1
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    [n[0] / len, n[1] / len, n[2] / len]
}
