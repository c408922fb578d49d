use crate::error::{Result, TerrainError};
use crate::utils::{HeightMap2D, Normalization, flatten2, min_max2, normalize2};

// Smallest grid that still forms one quad (two triangles)
pub const MIN_GRID_SIZE: usize = 2;
// Vertex indices are emitted as u32, keep size² well inside that
pub const MAX_GRID_SIZE: usize = 4096;

pub type Normal3 = [f32; 3];

// Normal of a flat field, +z with the mesh winding used here
pub const UP: Normal3 = [0.0, 0.0, 1.0];

// N×N grid of elevations plus per-vertex normals.
// Indexed as `elevation[i][j]`, where i runs along x and j along y.
// Normals stay empty until `estimate_normals` has run, and the
// elevations must not change after that.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    size: usize,
    elevation: HeightMap2D,
    normals: Option<Vec<Vec<Normal3>>>,
}

impl HeightField {
    // Zero-filled field
    pub fn new(size: usize) -> Result<Self> {
        check_size(size)?;
        Ok(Self {
            size,
            elevation: vec![vec![0.0f32; size]; size],
            normals: None,
        })
    }

    // Wrap an existing square map, rejecting ragged or non-finite input
    pub fn from_elevations(elevation: HeightMap2D) -> Result<Self> {
        let size = elevation.len();
        check_size(size)?;
        if elevation.iter().any(|row| row.len() != size) {
            return Err(TerrainError::invalid(format!(
                "height map must be {size}×{size}"
            )));
        }
        if elevation.iter().flatten().any(|v| !v.is_finite()) {
            return Err(TerrainError::invalid("height map contains non-finite values"));
        }
        Ok(Self {
            size,
            elevation,
            normals: None,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn vertex_count(&self) -> usize {
        self.size * self.size
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.elevation[i][j]
    }

    // Elevation of the neighbor at (i + di, j + dj).
    // Out-of-grid lookups clamp back onto the grid, so a boundary
    // vertex sees itself in place of a missing neighbor.
    #[inline]
    pub fn clamped(&self, i: usize, j: usize, di: isize, dj: isize) -> f32 {
        let ci = clamp_index(i, di, self.size);
        let cj = clamp_index(j, dj, self.size);
        self.elevation[ci][cj]
    }

    pub fn elevations(&self) -> &HeightMap2D {
        &self.elevation
    }

    // Row-major copy, row i holds column j
    pub fn flat_elevations(&self) -> Vec<f32> {
        flatten2(&self.elevation)
    }

    // Fails once normals exist, the elevations are final by then
    pub(crate) fn elevations_mut(&mut self) -> Result<&mut HeightMap2D> {
        if self.normals.is_some() {
            return Err(TerrainError::invalid(
                "height field is finished, elevations are read-only once normals exist",
            ));
        }
        Ok(&mut self.elevation)
    }

    // (min, max) over all cells
    pub fn range(&self) -> (f32, f32) {
        min_max2(&self.elevation)
    }

    pub fn is_flat(&self) -> bool {
        let (min, max) = self.range();
        min == max
    }

    // Rescale into [-0.5, 0.5] centered on zero.
    // Rejected on a finished field, its normals would go stale.
    pub fn normalize(&mut self) -> Result<Normalization> {
        Ok(normalize2(self.elevations_mut()?))
    }

    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    pub fn normal(&self, i: usize, j: usize) -> Option<Normal3> {
        self.normals.as_ref().map(|n| n[i][j])
    }

    pub fn normals(&self) -> Option<&[Vec<Normal3>]> {
        self.normals.as_deref()
    }

    pub(crate) fn set_normals(&mut self, normals: Vec<Vec<Normal3>>) {
        debug_assert_eq!(normals.len(), self.size);
        self.normals = Some(normals);
    }
}

pub(crate) fn check_size(size: usize) -> Result<()> {
    if size < MIN_GRID_SIZE {
        return Err(TerrainError::invalid(format!(
            "grid size must be at least {MIN_GRID_SIZE}, got {size}"
        )));
    }
    if size > MAX_GRID_SIZE {
        return Err(TerrainError::invalid(format!(
            "grid size must be at most {MAX_GRID_SIZE}, got {size}"
        )));
    }
    Ok(())
}

#[inline]
fn clamp_index(idx: usize, delta: isize, size: usize) -> usize {
    (idx as isize + delta).clamp(0, size as isize - 1) as usize
}
