use palette::{Gradient, LinSrgb};
use serde::{Deserialize, Serialize};
use tracing::debug;

// 2D height map: row‐major Vec<Vec<f32>> of size N×N
// access as `map[i][j]`.
pub type HeightMap2D = Vec<Vec<f32>>;

pub type Rgb3 = [f32; 3];

// Sun at 45° azimuth, 45° altitude, already unit length
const SUN_AZIMUTH: f32 = std::f32::consts::FRAC_PI_4;
const SUN_ALTITUDE: f32 = std::f32::consts::FRAC_PI_4;

// Ambient floor so slopes facing away from the sun stay visible
const AMBIENT: f32 = 0.5;

// flatten a 2D height map (row‐major) into a single Vec<f32>
// Used for upload buffers and image export
pub fn flatten2(map: &HeightMap2D) -> Vec<f32> {
    map.iter().flat_map(|row| row.iter().cloned()).collect()
}

// (min, max) over every cell of the map
pub fn min_max2(map: &HeightMap2D) -> (f32, f32) {
    let mut min = f32::MAX;
    let mut max = f32::MIN;

    for row in map.iter() {
        for &val in row.iter() {
            min = min.min(val);
            max = max.max(val);
        }
    }
    (min, max)
}

// What `normalize2` did to the map
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Normalization {
    // Raw range before rescaling
    Scaled { min: f32, max: f32 },
    // Every cell had the same value, all set to 0
    Flat { level: f32 },
}

impl Normalization {
    pub fn is_flat(&self) -> bool {
        matches!(self, Normalization::Flat { .. })
    }
}

// Rescale in place into [-0.5, 0.5]: the min cell lands on -0.5 and the
// max cell on 0.5 exactly, measured from `min` so f32 rounding can't overshoot.
// A flat map would divide by zero, so it is pinned to 0 instead.
pub fn normalize2(map: &mut HeightMap2D) -> Normalization {
    let (min, max) = min_max2(map);
    let range = max - min;

    if range <= 0.0 || !range.is_finite() {
        debug!(level = min, "flat height map, pinning elevations to 0");
        for row in map.iter_mut() {
            row.fill(0.0);
        }
        return Normalization::Flat { level: min };
    }

    for row in map.iter_mut() {
        for val in row.iter_mut() {
            *val = (*val - min) / range - 0.5;
        }
    }
    debug!(min, max, "normalized height map");
    Normalization::Scaled { min, max }
}

// Direction towards the sun
pub fn sun_direction() -> [f32; 3] {
    let (sin_alt, cos_alt) = SUN_ALTITUDE.sin_cos();
    [
        SUN_AZIMUTH.cos() * cos_alt,
        SUN_AZIMUTH.sin() * cos_alt,
        sin_alt,
    ]
}

// Lambertian brightness in [AMBIENT, 1]
pub fn hillshade(normal: [f32; 3]) -> f32 {
    let l = sun_direction();
    let lambert = (normal[0] * l[0] + normal[1] * l[1] + normal[2] * l[2]).max(0.0);
    (lambert * (1.0 - AMBIENT) + AMBIENT).clamp(0.0, 1.0)
}

// How vertex colors are chosen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    // Same color everywhere
    Constant(Rgb3),
    // Gradient by elevation
    Elevation,
    // Gradient by elevation, darkened by the sun angle
    #[default]
    Shaded,
}

// Elevation → color gradient for normalized heights in [-0.5, 0.5]
pub struct TerrainPalette {
    gradient: Gradient<LinSrgb>,
}

impl Default for TerrainPalette {
    fn default() -> Self {
        Self::new()
    }
}

impl TerrainPalette {
    pub fn new() -> Self {
        // deep water to beach to grass to rock to snow
        let gradient = Gradient::with_domain(vec![
            (0.00, LinSrgb::new(0.0, 0.0, 0.5)),
            (0.30, LinSrgb::new(0.8, 0.8, 0.5)),
            (0.50, LinSrgb::new(0.1, 0.6, 0.2)),
            (0.75, LinSrgb::new(0.5, 0.4, 0.3)),
            (1.00, LinSrgb::new(1.0, 1.0, 1.0)),
        ]);
        Self { gradient }
    }

    // Gradient lookup, elevation is shifted from [-0.5, 0.5] into [0, 1]
    pub fn elevation_color(&self, elevation: f32) -> Rgb3 {
        let t = (elevation + 0.5).clamp(0.0, 1.0);
        let col: LinSrgb = self.gradient.get(t);
        [col.red, col.green, col.blue]
    }

    pub fn color(&self, mode: ColorMode, elevation: f32, normal: [f32; 3]) -> Rgb3 {
        match mode {
            ColorMode::Constant(rgb) => rgb,
            ColorMode::Elevation => self.elevation_color(elevation),
            ColorMode::Shaded => {
                let light = hillshade(normal);
                self.elevation_color(elevation).map(|c| c * light)
            }
        }
    }
}

// [0, 1] float color to 8-bit
pub fn to_rgb8(rgb: Rgb3) -> [u8; 3] {
    rgb.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}
