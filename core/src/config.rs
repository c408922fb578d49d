use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, TerrainError};
use crate::fault::{DEFAULT_FAULT_STEP, FaultGenerator};
use crate::heightfield::{MAX_GRID_SIZE, MIN_GRID_SIZE};
use crate::mesh::MeshBuilder;
use crate::utils::ColorMode;

// Safe values used when a request can't be parsed
pub const FALLBACK_GRID_SIZE: usize = MIN_GRID_SIZE;
pub const FALLBACK_FAULT_COUNT: usize = 0;

// Largest fault count accepted from form input
pub const MAX_FAULT_COUNT: usize = 100_000;

// Everything needed to reproduce one terrain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    pub grid_size: usize,
    pub fault_count: usize,
    // None draws from the thread RNG
    pub seed: Option<u64>,
    pub fault_step: f32,
    pub height_scale: f32,
    pub color_mode: ColorMode,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            grid_size: FALLBACK_GRID_SIZE,
            fault_count: FALLBACK_FAULT_COUNT,
            seed: None,
            fault_step: DEFAULT_FAULT_STEP,
            height_scale: 1.0,
            color_mode: ColorMode::default(),
        }
    }
}

impl TerrainParams {
    pub fn new(grid_size: usize, fault_count: usize) -> Self {
        Self {
            grid_size,
            fault_count,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    // Build params from raw form input.
    // Each field falls back on its own: a bad fault count does not
    // discard a good grid size.
    pub fn from_inputs(grid_size: &str, fault_count: &str) -> Self {
        Self::new(
            parse_or_fallback(
                "grid size",
                grid_size,
                MIN_GRID_SIZE..=MAX_GRID_SIZE,
                FALLBACK_GRID_SIZE,
            ),
            parse_or_fallback(
                "fault count",
                fault_count,
                0..=MAX_FAULT_COUNT,
                FALLBACK_FAULT_COUNT,
            ),
        )
    }

    pub fn fault_generator(&self) -> Result<FaultGenerator> {
        FaultGenerator::new(self.grid_size, self.fault_count)?.with_step(self.fault_step)
    }

    pub fn mesh_builder(&self) -> Result<MeshBuilder> {
        if !self.height_scale.is_finite() {
            return Err(TerrainError::invalid(format!(
                "height scale must be finite, got {}",
                self.height_scale
            )));
        }
        Ok(MeshBuilder::new()
            .with_height_scale(self.height_scale)
            .with_color_mode(self.color_mode))
    }
}

fn parse_or_fallback(
    field: &str,
    input: &str,
    valid: std::ops::RangeInclusive<usize>,
    fallback: usize,
) -> usize {
    match input.trim().parse::<usize>() {
        Ok(v) if valid.contains(&v) => v,
        Ok(v) => {
            warn!(field, value = v, fallback, "value out of range, using fallback");
            fallback
        }
        Err(e) => {
            warn!(field, input, error = %e, fallback, "unparsable value, using fallback");
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inputs_parse_when_valid() {
        let p = TerrainParams::from_inputs(" 64 ", "200");
        assert_eq!(p.grid_size, 64);
        assert_eq!(p.fault_count, 200);
        assert_eq!(p.seed, None);
    }

    #[test]
    fn bad_inputs_fall_back_per_field() {
        let p = TerrainParams::from_inputs("abc", "12");
        assert_eq!(p.grid_size, FALLBACK_GRID_SIZE);
        assert_eq!(p.fault_count, 12);

        let p = TerrainParams::from_inputs("1", "-3");
        assert_eq!(p.grid_size, FALLBACK_GRID_SIZE);
        assert_eq!(p.fault_count, FALLBACK_FAULT_COUNT);

        let p = TerrainParams::from_inputs("999999", "");
        assert_eq!(p.grid_size, FALLBACK_GRID_SIZE);
        assert_eq!(p.fault_count, FALLBACK_FAULT_COUNT);
    }

    #[test]
    fn oversized_fault_count_falls_back() {
        let p = TerrainParams::from_inputs("16", "99999999999");
        assert_eq!(p.grid_size, 16);
        assert_eq!(p.fault_count, FALLBACK_FAULT_COUNT);

        let limit = MAX_FAULT_COUNT.to_string();
        assert_eq!(TerrainParams::from_inputs("16", &limit).fault_count, MAX_FAULT_COUNT);
        let over = (MAX_FAULT_COUNT + 1).to_string();
        assert_eq!(TerrainParams::from_inputs("16", &over).fault_count, FALLBACK_FAULT_COUNT);
    }

    #[test]
    fn defaults_are_the_safe_values() {
        let p = TerrainParams::default();
        assert_eq!(p.grid_size, 2);
        assert_eq!(p.fault_count, 0);
        assert!(p.fault_generator().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let p: TerrainParams =
            serde_json::from_str(r#"{ "grid_size": 33, "seed": 9, "color_mode": "elevation" }"#)
                .unwrap();
        assert_eq!(p.grid_size, 33);
        assert_eq!(p.seed, Some(9));
        assert_eq!(p.fault_count, 0);
        assert_eq!(p.color_mode, ColorMode::Elevation);
        assert_eq!(p.fault_step, DEFAULT_FAULT_STEP);
    }

    #[test]
    fn invalid_params_are_reported() {
        let mut p = TerrainParams::new(1, 5);
        assert!(p.fault_generator().is_err());
        p.grid_size = 8;
        p.fault_step = -1.0;
        assert!(p.fault_generator().is_err());
        p.fault_step = DEFAULT_FAULT_STEP;
        p.height_scale = f32::INFINITY;
        assert!(p.mesh_builder().is_err());
    }
}
