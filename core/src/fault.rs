use std::f32::consts::TAU;

use rand::Rng;
use tracing::{debug, trace};

use crate::error::{Result, TerrainError};
use crate::heightfield::{HeightField, check_size};

// Height added on one side of a fault line and removed on the other
pub const DEFAULT_FAULT_STEP: f32 = 0.01;

// A straight cut through the grid.
// `point` lies somewhere on the line, `angle` orients its normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fault {
    pub point: [f32; 2],
    pub angle: f32,
}

impl Fault {
    pub fn new(point: [f32; 2], angle: f32) -> Self {
        Self { point, angle }
    }

    // Point uniform in [0, size)², angle uniform in [0, 2π)
    pub fn random<R: Rng + ?Sized>(rng: &mut R, size: usize) -> Self {
        let extent = size as f32;
        let point = [rng.gen_range(0.0..extent), rng.gen_range(0.0..extent)];
        let angle = rng.gen_range(0.0..TAU);
        Self { point, angle }
    }

    // Unit normal of the fault line (cos θ, sin θ)
    #[inline]
    pub fn normal(&self) -> [f32; 2] {
        let (sin, cos) = self.angle.sin_cos();
        [cos, sin]
    }

    // Signed distance of vertex (i, j) from the line
    #[inline]
    pub fn side(&self, i: usize, j: usize) -> f32 {
        let [nx, ny] = self.normal();
        (i as f32 - self.point[0]) * nx + (j as f32 - self.point[1]) * ny
    }

    // Raise the positive side by `step`, lower the negative side.
    // Vertices exactly on the line keep their height.
    // A finished field (normals present) is rejected.
    pub fn apply(&self, field: &mut HeightField, step: f32) -> Result<()> {
        let [nx, ny] = self.normal();
        let [px, py] = self.point;
        for (i, row) in field.elevations_mut()?.iter_mut().enumerate() {
            let dx = i as f32 - px;
            for (j, val) in row.iter_mut().enumerate() {
                let side = dx * nx + (j as f32 - py) * ny;
                if side < 0.0 {
                    *val -= step;
                } else if side > 0.0 {
                    *val += step;
                }
            }
        }
        Ok(())
    }
}

// Builds a raw height field out of repeated random faults
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaultGenerator {
    size: usize,
    fault_count: usize,
    step: f32,
}

impl FaultGenerator {
    // size - vertices per side, at least 2
    // fault_count - number of random cuts, 0 gives a flat field
    pub fn new(size: usize, fault_count: usize) -> Result<Self> {
        check_size(size)?;
        Ok(Self {
            size,
            fault_count,
            step: DEFAULT_FAULT_STEP,
        })
    }

    pub fn with_step(mut self, step: f32) -> Result<Self> {
        if step <= 0.0 || !step.is_finite() {
            return Err(TerrainError::invalid(format!(
                "fault step must be positive and finite, got {step}"
            )));
        }
        self.step = step;
        Ok(self)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn fault_count(&self) -> usize {
        self.fault_count
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    // Apply `fault_count` faults sampled from `rng`
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<HeightField> {
        let size = self.size;
        let faults = (0..self.fault_count).map(|_| Fault::random(rng, size));
        self.generate_from(faults)
    }

    // Apply a given fault sequence; `fault_count` is ignored.
    // The same sequence always gives bit-identical elevations.
    pub fn generate_from<I>(&self, faults: I) -> Result<HeightField>
    where
        I: IntoIterator<Item = Fault>,
    {
        let mut field = HeightField::new(self.size)?;
        let mut applied = 0usize;
        for fault in faults {
            trace!(?fault, "applying fault");
            fault.apply(&mut field, self.step)?;
            applied += 1;
        }
        debug!(size = self.size, faults = applied, "generated fault field");
        Ok(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn fault_raises_one_side_and_lowers_the_other() {
        // vertical cut at x = 1.5, normal along +x
        let fault = Fault::new([1.5, 1.5], 0.0);
        let field = FaultGenerator::new(4, 1)
            .unwrap()
            .generate_from([fault])
            .unwrap();
        for j in 0..4 {
            assert_eq!(field.get(0, j), -DEFAULT_FAULT_STEP);
            assert_eq!(field.get(1, j), -DEFAULT_FAULT_STEP);
            assert_eq!(field.get(2, j), DEFAULT_FAULT_STEP);
            assert_eq!(field.get(3, j), DEFAULT_FAULT_STEP);
        }
    }

    #[test]
    fn vertex_on_the_line_is_untouched() {
        // line through (1, 1) along the y axis
        let fault = Fault::new([1.0, 1.0], 0.0);
        assert_eq!(fault.side(1, 0), 0.0);
        let field = FaultGenerator::new(3, 1)
            .unwrap()
            .generate_from([fault])
            .unwrap();
        assert_eq!(field.get(1, 0), 0.0);
        assert_eq!(field.get(1, 2), 0.0);
        assert_eq!(field.get(0, 1), -DEFAULT_FAULT_STEP);
        assert_eq!(field.get(2, 1), DEFAULT_FAULT_STEP);
    }

    #[test]
    fn zero_faults_give_flat_field() {
        let mut rng = StdRng::seed_from_u64(1);
        let field = FaultGenerator::new(8, 0).unwrap().generate(&mut rng).unwrap();
        assert!(field.is_flat());
        assert_eq!(field.range(), (0.0, 0.0));
    }

    #[test]
    fn random_faults_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let f = Fault::random(&mut rng, 16);
            assert!((0.0..16.0).contains(&f.point[0]));
            assert!((0.0..16.0).contains(&f.point[1]));
            assert!((0.0..TAU).contains(&f.angle));
            let [nx, ny] = f.normal();
            assert!((nx * nx + ny * ny - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn same_seed_same_field() {
        let generator = FaultGenerator::new(17, 50).unwrap();
        let a = generator.generate(&mut StdRng::seed_from_u64(42)).unwrap();
        let b = generator.generate(&mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a.flat_elevations(), b.flat_elevations());
    }

    #[test]
    fn custom_step_is_used() {
        let fault = Fault::new([0.5, 0.5], 0.0);
        let field = FaultGenerator::new(2, 1)
            .unwrap()
            .with_step(0.25)
            .unwrap()
            .generate_from([fault])
            .unwrap();
        assert_eq!(field.get(1, 0), 0.25);
        assert_eq!(field.get(0, 0), -0.25);
    }

    #[test]
    fn faults_cannot_touch_a_finished_field() {
        let mut field = HeightField::new(3).unwrap();
        crate::normals::estimate_normals(&mut field);
        let fault = Fault::new([1.5, 1.5], 0.0);
        assert!(matches!(
            fault.apply(&mut field, DEFAULT_FAULT_STEP),
            Err(TerrainError::InvalidParameter(_))
        ));
        assert!(field.is_flat());
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(matches!(
            FaultGenerator::new(1, 5),
            Err(TerrainError::InvalidParameter(_))
        ));
        let generator = FaultGenerator::new(4, 1).unwrap();
        assert!(generator.with_step(0.0).is_err());
        assert!(generator.with_step(f32::NAN).is_err());
        assert!(generator.with_step(-0.1).is_err());
    }
}
