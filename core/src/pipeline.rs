use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info_span};

use crate::config::TerrainParams;
use crate::error::Result;
use crate::fault::{Fault, FaultGenerator};
use crate::heightfield::HeightField;
use crate::mesh::{MeshBuilder, TerrainMesh};
use crate::normals::estimate_normals;
use crate::utils::Normalization;

// Finished height field together with the mesh built from it
#[derive(Debug, Clone)]
pub struct Terrain {
    pub field: HeightField,
    pub mesh: TerrainMesh,
    pub normalization: Normalization,
}

impl Terrain {
    pub fn is_flat(&self) -> bool {
        self.normalization.is_flat()
    }
}

// Fault field → normalize → normals → mesh, using the thread RNG
pub fn generate_terrain_mesh(grid_size: usize, fault_count: usize) -> Result<TerrainMesh> {
    generate_terrain_mesh_with_rng(grid_size, fault_count, &mut rand::thread_rng())
}

// Same as `generate_terrain_mesh` with a caller-supplied random source
pub fn generate_terrain_mesh_with_rng<R: Rng + ?Sized>(
    grid_size: usize,
    fault_count: usize,
    rng: &mut R,
) -> Result<TerrainMesh> {
    let generator = FaultGenerator::new(grid_size, fault_count)?;
    let field = generator.generate(rng)?;
    finish(field, &MeshBuilder::new()).map(|t| t.mesh)
}

// Full pipeline driven by params; seeded when `params.seed` is set
pub fn generate_terrain(params: &TerrainParams) -> Result<Terrain> {
    match params.seed {
        Some(seed) => generate_terrain_with_rng(params, &mut StdRng::seed_from_u64(seed)),
        None => generate_terrain_with_rng(params, &mut rand::thread_rng()),
    }
}

pub fn generate_terrain_with_rng<R: Rng + ?Sized>(
    params: &TerrainParams,
    rng: &mut R,
) -> Result<Terrain> {
    let _span = info_span!(
        "generate_terrain",
        grid_size = params.grid_size,
        fault_count = params.fault_count
    )
    .entered();
    let generator = params.fault_generator()?;
    let builder = params.mesh_builder()?;
    let field = generator.generate(rng)?;
    finish(field, &builder)
}

// Replay a fixed fault list through the whole pipeline
pub fn terrain_from_faults<I>(params: &TerrainParams, faults: I) -> Result<Terrain>
where
    I: IntoIterator<Item = Fault>,
{
    let field = params.fault_generator()?.generate_from(faults)?;
    finish(field, &params.mesh_builder()?)
}

// Normalize a raw field, estimate its normals and mesh it.
// The field is consumed and becomes read-only inside the returned `Terrain`;
// passing in an already finished field is an error.
pub fn finish(mut field: HeightField, builder: &MeshBuilder) -> Result<Terrain> {
    let normalization = field.normalize()?;
    if normalization.is_flat() {
        debug!(size = field.size(), "degenerate field, terrain is flat");
    }
    estimate_normals(&mut field);
    let mesh = builder.build(&field)?;
    Ok(Terrain {
        field,
        mesh,
        normalization,
    })
}
