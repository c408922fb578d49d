// core holds the fault-line terrain pipeline:
// fault field -> normalize -> normals -> triangle mesh
pub mod config;
pub mod error;
pub mod fault;
pub mod heightfield;
pub mod mesh;
pub mod normals;
pub mod pipeline;
pub mod preview;
pub mod utils;

pub use config::TerrainParams;
pub use error::{Result, TerrainError};
pub use fault::{Fault, FaultGenerator};
pub use heightfield::{HeightField, MAX_GRID_SIZE, MIN_GRID_SIZE, UP};
pub use mesh::{MeshBuilder, TerrainMesh};
pub use normals::estimate_normals;
pub use pipeline::{
    Terrain, finish, generate_terrain, generate_terrain_mesh, generate_terrain_mesh_with_rng,
    generate_terrain_with_rng, terrain_from_faults,
};
pub use utils::{ColorMode, Normalization, flatten2};
