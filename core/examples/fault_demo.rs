use terrain_core::{TerrainParams, generate_terrain};

fn main() -> terrain_core::Result<()> {
    // 33×33 grid, 300 faults, fixed seed
    let params = TerrainParams::new(33, 300).with_seed(2025);
    let terrain = generate_terrain(&params)?;

    println!(
        "{} vertices, {} triangles, normalization {:?}",
        terrain.mesh.vertex_count(),
        terrain.mesh.triangle_count(),
        terrain.normalization
    );

    // Print the top-left 12×12 corner of the field
    for i in 0..12 {
        for j in 0..12 {
            print!("{:>6.3} ", terrain.field.get(i, j));
        }
        println!();
    }
    Ok(())
}
