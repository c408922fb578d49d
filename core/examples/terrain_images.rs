// Generates and saves terrain previews for a few fault counts:
// grayscale height, elevation colors, and shaded colors

use std::path::Path;

use terrain_core::preview::{render_grayscale, render_top_down};
use terrain_core::{ColorMode, TerrainParams, generate_terrain};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let size = 257;
    for faults in [50, 400, 2000] {
        let params = TerrainParams::new(size, faults).with_seed(2025);
        let terrain = generate_terrain(&params)?;

        let gray = format!("faults_{faults}_gray.png");
        render_grayscale(&terrain.field).save(Path::new(&gray))?;

        let elevation = format!("faults_{faults}_elevation.png");
        render_top_down(&terrain.field, ColorMode::Elevation)?.save(Path::new(&elevation))?;

        let shaded = format!("faults_{faults}_shaded.png");
        render_top_down(&terrain.field, ColorMode::Shaded)?.save(Path::new(&shaded))?;

        tracing::info!(faults, %gray, %elevation, %shaded, "saved previews");
    }
    Ok(())
}
