mod gateway;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use eframe::{App, Frame, NativeOptions, egui, run_native};
use egui::epaint::Shape;
use terrain_core::{ColorMode, Terrain, TerrainParams, generate_terrain, preview::render_top_down};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::gateway::{Camera, to_epaint};

const GRAY: ColorMode = ColorMode::Constant([0.6, 0.6, 0.6]);

struct TerrainApp {
    // raw form inputs, parsed with fallback on generate
    grid_input: String,
    faults_input: String,
    use_seed: bool,
    seed: u64,
    color_mode: ColorMode,

    // view
    yaw_deg: f32,
    pitch_deg: f32,
    exaggeration: f32,

    // displayed terrain, replaced wholesale on each generate
    terrain: Option<Arc<Terrain>>,
    params: TerrainParams,

    // timing & status
    last_duration: Option<f32>,
    status_message: String,
}

impl Default for TerrainApp {
    fn default() -> Self {
        let camera = Camera::default();
        Self {
            grid_input: "64".into(),
            faults_input: "400".into(),
            use_seed: true,
            seed: 2025,
            color_mode: ColorMode::Shaded,
            yaw_deg: camera.yaw.to_degrees(),
            pitch_deg: camera.pitch.to_degrees(),
            exaggeration: camera.exaggeration,
            terrain: None,
            params: TerrainParams::default(),
            last_duration: None,
            status_message: String::new(),
        }
    }
}

impl TerrainApp {
    fn camera(&self) -> Camera {
        Camera {
            yaw: self.yaw_deg.to_radians(),
            pitch: self.pitch_deg.to_radians(),
            exaggeration: self.exaggeration,
        }
    }

    fn generate(&mut self) {
        let mut params = TerrainParams::from_inputs(&self.grid_input, &self.faults_input);
        params.color_mode = self.color_mode;
        if self.use_seed {
            params = params.with_seed(self.seed);
        }
        // echo what was actually used back into the form
        self.grid_input = params.grid_size.to_string();
        self.faults_input = params.fault_count.to_string();

        let start = Instant::now();
        match generate_terrain(&params) {
            Ok(terrain) => {
                let ms = start.elapsed().as_secs_f32() * 1000.0;
                self.last_duration = Some(ms);
                self.status_message = if terrain.is_flat() {
                    "Flat terrain, add faults to see relief".into()
                } else {
                    format!(
                        "Generated {}×{} with {} faults in {:.2} ms",
                        params.grid_size, params.grid_size, params.fault_count, ms
                    )
                };
                info!(
                    grid_size = params.grid_size,
                    fault_count = params.fault_count,
                    ms,
                    "terrain generated"
                );
                self.terrain = Some(Arc::new(terrain));
                self.params = params;
            }
            Err(e) => {
                error!("generation failed: {e}");
                self.last_duration = None;
                self.status_message = format!("Generation failed: {e}");
            }
        }
    }

    fn save_png(&mut self) {
        let Some(terrain) = self.terrain.clone() else {
            self.status_message = "Nothing to save yet".into();
            return;
        };
        let file_name = match self.params.seed {
            Some(seed) => format!("terrain_{seed}.png"),
            None => "terrain.png".into(),
        };
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(&file_name)
            .add_filter("PNG image", &["png"])
            .save_file()
        else {
            return;
        };
        self.status_message = match write_png(&terrain, &self.params, &path) {
            Ok(()) => format!("Saved {}", path.display()),
            Err(e) => {
                error!("save failed: {e:#}");
                format!("Save failed: {e:#}")
            }
        };
    }
}

// PNG preview plus a JSON sidecar holding the params that produced it
fn write_png(terrain: &Terrain, params: &TerrainParams, path: &Path) -> anyhow::Result<()> {
    let img = render_top_down(&terrain.field, params.color_mode)?;
    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("writing {}", path.display()))?;

    let sidecar: PathBuf = path.with_extension("json");
    let json = serde_json::to_string_pretty(params)?;
    std::fs::write(&sidecar, json).with_context(|| format!("writing {}", sidecar.display()))?;
    info!(png = %path.display(), params = %sidecar.display(), "saved preview");
    Ok(())
}

impl App for TerrainApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        egui::SidePanel::left("controls").show(ctx, |ui| {
            ui.heading("Fault Terrain");
            ui.separator();

            ui.label("Grid size");
            ui.text_edit_singleline(&mut self.grid_input);
            ui.label("Fault count");
            ui.text_edit_singleline(&mut self.faults_input);

            ui.checkbox(&mut self.use_seed, "Fixed seed");
            if self.use_seed {
                ui.add(egui::DragValue::new(&mut self.seed).speed(1.0));
            }

            // Color selector
            egui::ComboBox::from_label("Colors")
                .selected_text(match self.color_mode {
                    ColorMode::Constant(_) => "Constant",
                    ColorMode::Elevation => "Elevation",
                    ColorMode::Shaded => "Shaded",
                })
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.color_mode, GRAY, "Constant");
                    ui.selectable_value(&mut self.color_mode, ColorMode::Elevation, "Elevation");
                    ui.selectable_value(&mut self.color_mode, ColorMode::Shaded, "Shaded");
                });

            ui.separator();

            if ui.button("Generate Terrain").clicked() {
                self.generate();
                ctx.request_repaint();
            }
            if ui.button("Save PNG…").clicked() {
                self.save_png();
            }

            ui.separator();
            ui.label("View");
            ui.add(egui::Slider::new(&mut self.yaw_deg, -180.0..=180.0).text("Yaw"));
            ui.add(egui::Slider::new(&mut self.pitch_deg, 5.0..=90.0).text("Pitch"));
            ui.add(egui::Slider::new(&mut self.exaggeration, 0.0..=1.0).text("Height"));

            ui.separator();
            if let Some(ms) = self.last_duration {
                ui.label(format!("Last run: {ms:.2} ms"));
            }
            ui.label(&self.status_message);
        });

        // central display
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(terrain) = self.terrain.clone() else {
                ui.centered_and_justified(|ui| {
                    ui.label("Click “Generate Terrain” to start");
                });
                return;
            };
            if terrain.is_flat() {
                ui.centered_and_justified(|ui| {
                    ui.label("Flat terrain, nothing to draw");
                });
                return;
            }

            let (rect, response) =
                ui.allocate_exact_size(ui.available_size(), egui::Sense::drag());
            // drag to orbit
            let delta = response.drag_delta();
            self.yaw_deg = (self.yaw_deg + delta.x * 0.5).clamp(-180.0, 180.0);
            self.pitch_deg = (self.pitch_deg - delta.y * 0.25).clamp(5.0, 90.0);

            let mesh = to_epaint(&terrain.mesh, &self.camera(), rect);
            ui.painter_at(rect).add(Shape::mesh(mesh));
        });
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let opts = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 640.0])
            .with_min_inner_size([480.0, 320.0]),
        ..Default::default()
    };
    run_native(
        "Fault Terrain",
        opts,
        Box::new(|_cc| Ok(Box::new(TerrainApp::default()))),
    )
    .map_err(|e| anyhow::anyhow!("viewer exited with an error: {e}"))
}
