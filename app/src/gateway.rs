use egui::epaint::{Mesh, Vertex};
use egui::{Color32, Rect, pos2};
use terrain_core::TerrainMesh;
use terrain_core::utils::to_rgb8;

// Orthographic camera orbiting the terrain center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    // rotation around the vertical axis, radians
    pub yaw: f32,
    // elevation above the horizon, radians; π/2 looks straight down
    pub pitch: f32,
    // vertical exaggeration relative to the grid width
    pub exaggeration: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            yaw: std::f32::consts::FRAC_PI_4,
            pitch: std::f32::consts::FRAC_PI_6,
            exaggeration: 0.35,
        }
    }
}

struct Projected {
    screen: [f32; 2],
    depth: f32,
}

// Turns a `TerrainMesh` into an epaint mesh for `rect`.
// Triangles are sorted back to front since the painter has no depth buffer.
pub fn to_epaint(mesh: &TerrainMesh, camera: &Camera, rect: Rect) -> Mesh {
    let projected = project(mesh, camera, rect);

    let vertices: Vec<Vertex> = projected
        .iter()
        .zip(&mesh.colors)
        .map(|(p, &rgb)| {
            let [r, g, b] = to_rgb8(rgb);
            Vertex {
                pos: pos2(p.screen[0], p.screen[1]),
                uv: pos2(0.0, 0.0),
                color: Color32::from_rgb(r, g, b),
            }
        })
        .collect();

    let depth = |tri: &[u32; 3]| -> f32 { tri.iter().map(|&i| projected[i as usize].depth).sum() };
    let mut triangles = mesh.indices.clone();
    triangles.sort_by(|a, b| depth(b).total_cmp(&depth(a)));

    Mesh {
        indices: triangles.into_iter().flatten().collect(),
        vertices,
        texture_id: egui::TextureId::default(),
    }
}

fn project(mesh: &TerrainMesh, camera: &Camera, rect: Rect) -> Vec<Projected> {
    let (max_x, max_y) = mesh
        .positions
        .iter()
        .fold((0.0f32, 0.0f32), |(mx, my), p| (mx.max(p[0]), my.max(p[1])));
    let extent = max_x.max(max_y).max(f32::EPSILON);
    let (cx, cy) = (max_x / 2.0, max_y / 2.0);

    let (sin_yaw, cos_yaw) = camera.yaw.sin_cos();
    let (sin_pitch, cos_pitch) = camera.pitch.sin_cos();
    let scale = rect.width().min(rect.height()) * 0.7;
    let center = rect.center();

    mesh.positions
        .iter()
        .map(|p| {
            // grid into [-0.5, 0.5]², heights stay in their normalized units
            let x = (p[0] - cx) / extent;
            let y = (p[1] - cy) / extent;
            let z = p[2] * camera.exaggeration;

            let rx = x * cos_yaw - y * sin_yaw;
            let ry = x * sin_yaw + y * cos_yaw;

            let up = z * cos_pitch + ry * sin_pitch;
            let depth = ry * cos_pitch - z * sin_pitch;
            Projected {
                screen: [center.x + rx * scale, center.y - up * scale],
                depth,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use terrain_core::generate_terrain_mesh_with_rng;

    fn rect() -> Rect {
        Rect::from_min_size(pos2(0.0, 0.0), egui::vec2(400.0, 300.0))
    }

    #[test]
    fn epaint_mesh_keeps_every_triangle() {
        let mut rng = StdRng::seed_from_u64(5);
        let mesh = generate_terrain_mesh_with_rng(9, 60, &mut rng).unwrap();
        let out = to_epaint(&mesh, &Camera::default(), rect());
        assert_eq!(out.vertices.len(), mesh.vertex_count());
        assert_eq!(out.indices.len(), mesh.triangle_count() * 3);
        assert!(out.vertices.iter().all(|v| rect().expand(1.0).contains(v.pos)));
    }

    #[test]
    fn far_triangles_come_first() {
        let mut rng = StdRng::seed_from_u64(8);
        let mesh = generate_terrain_mesh_with_rng(6, 30, &mut rng).unwrap();
        let camera = Camera::default();
        let projected = project(&mesh, &camera, rect());
        let out = to_epaint(&mesh, &camera, rect());
        let depths: Vec<f32> = out
            .indices
            .chunks_exact(3)
            .map(|t| t.iter().map(|&i| projected[i as usize].depth).sum())
            .collect();
        assert!(depths.windows(2).all(|w| w[0] >= w[1]));
    }
}
