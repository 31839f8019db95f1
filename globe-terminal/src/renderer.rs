/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use globe_core::{Mesh, ModelView, Projection, Triangle};
use nalgebra::{Point2, Vector3};
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Checker cells across the texture, matching 30° of longitude and latitude
const CHECKER_COLUMNS: f32 = 12.0;
const CHECKER_ROWS: f32 = 6.0;
const CHECKER_DARK: f32 = 0.55;

/// A vertex after projection: screen position, depth, shading inputs
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    x: f32,
    y: f32,
    depth: f32,
    tex_coord: Point2<f32>,
    normal: Vector3<f32>,
}

/// ASCII renderer that converts the globe mesh to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    light_dir: Vector3<f32>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            light_dir: Vector3::new(-0.4, 0.5, 1.0).normalize(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    /// Number of cells the last frame drew into
    pub fn covered_cells(&self) -> usize {
        self.depth_buffer.iter().filter(|d| d.is_finite()).count()
    }

    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.char_buffer[y * self.width + x])
    }

    /// Projection whose aspect accounts for cells being about twice as tall as wide
    pub fn projection(&self, settings: &globe_core::config::CameraSettings) -> Projection {
        Projection::from_settings(settings, self.width as u32, (self.height * 2) as u32)
    }

    pub fn render_mesh(&mut self, mesh: &Mesh, model_view: &ModelView, projection: &Projection) {
        for triangle in mesh.triangles() {
            self.render_triangle(&triangle, model_view, projection);
        }
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        model_view: &ModelView,
        projection: &Projection,
    ) {
        // Project vertices to screen space
        let mut screen = [None; 3];
        for (slot, vertex) in screen.iter_mut().zip(&triangle.vertices) {
            let (x, y, depth) = match projection.project_to_screen(
                &vertex.position,
                model_view.matrix(),
                self.width as u32,
                self.height as u32,
            ) {
                Some(hit) => hit,
                None => return, // Triangle is clipped
            };
            let normal = model_view
                .matrix()
                .transform_vector(&vertex.normal)
                .try_normalize(f32::EPSILON)
                .unwrap_or(vertex.normal);
            *slot = Some(ScreenVertex {
                x,
                y,
                depth,
                tex_coord: vertex.tex_coord,
                normal,
            });
        }

        if let [Some(v0), Some(v1), Some(v2)] = screen {
            self.rasterize_triangle(&[v0, v1, v2]);
        }
    }

    fn rasterize_triangle(&mut self, v: &[ScreenVertex; 3]) {
        // Bounding box
        let min_x = v[0].x.min(v[1].x).min(v[2].x).floor() as i32;
        let max_x = v[0].x.max(v[1].x).max(v[2].x).ceil() as i32;
        let min_y = v[0].y.min(v[1].y).min(v[2].y).floor() as i32;
        let max_y = v[0].y.max(v[1].y).max(v[2].y).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) = barycentric(
                    (v[0].x, v[0].y),
                    (v[1].x, v[1].y),
                    (v[2].x, v[2].y),
                    (px, py),
                ) else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v[0].depth + w1 * v[1].depth + w2 * v[2].depth;
                let idx = y as usize * self.width + x as usize;
                if depth >= self.depth_buffer[idx] {
                    continue;
                }

                let uv = Point2::from(
                    v[0].tex_coord.coords * w0
                        + v[1].tex_coord.coords * w1
                        + v[2].tex_coord.coords * w2,
                );
                let normal = v[0].normal * w0 + v[1].normal * w1 + v[2].normal * w2;

                self.depth_buffer[idx] = depth;
                self.char_buffer[idx] = self.shade(&normal, &uv);
            }
        }
    }

    /// Lambert shading modulated by a latitude/longitude checker
    fn shade(&self, normal: &Vector3<f32>, uv: &Point2<f32>) -> char {
        let brightness = normal
            .try_normalize(f32::EPSILON)
            .map(|n| n.dot(&self.light_dir).max(0.0))
            .unwrap_or(0.0);

        let cell = (uv.x * CHECKER_COLUMNS).floor() as i32 + (uv.y * CHECKER_ROWS).floor() as i32;
        let albedo = if cell.rem_euclid(2) == 0 { 1.0 } else { CHECKER_DARK };

        // Unlit surface still shows as the dimmest visible glyph
        let level = (brightness * albedo).max(0.15);
        let char_index = (level * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)]
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let c = self.char_buffer[y * self.width + x];

                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkBlue,
                    '-' | '=' => Color::Blue,
                    '+' | '*' => Color::Cyan,
                    '#' | '%' | '@' => Color::White,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use globe_core::config::CameraSettings;

    fn render_default(width: usize, height: usize, mesh: &Mesh) -> AsciiRenderer {
        let mut renderer = AsciiRenderer::new(width, height);
        let projection = renderer.projection(&CameraSettings::default());
        renderer.render_mesh(mesh, &ModelView::at_distance(4.0), &projection);
        renderer
    }

    #[test]
    fn test_globe_covers_center() {
        let renderer = render_default(80, 24, &Mesh::uv_sphere(1.0, 30, 30));
        assert!(renderer.covered_cells() > 0);
        assert_ne!(renderer.char_at(40, 12), Some(' '));
    }

    #[test]
    fn test_globe_leaves_corners_empty() {
        let renderer = render_default(80, 24, &Mesh::uv_sphere(1.0, 30, 30));
        assert_eq!(renderer.char_at(0, 0), Some(' '));
        assert_eq!(renderer.char_at(79, 23), Some(' '));
    }

    #[test]
    fn test_zoom_in_covers_more() {
        let mesh = Mesh::uv_sphere(1.0, 30, 30);
        let far = render_default(80, 24, &mesh).covered_cells();

        let mut renderer = AsciiRenderer::new(80, 24);
        let projection = renderer.projection(&CameraSettings::default());
        let near = ModelView::at_distance(4.0).scaled(1.1).scaled(1.1);
        renderer.render_mesh(&mesh, &near, &projection);

        assert!(renderer.covered_cells() > far);
    }

    #[test]
    fn test_empty_mesh_draws_nothing() {
        let renderer = render_default(40, 12, &Mesh::new());
        assert_eq!(renderer.covered_cells(), 0);
    }

    #[test]
    fn test_clear_resets_buffers() {
        let mut renderer = render_default(40, 12, &Mesh::uv_sphere(1.0, 8, 8));
        renderer.clear();
        assert_eq!(renderer.covered_cells(), 0);
        assert_eq!(renderer.char_at(20, 6), Some(' '));
    }

    #[test]
    fn test_char_at_out_of_bounds() {
        let renderer = AsciiRenderer::new(4, 4);
        assert_eq!(renderer.char_at(4, 0), None);
    }

    #[test]
    fn test_barycentric_vertices() {
        let w = barycentric((0.0, 0.0), (4.0, 0.0), (0.0, 4.0), (0.0, 0.0)).unwrap();
        assert!((w.0 - 1.0).abs() < 1e-6);
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.5, 0.5)).is_none());
    }
}
