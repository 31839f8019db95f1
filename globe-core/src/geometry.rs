/// Sphere geometry for globe rendering
use std::f32::consts::PI;

use nalgebra::{Point2, Point3, Vector3};

/// Largest band count along either axis. Keeps the vertex count inside the
/// `u32` index space and the index count inside a GL draw count.
pub const MAX_BANDS: u32 = 4096;

/// A mesh vertex resolved from the indexed arrays
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub tex_coord: Point2<f32>,
    pub normal: Vector3<f32>,
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Unnormalized face normal following the index winding.
    /// Its length is twice the triangle area.
    pub fn area_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        (v1 - v0).cross(&(v2 - v0))
    }

    /// Collapsed triangles appear at the poles where a whole ring shares one point
    pub fn is_degenerate(&self) -> bool {
        self.area_normal().norm() < 1e-7
    }

    pub fn centroid(&self) -> Point3<f32> {
        let [a, b, c] = &self.vertices;
        Point3::from((a.position.coords + b.position.coords + c.position.coords) / 3.0)
    }
}

/// Indexed triangle mesh with parallel position and texture coordinate arrays
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub positions: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            tex_coords: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    /// Generate a UV-sphere centered at the origin.
    ///
    /// Ring `i` sits at polar angle `i·π/latitude_bands` measured from +Y, so
    /// vertex 0 is the north pole. Each ring repeats its first vertex at
    /// `φ = 2π` to give the texture seam its own coordinates. A band count of
    /// zero produces an empty mesh; counts above [`MAX_BANDS`] are clamped.
    pub fn uv_sphere(radius: f32, latitude_bands: u32, longitude_bands: u32) -> Self {
        if latitude_bands > MAX_BANDS || longitude_bands > MAX_BANDS {
            log::warn!(
                "sphere bands {}x{} clamped to {}",
                latitude_bands,
                longitude_bands,
                MAX_BANDS
            );
        }
        let latitude_bands = latitude_bands.min(MAX_BANDS);
        let longitude_bands = longitude_bands.min(MAX_BANDS);

        if latitude_bands == 0 || longitude_bands == 0 {
            log::warn!(
                "sphere with {}x{} bands has no geometry",
                latitude_bands,
                longitude_bands
            );
            return Self::new();
        }

        let lat = latitude_bands as usize;
        let lon = longitude_bands as usize;
        let mut mesh = Self::with_capacity((lat + 1) * (lon + 1), lat * lon * 6);

        for i in 0..=latitude_bands {
            let theta = i as f32 * PI / latitude_bands as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();

            for j in 0..=longitude_bands {
                let phi = j as f32 * 2.0 * PI / longitude_bands as f32;
                let (sin_phi, cos_phi) = phi.sin_cos();

                mesh.positions.push([
                    radius * sin_theta * cos_phi,
                    radius * cos_theta,
                    radius * sin_theta * sin_phi,
                ]);
                mesh.tex_coords.push([
                    1.0 - j as f32 / longitude_bands as f32,
                    1.0 - i as f32 / latitude_bands as f32,
                ]);
            }
        }

        for i in 0..latitude_bands {
            for j in 0..longitude_bands {
                let first = i * (longitude_bands + 1) + j;
                let second = first + longitude_bands + 1;

                mesh.indices.extend_from_slice(&[first, second, first + 1]);
                mesh.indices.extend_from_slice(&[second, second + 1, first + 1]);
            }
        }

        log::debug!(
            "generated sphere mesh: {} vertices, {} triangles",
            mesh.vertex_count(),
            mesh.triangle_count()
        );

        mesh
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Positions as a contiguous `x, y, z` float array
    pub fn flat_positions(&self) -> &[f32] {
        self.positions.as_flattened()
    }

    /// Texture coordinates as a contiguous `u, v` float array
    pub fn flat_tex_coords(&self) -> &[f32] {
        self.tex_coords.as_flattened()
    }

    /// Outward unit normal of a vertex on a sphere centered at the origin
    pub fn normal(&self, index: usize) -> Vector3<f32> {
        Vector3::from(self.positions[index])
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::y)
    }

    pub fn vertex(&self, index: usize) -> Vertex {
        let [u, v] = self.tex_coords[index];
        Vertex {
            position: Point3::from(self.positions[index]),
            tex_coord: Point2::new(u, v),
            normal: self.normal(index),
        }
    }

    /// Iterate the faces in index order
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            Triangle::new(
                self.vertex(tri[0] as usize),
                self.vertex(tri[1] as usize),
                self.vertex(tri[2] as usize),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_match_band_layout() {
        for (lat, lon) in [(1, 1), (2, 3), (30, 30), (7, 64)] {
            let mesh = Mesh::uv_sphere(1.0, lat, lon);
            let expected = ((lat + 1) * (lon + 1)) as usize;
            assert_eq!(mesh.vertex_count(), expected);
            assert_eq!(mesh.tex_coords.len(), expected);
            assert_eq!(mesh.indices.len(), (6 * lat * lon) as usize);
            assert_eq!(mesh.triangle_count(), (2 * lat * lon) as usize);
        }
    }

    #[test]
    fn test_indices_in_range() {
        let mesh = Mesh::uv_sphere(2.5, 12, 17);
        let count = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
    }

    #[test]
    fn test_tex_coords_in_unit_square() {
        let mesh = Mesh::uv_sphere(1.0, 9, 13);
        for [u, v] in &mesh.tex_coords {
            assert!((0.0..=1.0).contains(u), "u out of range: {}", u);
            assert!((0.0..=1.0).contains(v), "v out of range: {}", v);
        }
    }

    #[test]
    fn test_minimal_sphere() {
        let mesh = Mesh::uv_sphere(1.0, 1, 1);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices.len(), 6);
        assert_eq!(mesh.indices, vec![0, 2, 1, 2, 3, 1]);

        let [x, y, z] = mesh.positions[0];
        assert!(x.abs() < 1e-6);
        assert!((y - 1.0).abs() < 1e-6);
        assert!(z.abs() < 1e-6);

        // Second vertex of the north ring is still the pole
        let [x, y, z] = mesh.positions[1];
        assert!(x.abs() < 1e-6 && (y - 1.0).abs() < 1e-6 && z.abs() < 1e-6);
    }

    #[test]
    fn test_vertices_lie_on_sphere() {
        let radius = 3.0;
        let mesh = Mesh::uv_sphere(radius, 10, 20);
        for p in &mesh.positions {
            let r = Vector3::from(*p).norm();
            assert!((r - radius).abs() < 1e-5);
        }
    }

    #[test]
    fn test_seam_vertices_share_position_not_tex_coord() {
        let lon = 8;
        let mesh = Mesh::uv_sphere(1.0, 4, lon);
        let ring = 2 * (lon as usize + 1);
        let start = Vector3::from(mesh.positions[ring]);
        let end = Vector3::from(mesh.positions[ring + lon as usize]);
        assert!((start - end).norm() < 1e-5);
        assert_eq!(mesh.tex_coords[ring][0], 1.0);
        assert_eq!(mesh.tex_coords[ring + lon as usize][0], 0.0);
    }

    #[test]
    fn test_consistent_winding() {
        let mesh = Mesh::uv_sphere(1.0, 16, 24);
        let mut checked = 0;
        for tri in mesh.triangles() {
            if tri.is_degenerate() {
                continue;
            }
            let outward = tri.centroid().coords;
            assert!(tri.area_normal().dot(&outward) < 0.0);
            checked += 1;
        }
        // Pole rings contribute one collapsed triangle per cell
        assert_eq!(checked, mesh.triangle_count() - 2 * 24);
    }

    #[test]
    fn test_zero_bands_is_empty() {
        assert!(Mesh::uv_sphere(1.0, 0, 10).is_empty());
        assert_eq!(Mesh::uv_sphere(1.0, 10, 0).vertex_count(), 0);
    }

    #[test]
    fn test_oversized_bands_are_clamped() {
        let mesh = Mesh::uv_sphere(1.0, 1, u32::MAX);
        assert_eq!(mesh.vertex_count(), 2 * (MAX_BANDS as usize + 1));
        assert_eq!(mesh.indices.len(), 6 * MAX_BANDS as usize);
        let count = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
    }

    #[test]
    fn test_flat_arrays() {
        let mesh = Mesh::uv_sphere(1.0, 3, 4);
        assert_eq!(mesh.flat_positions().len(), mesh.vertex_count() * 3);
        assert_eq!(mesh.flat_tex_coords().len(), mesh.vertex_count() * 2);
        assert_eq!(mesh.flat_positions()[1], mesh.positions[0][1]);
    }

    #[test]
    fn test_normal_points_outward() {
        let mesh = Mesh::uv_sphere(2.0, 6, 6);
        let n = mesh.normal(0);
        assert!((n - Vector3::y()).norm() < 1e-6);
        for i in 0..mesh.vertex_count() {
            assert!((mesh.normal(i).norm() - 1.0).abs() < 1e-5);
        }
    }
}
