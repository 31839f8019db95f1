/// Perspective projection and screen-space utilities
use nalgebra::{Matrix4, Point3};

use crate::config::CameraSettings;
use crate::transform::Transform;

/// Perspective projection for the globe view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            fov_y: std::f32::consts::PI / 4.0, // 45 degrees
            aspect: width as f32 / height.max(1) as f32,
            near: 0.1,
            far: 100.0,
        }
    }

    pub fn from_settings(settings: &CameraSettings, width: u32, height: u32) -> Self {
        Self {
            fov_y: settings.fov_y_degrees.to_radians(),
            aspect: width as f32 / height.max(1) as f32,
            near: settings.near,
            far: settings.far,
        }
    }

    /// Create the projection matrix
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov_y, self.near, self.far)
    }

    /// Project a model-space point to screen space.
    ///
    /// Returns `(x, y, depth)` with the origin at the top-left corner and
    /// depth in normalized device coordinates, or `None` when the point lies
    /// behind the viewer or outside the view volume.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_view: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let mvp = Transform::mvp_matrix(model_view, &self.matrix());
        let clip = mvp * point.to_homogeneous();

        // Prevent division by near-zero w
        if clip.w < 1e-6 {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.z / clip.w;

        // Clip test
        if !(-1.0..=1.0).contains(&ndc_x)
            || !(-1.0..=1.0).contains(&ndc_y)
            || !(-1.0..=1.0).contains(&depth)
        {
            return None;
        }

        // Convert to screen space
        let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;

        Some((screen_x, screen_y, depth))
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::ModelView;

    #[test]
    fn test_projection_creation() {
        let projection = Projection::new(800, 600);
        assert!((projection.aspect - 800.0 / 600.0).abs() < 1e-6);
        assert!((projection.fov_y - std::f32::consts::FRAC_PI_4).abs() < 1e-6);
    }

    #[test]
    fn test_from_settings_converts_degrees() {
        let settings = CameraSettings {
            fov_y_degrees: 90.0,
            ..CameraSettings::default()
        };
        let projection = Projection::from_settings(&settings, 400, 400);
        assert!((projection.fov_y - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!((projection.aspect - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_center_projects_to_screen_center() {
        let projection = Projection::default();
        let mv = ModelView::at_distance(4.0);
        let (x, y, depth) = projection
            .project_to_screen(&Point3::origin(), mv.matrix(), 800, 600)
            .expect("origin should be visible");
        assert!((x - 400.0).abs() < 1e-3);
        assert!((y - 300.0).abs() < 1e-3);
        assert!(depth > -1.0 && depth < 1.0);
    }

    #[test]
    fn test_north_pole_is_above_center() {
        let projection = Projection::default();
        let mv = ModelView::at_distance(4.0);
        let (_, y, _) = projection
            .project_to_screen(&Point3::new(0.0, 1.0, 0.0), mv.matrix(), 800, 600)
            .expect("pole should be visible");
        assert!(y < 300.0);
    }

    #[test]
    fn test_point_behind_viewer_is_clipped() {
        let projection = Projection::default();
        let mv = ModelView::identity();
        let hit = projection.project_to_screen(&Point3::new(0.0, 0.0, 5.0), mv.matrix(), 800, 600);
        assert!(hit.is_none());
    }
}
