/// Model-view transform and matrix builders
use nalgebra::{Matrix4, Vector3};

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Rotation about the vertical (Y) axis
    pub fn rotation_y(angle: f32) -> Matrix4<f32> {
        Matrix4::new_rotation(Vector3::new(0.0, angle, 0.0))
    }

    /// Rotation about the horizontal (X) axis
    pub fn rotation_x(angle: f32) -> Matrix4<f32> {
        Matrix4::new_rotation(Vector3::new(angle, 0.0, 0.0))
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Create a scale matrix
    pub fn scale_matrix(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(model_view: &Matrix4<f32>, projection: &Matrix4<f32>) -> Matrix4<f32> {
        projection * model_view
    }
}

/// Placement of the globe relative to the viewer.
///
/// Operations compose on the right, so rotations and scales act in the
/// globe's own frame. They return a new value; callers replace the current
/// transform with the result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelView {
    matrix: Matrix4<f32>,
}

impl ModelView {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Globe centered `distance` units in front of the viewer
    pub fn at_distance(distance: f32) -> Self {
        Self {
            matrix: Transform::translation_matrix(0.0, 0.0, -distance),
        }
    }

    pub fn from_matrix(matrix: Matrix4<f32>) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> &Matrix4<f32> {
        &self.matrix
    }

    /// Column-major elements, the layout GL uniform uploads expect
    pub fn as_slice(&self) -> &[f32] {
        self.matrix.as_slice()
    }

    pub fn rotated_y(&self, angle: f32) -> Self {
        Self::from_matrix(self.matrix * Transform::rotation_y(angle))
    }

    pub fn rotated_x(&self, angle: f32) -> Self {
        Self::from_matrix(self.matrix * Transform::rotation_x(angle))
    }

    pub fn scaled(&self, factor: f32) -> Self {
        Self::from_matrix(self.matrix * Transform::scale_matrix(factor, factor, factor))
    }

    pub fn is_invertible(&self) -> bool {
        self.matrix.try_inverse().is_some()
    }
}

impl Default for ModelView {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_identity_rotation() {
        let matrix = Transform::rotation_y(0.0) * Transform::rotation_x(0.0);
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_at_distance_moves_origin_back() {
        let mv = ModelView::at_distance(4.0);
        let p = mv.matrix().transform_point(&Point3::origin());
        assert!((p - Point3::new(0.0, 0.0, -4.0)).norm() < 1e-6);
    }

    #[test]
    fn test_rotation_applies_in_model_frame() {
        // Rotating after translation must not move the globe's center
        let mv = ModelView::at_distance(4.0).rotated_y(1.0).rotated_x(-0.5);
        let p = mv.matrix().transform_point(&Point3::origin());
        assert!((p - Point3::new(0.0, 0.0, -4.0)).norm() < 1e-5);
    }

    #[test]
    fn test_rotated_y_quarter_turn() {
        let mv = ModelView::identity().rotated_y(std::f32::consts::FRAC_PI_2);
        let p = mv.matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((p - Point3::new(0.0, 0.0, -1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_scaled_compounds() {
        let mv = ModelView::identity().scaled(1.1).scaled(1.1);
        assert!((mv.matrix()[(0, 0)] - 1.21).abs() < 1e-6);
        assert!((mv.matrix()[(3, 3)] - 1.0).abs() < 1e-6);
        assert!(mv.is_invertible());
    }

    #[test]
    fn test_operations_leave_original_untouched() {
        let mv = ModelView::at_distance(2.0);
        let _ = mv.scaled(0.5).rotated_y(0.3);
        assert_eq!(mv, ModelView::at_distance(2.0));
    }

    #[test]
    fn test_column_major_slice() {
        let mv = ModelView::at_distance(4.0);
        // Translation lives in elements 12..15 of a column-major 4x4
        assert!((mv.as_slice()[14] + 4.0).abs() < 1e-6);
    }
}
