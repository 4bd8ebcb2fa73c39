//! Homogeneous transforms for model placement and viewing

use nalgebra::{Matrix4, Point3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// A 3D transformation stored as a homogeneous matrix.
///
/// The viewer keeps one per model plus a global one that places the scene in
/// front of the eye; the eye sits at the origin of the transformed space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    pub matrix: Matrix4<f32>,
}

impl Transform3D {
    /// No-op transform
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    pub fn translation(translation: Vector3<f32>) -> Self {
        Self {
            matrix: Translation3::from(translation).to_homogeneous(),
        }
    }

    pub fn rotation(rotation: UnitQuaternion<f32>) -> Self {
        Self {
            matrix: rotation.to_homogeneous(),
        }
    }

    pub fn uniform_scaling(scale: f32) -> Self {
        Self {
            matrix: Matrix4::new_scaling(scale),
        }
    }

    /// Map a point, including the translation and the projective divide
    pub fn transform_point(&self, point: &Point3<f32>) -> Point3<f32> {
        let homogeneous = self.matrix * point.to_homogeneous();
        Point3::from_homogeneous(homogeneous).unwrap_or(*point)
    }

    /// Apply the linear part of the transformation to a vector
    pub fn transform_vector(&self, vector: &Vector3<f32>) -> Vector3<f32> {
        self.matrix.fixed_view::<3, 3>(0, 0) * vector
    }

    /// Compose this transformation with another; `other` is applied first
    pub fn compose(self, other: Self) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// `None` for a singular matrix
    pub fn inverse(self) -> Option<Self> {
        self.matrix.try_inverse().map(Self::from)
    }

    /// Position, in the untransformed space, of the point this transform maps
    /// to the origin. With a view transform this is the eye position.
    pub fn eye_position(&self) -> Option<Point3<f32>> {
        self.inverse().map(|inv| inv.transform_point(&Point3::origin()))
    }

    /// Largest length of a transformed unit axis
    pub fn max_axis_scale(&self) -> f32 {
        let linear = self.matrix.fixed_view::<3, 3>(0, 0);
        (0..3)
            .map(|i| linear.column(i).norm())
            .fold(0.0f32, f32::max)
    }

    /// Frobenius distance to the identity below `epsilon`
    pub fn is_identity(&self, epsilon: f32) -> bool {
        (self.matrix - Matrix4::identity()).norm() < epsilon
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Transform3D {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.compose(rhs)
    }
}

impl From<Matrix4<f32>> for Transform3D {
    fn from(matrix: Matrix4<f32>) -> Self {
        Self { matrix }
    }
}
