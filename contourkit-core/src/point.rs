//! Point, vector and color types shared across the workspace

use nalgebra::{Point3, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// Linear RGB color, components in `[0, 1]`
pub type Rgb = [f32; 3];

/// Linear RGBA color, components in `[0, 1]`
pub type Rgba = [f32; 4];

/// Derivative of the curvature tensor at a vertex, expressed in the local
/// principal frame as `[C111, C112, C122, C222]`.
pub type CurvatureDerivative = [f32; 4];

/// Attach an alpha channel to an RGB color
#[inline]
pub fn with_alpha(color: Rgb, alpha: f32) -> Rgba {
    [color[0], color[1], color[2], alpha]
}

/// Linearly interpolate between two points, `t = 0` giving `a`
#[inline]
pub fn lerp_point(a: &Point3f, b: &Point3f, t: f32) -> Point3f {
    a + (b - a) * t
}
