//! Differential-geometry algorithms behind object-space contour rendering
//!
//! This crate provides:
//! - Mesh preparation: vertex normals, point areas, principal curvature and
//!   curvature-derivative estimation, edge topology
//! - View-independent analysis: face normals and feature size
//! - View-dependent fields: n·v, radial curvature and its derivative
//! - Contour extraction: edge and face silhouettes, suggestive contours
//! - A per-vertex tone pass and image-space edge filters

pub mod normals;
pub mod curvature;
pub mod prepare;
pub mod topology;
pub mod view_independent;
pub mod view_dependent;
pub mod contours;
pub mod tone;
pub mod image_space;

pub use normals::*;
pub use curvature::*;
pub use prepare::*;
pub use topology::*;
pub use view_independent::*;
pub use view_dependent::*;
pub use contours::*;
pub use tone::*;
pub use image_space::*;

/// Hermite smoothstep: 0 below `edge0`, 1 above `edge1`, smooth in between.
/// A degenerate interval acts as a hard step at `edge0`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
