//! Core data structures and traits for contourkit
//!
//! This crate provides the mesh types consumed by the contour pipeline:
//! raw triangle meshes as handed over by a loader, surface meshes carrying
//! normals, principal curvatures and curvature derivatives, bounding spheres,
//! transforms and a couple of analytic primitives.

pub mod point;
pub mod mesh;
pub mod bounds;
pub mod traits;
pub mod transform;
pub mod primitives;
pub mod error;

pub use point::*;
pub use mesh::*;
pub use bounds::*;
pub use traits::*;
pub use transform::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3, Matrix3, Matrix4, Isometry3, UnitQuaternion};
