//! # contourkit
//!
//! Line drawings of smooth surfaces from triangle meshes.
//!
//! This is the umbrella crate that provides convenient access to all contourkit
//! functionality. You can use this crate to get everything in one place, or use
//! individual crates for more granular control over dependencies.
//!
//! ## Features
//!
//! - **Core**: Mesh data structures (TriangleMesh, SurfaceMesh, BoundingSphere, Transform3D)
//! - **Algorithms**: Curvature estimation, view-dependent fields and contour extraction
//! - **Render**: Drawers, per-frame draw batches and viewer state
//!
//! ## Quick Start
//!
//! ```rust
//! use contourkit::prelude::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mesh = primitives::torus(3.0, 1.0, 48, 24)?;
//! let mut model = Model::new_seeded(mesh, 7);
//! model.push_drawer(Box::new(EdgeSilhouetteDrawer::default()));
//! model.push_drawer(Box::new(SuggestiveContourDrawer::default()));
//!
//! let frame = model.render(&Point3f::new(0.0, -12.0, 4.0));
//! assert!(frame.segment_count() > 0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables algorithms and render
//! - `algorithms`: Mesh preparation and contour extraction
//! - `render`: Drawer stack and viewer state (implies `algorithms`)

// Re-export core functionality
pub use contourkit_core::*;

// Re-export sub-crates
#[cfg(feature = "algorithms")]
pub use contourkit_algorithms as algorithms;

#[cfg(feature = "render")]
pub use contourkit_render as render;

/// Convenient imports for common use cases
pub mod prelude {
    pub use contourkit_core::*;

    #[cfg(feature = "algorithms")]
    pub use contourkit_algorithms::*;

    #[cfg(feature = "render")]
    pub use contourkit_render::*;
}
