//! Drawer stack and viewer state for contour rendering
//!
//! This crate turns the output of `contourkit-algorithms` into per-frame
//! draw batches:
//! - Drawers for the base mesh, silhouettes and suggestive contours
//! - Models owning a mesh, its cached fields and a stack of drawers
//! - Viewer state with key commands, transforms and a frame counter
//! - An orbiting camera for headless rendering

pub mod draw_buffer;
pub mod drawer;
pub mod base;
pub mod silhouette;
pub mod suggestive;
pub mod model;
pub mod fps;
pub mod camera;
pub mod viewer;

pub use draw_buffer::*;
pub use drawer::*;
pub use base::*;
pub use silhouette::*;
pub use suggestive::*;
pub use model::*;
pub use fps::*;
pub use camera::*;
pub use viewer::*;
