//! Error types for contourkit

use thiserror::Error;

/// Main error type for contourkit operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("Attribute `{attribute}` has {found} entries, expected {expected}")]
    AttributeLength {
        attribute: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Face {face} references vertex {vertex}, but the mesh has {vertex_count} vertices")]
    FaceIndexOutOfBounds {
        face: usize,
        vertex: usize,
        vertex_count: usize,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for contourkit operations
pub type Result<T> = std::result::Result<T, Error>;
