//! Mesh data structures and functionality

use crate::bounds::BoundingSphere;
use crate::error::{Error, Result};
use crate::point::*;
use serde::{Deserialize, Serialize};

/// A triangle mesh with vertices and faces, as handed over by a loader
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
    pub normals: Option<Vec<Vector3f>>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            normals: None,
        }
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Self {
        Self {
            vertices,
            faces,
            normals: None,
        }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Set vertex normals, ignored when the count does not match
    pub fn set_normals(&mut self, normals: Vec<Vector3f>) {
        if normals.len() == self.vertices.len() {
            self.normals = Some(normals);
        }
    }

    /// Check that every face references an existing vertex
    pub fn validate(&self) -> Result<()> {
        validate_faces(&self.faces, self.vertices.len())?;
        if let Some(normals) = &self.normals {
            check_len("normals", normals.len(), self.vertices.len())?;
        }
        Ok(())
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-vertex differential attributes of a surface
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurvatureAttributes {
    /// Unit vertex normals
    pub normals: Vec<Vector3f>,
    /// Maximum principal curvature (by magnitude)
    pub curv1: Vec<f32>,
    /// Minimum principal curvature (by magnitude)
    pub curv2: Vec<f32>,
    /// Principal direction of `curv1`
    pub pdir1: Vec<Vector3f>,
    /// Principal direction of `curv2`
    pub pdir2: Vec<Vector3f>,
    /// Curvature derivative tensor in the `(pdir1, pdir2)` frame
    pub dcurv: Vec<CurvatureDerivative>,
}

/// An immutable triangle mesh carrying everything the contour pipeline reads:
/// positions, topology, normals, principal curvatures and directions, the
/// curvature derivative tensor and a bounding sphere.
///
/// Construction validates that every attribute has one entry per vertex and
/// that faces only reference existing vertices, so downstream code may index
/// freely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceMesh {
    vertices: Vec<Point3f>,
    faces: Vec<[usize; 3]>,
    attributes: CurvatureAttributes,
    bsphere: BoundingSphere,
}

impl SurfaceMesh {
    /// Build a surface mesh, computing the bounding sphere from the vertices
    pub fn new(
        vertices: Vec<Point3f>,
        faces: Vec<[usize; 3]>,
        attributes: CurvatureAttributes,
    ) -> Result<Self> {
        let bsphere = BoundingSphere::from_points(&vertices);
        Self::with_bounding_sphere(vertices, faces, attributes, bsphere)
    }

    /// Build a surface mesh with a precomputed bounding sphere
    pub fn with_bounding_sphere(
        vertices: Vec<Point3f>,
        faces: Vec<[usize; 3]>,
        attributes: CurvatureAttributes,
        bsphere: BoundingSphere,
    ) -> Result<Self> {
        let nv = vertices.len();
        check_len("normals", attributes.normals.len(), nv)?;
        check_len("curv1", attributes.curv1.len(), nv)?;
        check_len("curv2", attributes.curv2.len(), nv)?;
        check_len("pdir1", attributes.pdir1.len(), nv)?;
        check_len("pdir2", attributes.pdir2.len(), nv)?;
        check_len("dcurv", attributes.dcurv.len(), nv)?;
        validate_faces(&faces, nv)?;
        if !bsphere.radius.is_finite() || bsphere.radius < 0.0 {
            return Err(Error::InvalidMesh(format!(
                "bounding sphere radius must be finite and non-negative, got {}",
                bsphere.radius
            )));
        }
        Ok(Self {
            vertices,
            faces,
            attributes,
            bsphere,
        })
    }

    /// A mesh with no vertices and no faces
    pub fn empty() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            attributes: CurvatureAttributes::default(),
            bsphere: BoundingSphere::default(),
        }
    }

    pub fn vertices(&self) -> &[Point3f] {
        &self.vertices
    }

    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    pub fn normals(&self) -> &[Vector3f] {
        &self.attributes.normals
    }

    pub fn curv1(&self) -> &[f32] {
        &self.attributes.curv1
    }

    pub fn curv2(&self) -> &[f32] {
        &self.attributes.curv2
    }

    pub fn pdir1(&self) -> &[Vector3f] {
        &self.attributes.pdir1
    }

    pub fn pdir2(&self) -> &[Vector3f] {
        &self.attributes.pdir2
    }

    pub fn dcurv(&self) -> &[CurvatureDerivative] {
        &self.attributes.dcurv
    }

    pub fn attributes(&self) -> &CurvatureAttributes {
        &self.attributes
    }

    pub fn bounding_sphere(&self) -> BoundingSphere {
        self.bsphere
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Positions of the three corners of a face
    #[inline]
    pub fn face_points(&self, face: usize) -> [Point3f; 3] {
        let [a, b, c] = self.faces[face];
        [self.vertices[a], self.vertices[b], self.vertices[c]]
    }

    /// A copy of this mesh uniformly scaled about the origin. Curvatures
    /// scale by `1/s` and their derivatives by `1/s²`, so the result
    /// describes the same shape at a different size.
    pub fn scaled(&self, s: f32) -> Result<Self> {
        if !(s.is_finite() && s > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "scale factor must be positive, got {s}"
            )));
        }
        let inv = 1.0 / s;
        let mut attributes = self.attributes.clone();
        attributes.curv1.iter_mut().for_each(|k| *k *= inv);
        attributes.curv2.iter_mut().for_each(|k| *k *= inv);
        attributes
            .dcurv
            .iter_mut()
            .for_each(|d| d.iter_mut().for_each(|c| *c *= inv * inv));
        Ok(Self {
            vertices: self.vertices.iter().map(|p| Point3f::from(p.coords * s)).collect(),
            faces: self.faces.clone(),
            attributes,
            bsphere: BoundingSphere::new(
                Point3f::from(self.bsphere.center.coords * s),
                self.bsphere.radius * s,
            ),
        })
    }
}

fn check_len(attribute: &'static str, found: usize, expected: usize) -> Result<()> {
    if found != expected {
        return Err(Error::AttributeLength {
            attribute,
            expected,
            found,
        });
    }
    Ok(())
}

fn validate_faces(faces: &[[usize; 3]], vertex_count: usize) -> Result<()> {
    for (face, indices) in faces.iter().enumerate() {
        if let Some(&vertex) = indices.iter().find(|&&v| v >= vertex_count) {
            return Err(Error::FaceIndexOutOfBounds {
                face,
                vertex,
                vertex_count,
            });
        }
    }
    Ok(())
}
