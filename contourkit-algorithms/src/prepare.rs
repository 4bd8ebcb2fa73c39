//! Conversion of raw triangle meshes into analysed surfaces

use crate::curvature::{compute_point_areas, estimate_curvature_derivatives, estimate_curvatures};
use crate::normals::{compute_vertex_normals, sanitize_normals};
use contourkit_core::{CurvatureAttributes, Error, Result, SurfaceMesh, TriangleMesh};

/// Compute everything the contour pipeline needs from a raw mesh: vertex
/// normals (supplied ones are kept where usable), point areas, principal
/// curvatures and directions, curvature derivatives and a bounding sphere.
///
/// An empty mesh yields an empty surface. Meshes with out-of-range face
/// indices are rejected.
pub fn prepare_surface(mesh: TriangleMesh) -> Result<SurfaceMesh> {
    mesh.validate()?;
    let TriangleMesh {
        vertices,
        faces,
        normals,
    } = mesh;

    if vertices.is_empty() {
        if !faces.is_empty() {
            return Err(Error::InvalidMesh("faces reference a mesh without vertices".into()));
        }
        return Ok(SurfaceMesh::empty());
    }
    if vertices.iter().any(|p| !p.coords.iter().all(|c| c.is_finite())) {
        return Err(Error::InvalidMesh("vertex positions must be finite".into()));
    }

    let estimated = compute_vertex_normals(&vertices, &faces);
    let normals = match normals {
        Some(supplied) => sanitize_normals(&supplied, &estimated),
        None => estimated,
    };

    let areas = compute_point_areas(&vertices, &faces);
    let curvatures = estimate_curvatures(&vertices, &faces, &normals, &areas);
    let dcurv = estimate_curvature_derivatives(&vertices, &faces, &curvatures, &areas);

    log::debug!(
        "prepared surface with {} vertices and {} faces",
        vertices.len(),
        faces.len()
    );

    let attributes = CurvatureAttributes {
        normals,
        curv1: curvatures.curv1,
        curv2: curvatures.curv2,
        pdir1: curvatures.pdir1,
        pdir2: curvatures.pdir2,
        dcurv,
    };
    SurfaceMesh::new(vertices, faces, attributes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contourkit_core::{primitives, Point3f};

    #[test]
    fn test_empty_mesh_prepares_to_empty_surface() {
        let surface = prepare_surface(TriangleMesh::new()).unwrap();
        assert!(surface.is_empty());
    }

    #[test]
    fn test_rejects_out_of_range_faces() {
        let mesh = TriangleMesh::from_vertices_and_faces(
            vec![Point3f::origin(), Point3f::new(1.0, 0.0, 0.0)],
            vec![[0, 1, 2]],
        );
        assert!(prepare_surface(mesh).is_err());
    }

    #[test]
    fn test_flat_patch_has_zero_curvature() {
        let mut vertices = Vec::new();
        for y in 0..4 {
            for x in 0..4 {
                vertices.push(Point3f::new(x as f32, y as f32, 0.0));
            }
        }
        let mut faces = Vec::new();
        for y in 0..3 {
            for x in 0..3 {
                let i = y * 4 + x;
                faces.push([i, i + 1, i + 5]);
                faces.push([i, i + 5, i + 4]);
            }
        }
        let surface = prepare_surface(TriangleMesh::from_vertices_and_faces(vertices, faces)).unwrap();
        for i in 0..surface.vertex_count() {
            assert!(surface.curv1()[i].abs() < 1e-4);
            assert!(surface.curv2()[i].abs() < 1e-4);
        }
    }

    #[test]
    fn test_sphere_curvature_approaches_inverse_radius() {
        let reference = primitives::uv_sphere(2.0, 24, 48).unwrap();
        let raw = TriangleMesh::from_vertices_and_faces(
            reference.vertices().to_vec(),
            reference.faces().to_vec(),
        );
        let surface = prepare_surface(raw).unwrap();
        // Skip the polar caps, where the fan triangulation is irregular
        for i in (0..surface.vertex_count()).filter(|&i| surface.vertices()[i].z.abs() < 1.6) {
            assert!((surface.curv1()[i] - 0.5).abs() < 0.05, "curv1[{i}] = {}", surface.curv1()[i]);
            assert!((surface.curv2()[i] - 0.5).abs() < 0.05, "curv2[{i}] = {}", surface.curv2()[i]);
            assert!(surface.curv1()[i].abs() >= surface.curv2()[i].abs());
        }
    }
}
