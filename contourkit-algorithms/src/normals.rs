//! Vertex normal estimation

use contourkit_core::{Point3f, Vector3f};

/// Recompute vertex normals from triangle geometry (area-weighted).
///
/// Each triangle's unnormalized face normal, whose length is twice its area,
/// is accumulated at its three corners and the sums are normalized. Vertices
/// without a non-degenerate incident face get `+Z`.
pub fn compute_vertex_normals(vertices: &[Point3f], faces: &[[usize; 3]]) -> Vec<Vector3f> {
    let mut normals = vec![Vector3f::zeros(); vertices.len()];

    for &[a, b, c] in faces {
        let n = (vertices[b] - vertices[a]).cross(&(vertices[c] - vertices[a]));
        normals[a] += n;
        normals[b] += n;
        normals[c] += n;
    }

    let mut orphaned = 0usize;
    for n in &mut normals {
        *n = n.try_normalize(1e-20).unwrap_or_else(|| {
            orphaned += 1;
            Vector3f::z()
        });
    }
    if orphaned > 0 {
        log::debug!("{orphaned} vertices have no usable incident face, defaulting their normals to +Z");
    }

    normals
}

/// Normalize externally supplied normals, falling back to the estimated
/// normal wherever the supplied one is zero or not finite
pub fn sanitize_normals(supplied: &[Vector3f], estimated: &[Vector3f]) -> Vec<Vector3f> {
    supplied
        .iter()
        .zip(estimated)
        .map(|(n, fallback)| {
            n.try_normalize(1e-20)
                .filter(|n| n.iter().all(|c| c.is_finite()))
                .unwrap_or(*fallback)
        })
        .collect()
}
