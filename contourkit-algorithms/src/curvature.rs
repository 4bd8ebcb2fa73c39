//! Principal curvature and curvature-derivative estimation
//!
//! Implements the per-face least-squares estimators of Rusinkiewicz
//! ("Estimating Curvatures and Their Derivatives on Triangle Meshes", 2004):
//! the second fundamental form is fitted per face from the variation of
//! vertex normals along its edges, the derivative tensor from the variation
//! of the projected curvature tensors. Per-face results are re-expressed in
//! each vertex's tangent frame and averaged with Voronoi corner-area weights.

use contourkit_core::{CurvatureDerivative, Point3f, Vector3f};
use nalgebra::{Matrix3, Matrix4, Vector3, Vector4};

/// Voronoi areas of each face corner and their per-vertex sums
#[derive(Debug, Clone, Default)]
pub struct PointAreas {
    pub corner_areas: Vec<[f32; 3]>,
    pub point_areas: Vec<f32>,
}

impl PointAreas {
    /// Weight of face `face`, corner `corner` in the average at its vertex
    #[inline]
    fn weight(&self, face: usize, corner: usize, vertex: usize) -> Option<f32> {
        let area = self.point_areas[vertex];
        (area > 0.0).then(|| self.corner_areas[face][corner] / area)
    }
}

/// Principal curvatures and directions per vertex
#[derive(Debug, Clone, Default)]
pub struct PrincipalCurvatures {
    pub curv1: Vec<f32>,
    pub curv2: Vec<f32>,
    pub pdir1: Vec<Vector3f>,
    pub pdir2: Vec<Vector3f>,
}

/// Edge vectors of a face; edge `j` is opposite corner `j`
#[inline]
fn face_edges(vertices: &[Point3f], face: &[usize; 3]) -> [Vector3f; 3] {
    [
        vertices[face[2]] - vertices[face[1]],
        vertices[face[0]] - vertices[face[2]],
        vertices[face[1]] - vertices[face[0]],
    ]
}

#[inline]
fn next(j: usize) -> usize {
    (j + 1) % 3
}

#[inline]
fn prev(j: usize) -> usize {
    (j + 2) % 3
}

/// Tangent/bitangent frame of a face, `None` for degenerate faces
fn face_frame(e: &[Vector3f; 3]) -> Option<(Vector3f, Vector3f)> {
    let t = e[0].try_normalize(1e-20)?;
    let n = e[0].cross(&e[1]);
    let b = n.cross(&t).try_normalize(1e-20)?;
    Some((t, b))
}

/// Compute Voronoi corner areas, splitting obtuse triangles so that the
/// obtuse corner receives half the area (Meyer et al. 2003).
pub fn compute_point_areas(vertices: &[Point3f], faces: &[[usize; 3]]) -> PointAreas {
    let mut point_areas = vec![0.0f32; vertices.len()];
    let mut corner_areas = Vec::with_capacity(faces.len());

    for face in faces {
        let e = face_edges(vertices, face);
        let area = 0.5 * e[0].cross(&e[1]).norm();
        let mut c = [0.0f32; 3];

        if area > 0.0 && area.is_finite() {
            let l2 = [e[0].norm_squared(), e[1].norm_squared(), e[2].norm_squared()];
            let ew = [
                l2[0] * (l2[1] + l2[2] - l2[0]),
                l2[1] * (l2[2] + l2[0] - l2[1]),
                l2[2] * (l2[0] + l2[1] - l2[2]),
            ];
            if ew[0] <= 0.0 {
                c[1] = -0.25 * l2[2] * area / e[0].dot(&e[2]);
                c[2] = -0.25 * l2[1] * area / e[0].dot(&e[1]);
                c[0] = area - c[1] - c[2];
            } else if ew[1] <= 0.0 {
                c[2] = -0.25 * l2[0] * area / e[1].dot(&e[0]);
                c[0] = -0.25 * l2[2] * area / e[1].dot(&e[2]);
                c[1] = area - c[2] - c[0];
            } else if ew[2] <= 0.0 {
                c[0] = -0.25 * l2[1] * area / e[2].dot(&e[1]);
                c[1] = -0.25 * l2[0] * area / e[2].dot(&e[0]);
                c[2] = area - c[0] - c[1];
            } else {
                let ewscale = 0.5 * area / (ew[0] + ew[1] + ew[2]);
                for j in 0..3 {
                    c[j] = ewscale * (ew[next(j)] + ew[prev(j)]);
                }
            }
            if !c.iter().all(|a| a.is_finite()) {
                c = [area / 3.0; 3];
            }
        }

        for j in 0..3 {
            point_areas[face[j]] += c[j];
        }
        corner_areas.push(c);
    }

    PointAreas {
        corner_areas,
        point_areas,
    }
}

/// Rotate the frame `(old_u, old_v)` so that its normal becomes `new_norm`
fn rot_coord_sys(old_u: &Vector3f, old_v: &Vector3f, new_norm: &Vector3f) -> (Vector3f, Vector3f) {
    let old_norm = old_u.cross(old_v);
    let ndot = old_norm.dot(new_norm);
    if ndot <= -1.0 {
        return (-old_u, -old_v);
    }
    let perp_old = new_norm - old_norm * ndot;
    let dperp = (old_norm + new_norm) / (1.0 + ndot);
    (
        old_u - dperp * old_u.dot(&perp_old),
        old_v - dperp * old_v.dot(&perp_old),
    )
}

/// Re-express a curvature tensor `(ku, kuv, kv)` given in the orthonormal
/// frame `(old_u, old_v)` in the frame `(new_u, new_v)`
pub fn project_curvature(
    old_u: &Vector3f,
    old_v: &Vector3f,
    tensor: Vector3<f32>,
    new_u: &Vector3f,
    new_v: &Vector3f,
) -> Vector3<f32> {
    let (r_new_u, r_new_v) = rot_coord_sys(new_u, new_v, &old_u.cross(old_v));
    let (ku, kuv, kv) = (tensor[0], tensor[1], tensor[2]);

    let u1 = r_new_u.dot(old_u);
    let v1 = r_new_u.dot(old_v);
    let u2 = r_new_v.dot(old_u);
    let v2 = r_new_v.dot(old_v);
    Vector3::new(
        ku * u1 * u1 + kuv * (2.0 * u1 * v1) + kv * v1 * v1,
        ku * u1 * u2 + kuv * (u1 * v2 + u2 * v1) + kv * v1 * v2,
        ku * u2 * u2 + kuv * (2.0 * u2 * v2) + kv * v2 * v2,
    )
}

/// Re-express a curvature derivative tensor in another tangent frame
pub fn project_curvature_derivative(
    old_u: &Vector3f,
    old_v: &Vector3f,
    dcurv: &CurvatureDerivative,
    new_u: &Vector3f,
    new_v: &Vector3f,
) -> CurvatureDerivative {
    let (r_new_u, r_new_v) = rot_coord_sys(new_u, new_v, &old_u.cross(old_v));

    let u1 = r_new_u.dot(old_u);
    let v1 = r_new_u.dot(old_v);
    let u2 = r_new_v.dot(old_u);
    let v2 = r_new_v.dot(old_v);
    let [c0, c1, c2, c3] = *dcurv;

    [
        c0 * u1 * u1 * u1 + c1 * 3.0 * u1 * u1 * v1 + c2 * 3.0 * u1 * v1 * v1 + c3 * v1 * v1 * v1,
        c0 * u1 * u1 * u2
            + c1 * (u1 * u1 * v2 + 2.0 * u2 * u1 * v1)
            + c2 * (u2 * v1 * v1 + 2.0 * u1 * v1 * v2)
            + c3 * v1 * v1 * v2,
        c0 * u1 * u2 * u2
            + c1 * (u2 * u2 * v1 + 2.0 * u1 * u2 * v2)
            + c2 * (u1 * v2 * v2 + 2.0 * u2 * v2 * v1)
            + c3 * v1 * v2 * v2,
        c0 * u2 * u2 * u2 + c1 * 3.0 * u2 * u2 * v2 + c2 * 3.0 * u2 * v2 * v2 + c3 * v2 * v2 * v2,
    ]
}

/// Diagonalize a curvature tensor with a Jacobi rotation.
///
/// Returns `(pdir1, pdir2, k1, k2)` with `|k1| >= |k2|`, both directions
/// perpendicular to `new_norm` and `pdir2 = new_norm × pdir1`.
pub fn diagonalize_curvature(
    old_u: &Vector3f,
    old_v: &Vector3f,
    tensor: Vector3<f32>,
    new_norm: &Vector3f,
) -> (Vector3f, Vector3f, f32, f32) {
    let (r_old_u, r_old_v) = rot_coord_sys(old_u, old_v, new_norm);
    let (ku, kuv, kv) = (tensor[0], tensor[1], tensor[2]);

    let (mut c, mut s, mut tt) = (1.0f32, 0.0f32, 0.0f32);
    if kuv != 0.0 {
        let h = 0.5 * (kv - ku) / kuv;
        tt = if h < 0.0 {
            1.0 / (h - (1.0 + h * h).sqrt())
        } else {
            1.0 / (h + (1.0 + h * h).sqrt())
        };
        c = 1.0 / (1.0 + tt * tt).sqrt();
        s = tt * c;
    }

    let mut k1 = ku - tt * kuv;
    let mut k2 = kv + tt * kuv;

    let pdir1 = if k1.abs() >= k2.abs() {
        r_old_u * c - r_old_v * s
    } else {
        std::mem::swap(&mut k1, &mut k2);
        r_old_u * s + r_old_v * c
    };
    let pdir2 = new_norm.cross(&pdir1);
    (pdir1, pdir2, k1, k2)
}

/// Any unit vector perpendicular to `n`
fn perpendicular(n: &Vector3f) -> Vector3f {
    let axis = if n.x.abs() < 0.9 { Vector3f::x() } else { Vector3f::y() };
    n.cross(&axis).try_normalize(1e-20).unwrap_or(Vector3f::x())
}

/// Estimate principal curvatures and directions at every vertex.
///
/// `normals` must be unit length. Faces whose least-squares system is
/// singular are skipped.
pub fn estimate_curvatures(
    vertices: &[Point3f],
    faces: &[[usize; 3]],
    normals: &[Vector3f],
    areas: &PointAreas,
) -> PrincipalCurvatures {
    let nv = vertices.len();
    let mut pdir1 = vec![Vector3f::zeros(); nv];
    let mut tensors = vec![Vector3::<f32>::zeros(); nv];

    // Initial tangent frame per vertex from any incident edge
    for face in faces {
        pdir1[face[0]] = vertices[face[1]] - vertices[face[0]];
        pdir1[face[1]] = vertices[face[2]] - vertices[face[1]];
        pdir1[face[2]] = vertices[face[0]] - vertices[face[2]];
    }
    let pdir1: Vec<Vector3f> = pdir1
        .iter()
        .zip(normals)
        .map(|(d, n)| d.cross(n).try_normalize(1e-20).unwrap_or_else(|| perpendicular(n)))
        .collect();
    let pdir2: Vec<Vector3f> = normals.iter().zip(&pdir1).map(|(n, d)| n.cross(d)).collect();

    let mut skipped = 0usize;
    for (fi, face) in faces.iter().enumerate() {
        let e = face_edges(vertices, face);
        let Some((t, b)) = face_frame(&e) else {
            skipped += 1;
            continue;
        };

        // Fit the second fundamental form to the variation of normals
        let mut m = Vector3::<f32>::zeros();
        let (mut w00, mut w01, mut w22) = (0.0f32, 0.0f32, 0.0f32);
        for j in 0..3 {
            let u = e[j].dot(&t);
            let v = e[j].dot(&b);
            w00 += u * u;
            w01 += u * v;
            w22 += v * v;
            let dn = normals[face[prev(j)]] - normals[face[next(j)]];
            let dnu = dn.dot(&t);
            let dnv = dn.dot(&b);
            m[0] += dnu * u;
            m[1] += dnu * v + dnv * u;
            m[2] += dnv * v;
        }
        let w11 = w00 + w22;
        let w = Matrix3::new(
            w00, w01, 0.0, //
            w01, w11, w01, //
            0.0, w01, w22,
        );

        let Some(solved) = w.cholesky().map(|ch| ch.solve(&m)) else {
            skipped += 1;
            continue;
        };

        for j in 0..3 {
            let vj = face[j];
            let Some(wt) = areas.weight(fi, j, vj) else {
                continue;
            };
            tensors[vj] += project_curvature(&t, &b, solved, &pdir1[vj], &pdir2[vj]) * wt;
        }
    }
    if skipped > 0 {
        log::trace!("curvature fit skipped {skipped} degenerate faces");
    }

    let mut out = PrincipalCurvatures {
        curv1: Vec::with_capacity(nv),
        curv2: Vec::with_capacity(nv),
        pdir1: Vec::with_capacity(nv),
        pdir2: Vec::with_capacity(nv),
    };
    for i in 0..nv {
        let (d1, d2, k1, k2) = diagonalize_curvature(&pdir1[i], &pdir2[i], tensors[i], &normals[i]);
        out.pdir1.push(d1);
        out.pdir2.push(d2);
        out.curv1.push(k1);
        out.curv2.push(k2);
    }
    out
}

/// Estimate the derivative of the curvature tensor at every vertex, in the
/// principal frame of `curvatures`
pub fn estimate_curvature_derivatives(
    vertices: &[Point3f],
    faces: &[[usize; 3]],
    curvatures: &PrincipalCurvatures,
    areas: &PointAreas,
) -> Vec<CurvatureDerivative> {
    let mut dcurv = vec![[0.0f32; 4]; vertices.len()];
    let PrincipalCurvatures {
        curv1,
        curv2,
        pdir1,
        pdir2,
    } = curvatures;

    for (fi, face) in faces.iter().enumerate() {
        let e = face_edges(vertices, face);
        let Some((t, b)) = face_frame(&e) else {
            continue;
        };

        // Curvature tensor of each corner in this face's frame
        let fcurv: [Vector3<f32>; 3] = std::array::from_fn(|j| {
            let vj = face[j];
            project_curvature(
                &pdir1[vj],
                &pdir2[vj],
                Vector3::new(curv1[vj], 0.0, curv2[vj]),
                &t,
                &b,
            )
        });

        let mut m = Vector4::<f32>::zeros();
        let (mut w00, mut w01, mut w33) = (0.0f32, 0.0f32, 0.0f32);
        for j in 0..3 {
            let dfcurv = fcurv[prev(j)] - fcurv[next(j)];
            let u = e[j].dot(&t);
            let v = e[j].dot(&b);
            w00 += u * u;
            w01 += u * v;
            w33 += v * v;
            m[0] += u * dfcurv[0];
            m[1] += v * dfcurv[0] + 2.0 * u * dfcurv[1];
            m[2] += 2.0 * v * dfcurv[1] + u * dfcurv[2];
            m[3] += v * dfcurv[2];
        }
        let w11 = 2.0 * w00 + w33;
        let w12 = 2.0 * w01;
        let w22 = w00 + 2.0 * w33;
        let w23 = w01;
        let w = Matrix4::new(
            w00, w01, 0.0, 0.0, //
            w01, w11, w12, 0.0, //
            0.0, w12, w22, w23, //
            0.0, 0.0, w23, w33,
        );

        let Some(solved) = w.cholesky().map(|ch| ch.solve(&m)) else {
            continue;
        };
        let face_dcurv = [solved[0], solved[1], solved[2], solved[3]];

        for j in 0..3 {
            let vj = face[j];
            let Some(wt) = areas.weight(fi, j, vj) else {
                continue;
            };
            let projected = project_curvature_derivative(&t, &b, &face_dcurv, &pdir1[vj], &pdir2[vj]);
            for (acc, c) in dcurv[vj].iter_mut().zip(projected) {
                *acc += wt * c;
            }
        }
    }

    dcurv
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_point_areas_sum_to_face_area() {
        let vertices = vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(2.0, 0.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
            Point3f::new(3.0, 3.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [1, 3, 2]];
        let areas = compute_point_areas(&vertices, &faces);
        let total: f32 = areas.point_areas.iter().sum();
        let expected = 1.0 + 0.5 * (vertices[3] - vertices[1]).cross(&(vertices[2] - vertices[1])).norm();
        assert_relative_eq!(total, expected, epsilon = 1e-5);
        for c in &areas.corner_areas {
            assert!(c.iter().all(|a| *a >= 0.0));
        }
    }

    #[test]
    fn test_degenerate_face_has_no_area() {
        let vertices = vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(2.0, 0.0, 0.0),
        ];
        let areas = compute_point_areas(&vertices, &[[0, 1, 2]]);
        assert_eq!(areas.corner_areas[0], [0.0; 3]);
    }

    #[test]
    fn test_diagonalize_orders_by_magnitude() {
        let (u, v, n) = (Vector3f::x(), Vector3f::y(), Vector3f::z());
        let (d1, d2, k1, k2) = diagonalize_curvature(&u, &v, Vector3::new(0.5, 0.0, -2.0), &n);
        assert_relative_eq!(k1, -2.0, epsilon = 1e-6);
        assert_relative_eq!(k2, 0.5, epsilon = 1e-6);
        assert_relative_eq!(d1.dot(&Vector3f::y()).abs(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(d2, n.cross(&d1), epsilon = 1e-6);
    }

    #[test]
    fn test_projection_preserves_trace() {
        let (u, v) = (Vector3f::x(), Vector3f::y());
        let a = 0.4f32;
        let (nu, nv) = (
            Vector3f::new(a.cos(), a.sin(), 0.0),
            Vector3f::new(-a.sin(), a.cos(), 0.0),
        );
        let t = project_curvature(&u, &v, Vector3::new(1.0, 0.3, -0.5), &nu, &nv);
        assert_relative_eq!(t[0] + t[2], 0.5, epsilon = 1e-5);
    }
}
