//! Analytic surfaces with exact differential attributes
//!
//! Both generators produce outward-facing normals with counter-clockwise
//! winding, so convex regions have positive curvature. Principal directions
//! follow the parameterization and are not reordered by curvature magnitude.

use crate::bounds::BoundingSphere;
use crate::error::{Error, Result};
use crate::mesh::{CurvatureAttributes, SurfaceMesh};
use crate::point::*;
use std::f32::consts::{PI, TAU};

/// A UV sphere with single pole vertices
pub fn uv_sphere(radius: f32, stacks: usize, slices: usize) -> Result<SurfaceMesh> {
    if !(radius > 0.0) || stacks < 2 || slices < 3 {
        return Err(Error::InvalidParameter(format!(
            "uv_sphere needs radius > 0, stacks >= 2, slices >= 3 (got {radius}, {stacks}, {slices})"
        )));
    }

    let ring_count = stacks - 1;
    let nv = 2 + ring_count * slices;
    let mut vertices = Vec::with_capacity(nv);
    let mut attrs = CurvatureAttributes::default();
    let k = 1.0 / radius;

    let mut push = |p: Point3f, pdir1: Vector3f| {
        let n = p.coords / radius;
        vertices.push(p);
        attrs.pdir2.push(n.cross(&pdir1));
        attrs.pdir1.push(pdir1);
        attrs.normals.push(n);
        attrs.curv1.push(k);
        attrs.curv2.push(k);
        attrs.dcurv.push([0.0; 4]);
    };

    push(Point3f::new(0.0, 0.0, radius), Vector3f::x());
    for i in 1..stacks {
        let theta = PI * i as f32 / stacks as f32;
        for j in 0..slices {
            let phi = TAU * j as f32 / slices as f32;
            let p = Point3f::new(
                radius * theta.sin() * phi.cos(),
                radius * theta.sin() * phi.sin(),
                radius * theta.cos(),
            );
            push(p, Vector3f::new(-phi.sin(), phi.cos(), 0.0));
        }
    }
    push(Point3f::new(0.0, 0.0, -radius), Vector3f::x());

    let ring = |i: usize, j: usize| 1 + i * slices + j % slices;
    let south = nv - 1;
    let mut faces = Vec::with_capacity(2 * slices * ring_count);
    for j in 0..slices {
        faces.push([0, ring(0, j), ring(0, j + 1)]);
    }
    for i in 0..ring_count - 1 {
        for j in 0..slices {
            let (a, b) = (ring(i, j), ring(i, j + 1));
            let (c, d) = (ring(i + 1, j), ring(i + 1, j + 1));
            faces.push([a, c, b]);
            faces.push([b, c, d]);
        }
    }
    for j in 0..slices {
        faces.push([south, ring(ring_count - 1, j + 1), ring(ring_count - 1, j)]);
    }

    SurfaceMesh::with_bounding_sphere(
        vertices,
        faces,
        attrs,
        BoundingSphere::new(Point3f::origin(), radius),
    )
}

/// A torus around the z axis.
///
/// `pdir1` runs around the z axis with curvature `cos φ / (R + r cos φ)`,
/// `pdir2` runs around the tube with curvature `1 / r`. The only non-zero
/// derivative component is `C112`, the change of `curv1` along `pdir2`.
pub fn torus(major: f32, minor: f32, segments: usize, sides: usize) -> Result<SurfaceMesh> {
    if !(minor > 0.0 && major > minor) || segments < 3 || sides < 3 {
        return Err(Error::InvalidParameter(format!(
            "torus needs major > minor > 0 and at least 3 segments and sides (got {major}, {minor}, {segments}, {sides})"
        )));
    }

    let nv = segments * sides;
    let mut vertices = Vec::with_capacity(nv);
    let mut attrs = CurvatureAttributes::default();

    for i in 0..segments {
        let theta = TAU * i as f32 / segments as f32;
        let (st, ct) = theta.sin_cos();
        for j in 0..sides {
            let phi = TAU * j as f32 / sides as f32;
            let (sp, cp) = phi.sin_cos();
            let rho = major + minor * cp;
            vertices.push(Point3f::new(rho * ct, rho * st, minor * sp));
            attrs.normals.push(Vector3f::new(cp * ct, cp * st, sp));
            attrs.pdir1.push(Vector3f::new(-st, ct, 0.0));
            attrs.pdir2.push(Vector3f::new(-sp * ct, -sp * st, cp));
            attrs.curv1.push(cp / rho);
            attrs.curv2.push(1.0 / minor);
            attrs.dcurv.push([0.0, -major * sp / (minor * rho * rho), 0.0, 0.0]);
        }
    }

    let index = |i: usize, j: usize| (i % segments) * sides + j % sides;
    let mut faces = Vec::with_capacity(2 * nv);
    for i in 0..segments {
        for j in 0..sides {
            let (a, b) = (index(i, j), index(i + 1, j));
            let (c, d) = (index(i, j + 1), index(i + 1, j + 1));
            faces.push([a, b, c]);
            faces.push([b, d, c]);
        }
    }

    SurfaceMesh::with_bounding_sphere(
        vertices,
        faces,
        attrs,
        BoundingSphere::new(Point3f::origin(), major + minor),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn face_normal(mesh: &SurfaceMesh, f: usize) -> Vector3f {
        let [a, b, c] = mesh.face_points(f);
        (b - a).cross(&(c - a)).normalize()
    }

    #[test]
    fn test_sphere_faces_point_outward() {
        let mesh = uv_sphere(2.0, 8, 12).unwrap();
        for f in 0..mesh.face_count() {
            let [a, b, c] = mesh.face_points(f);
            let centroid = (a.coords + b.coords + c.coords) / 3.0;
            assert!(face_normal(&mesh, f).dot(&centroid) > 0.0, "face {f} points inward");
        }
    }

    #[test]
    fn test_torus_faces_agree_with_vertex_normals() {
        let mesh = torus(3.0, 1.0, 24, 16).unwrap();
        for f in 0..mesh.face_count() {
            let n = face_normal(&mesh, f);
            let [a, _, _] = mesh.faces()[f];
            assert!(n.dot(&mesh.normals()[a]) > 0.5, "face {f} disagrees with its normals");
        }
    }

    #[test]
    fn test_torus_frames_are_orthonormal() {
        let mesh = torus(3.0, 1.0, 12, 8).unwrap();
        for i in 0..mesh.vertex_count() {
            let (n, d1, d2) = (mesh.normals()[i], mesh.pdir1()[i], mesh.pdir2()[i]);
            assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-5);
            assert_relative_eq!(d1.dot(&d2), 0.0, epsilon = 1e-5);
            assert_relative_eq!(n.cross(&d1), d2, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_torus_derivative_matches_finite_difference() {
        let (major, minor, sides) = (3.0f32, 1.0f32, 400usize);
        let mesh = torus(major, minor, 4, sides).unwrap();
        let step = minor * TAU / sides as f32;
        for j in [10usize, 60, 150, 300] {
            let fd = (mesh.curv1()[j + 1] - mesh.curv1()[j - 1]) / (2.0 * step);
            assert_relative_eq!(mesh.dcurv()[j][1], fd, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(uv_sphere(0.0, 8, 8).is_err());
        assert!(torus(1.0, 2.0, 8, 8).is_err());
    }
}
