//! Zero-crossing line extraction over mesh faces
//!
//! Silhouettes are the zero set of n·v. Suggestive contours come in two
//! flavours: the zero set of the radial-curvature derivative where radial
//! curvature is small, and the classic zero set of radial curvature where
//! its derivative towards the viewer is positive.
//!
//! Every extractor skips faces that are turned away from the camera or
//! degenerate before looking at any field.

use crate::smoothstep;
use crate::topology::EdgeTopology;
use crate::view_dependent::ViewDependentFields;
use crate::view_independent::faces_camera;
use contourkit_core::{lerp_point, Point3f, SurfaceMesh, Vector3f};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A line piece on the surface with an opacity per endpoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub endpoints: [Point3f; 2],
    pub alphas: [f32; 2],
}

impl LineSegment {
    pub fn opaque(a: Point3f, b: Point3f) -> Self {
        Self {
            endpoints: [a, b],
            alphas: [1.0, 1.0],
        }
    }

    pub fn length(&self) -> f32 {
        (self.endpoints[1] - self.endpoints[0]).norm()
    }
}

/// Which zero set the suggestive contour extractor traces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuggestiveCriterion {
    /// Zeros of the radial-curvature derivative where radial curvature is small
    #[default]
    DerivativeZero,
    /// Zeros of radial curvature where its derivative is positive
    RadialCurvatureZero,
}

impl SuggestiveCriterion {
    pub fn toggled(self) -> Self {
        match self {
            Self::DerivativeZero => Self::RadialCurvatureZero,
            Self::RadialCurvatureZero => Self::DerivativeZero,
        }
    }
}

/// Parameters of suggestive contour extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestiveContourParams {
    /// Dimensionless threshold, scaled by the feature size
    pub threshold: f32,
    pub fading: bool,
    pub fade_factor: f32,
    pub criterion: SuggestiveCriterion,
}

impl Default for SuggestiveContourParams {
    fn default() -> Self {
        Self {
            threshold: 0.001,
            fading: true,
            fade_factor: 1.0,
            criterion: SuggestiveCriterion::default(),
        }
    }
}

impl SuggestiveContourParams {
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_fading(mut self, fading: bool) -> Self {
        self.fading = fading;
        self
    }

    pub fn with_fade_factor(mut self, fade_factor: f32) -> Self {
        self.fade_factor = fade_factor;
        self
    }

    pub fn with_criterion(mut self, criterion: SuggestiveCriterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Largest `|kr|` considered small
    pub fn kr_limit(&self, feature_size: f32) -> f32 {
        self.threshold / feature_size
    }

    /// Smallest derivative swing across an edge that counts as a crossing
    pub fn swing_limit(&self, feature_size: f32) -> f32 {
        self.threshold / (feature_size * feature_size)
    }
}

/// Fraction along `a → b` where the linear interpolant of the two values is zero
#[inline]
pub fn find_zero_linear(a: f32, b: f32) -> f32 {
    a / (a - b)
}

/// The corner whose value has a different sign than the other two, testing
/// `< 0` against `>= 0` and `> 0` against `<= 0`
#[inline]
pub fn lone_vertex(vals: [f32; 3]) -> Option<usize> {
    (0..3).find(|&k| {
        let (a, b) = (vals[(k + 1) % 3], vals[(k + 2) % 3]);
        (vals[k] < 0.0 && a >= 0.0 && b >= 0.0) || (vals[k] > 0.0 && a <= 0.0 && b <= 0.0)
    })
}

/// Opacity of a suggestive contour point with radial curvature `kr`:
/// full at `kr = 0`, fading smoothly to nothing at `kr_limit`
#[inline]
pub fn fade_alpha(kr: f32, kr_limit: f32, fade_factor: f32) -> f32 {
    (fade_factor * (1.0 - smoothstep(0.0, kr_limit, kr.abs()))).clamp(0.0, 1.0)
}

fn fields_cover(fields: &[f32], mesh: &SurfaceMesh, name: &str) -> bool {
    if fields.len() == mesh.vertex_count() {
        return true;
    }
    log::debug!(
        "{name} holds {} values for {} vertices, skipping extraction",
        fields.len(),
        mesh.vertex_count()
    );
    false
}

fn camera_facing_faces<'a>(
    mesh: &'a SurfaceMesh,
    face_normals: &'a [Vector3f],
    camera: &'a Point3f,
) -> impl Iterator<Item = (usize, [usize; 3])> + 'a {
    mesh.faces()
        .iter()
        .enumerate()
        .filter(move |(f, _)| faces_camera(mesh, face_normals, *f, camera))
        .map(|(f, face)| (f, *face))
}

/// Points on the two edges leaving corner `k`, with their edge fractions
fn corner_crossings(mesh: &SurfaceMesh, face: [usize; 3], vals: [f32; 3], k: usize) -> [(Point3f, f32, usize); 2] {
    let p = |j: usize| mesh.vertices()[face[j]];
    [(k + 1) % 3, (k + 2) % 3].map(|j| {
        let t = find_zero_linear(vals[k], vals[j]);
        (lerp_point(&p(k), &p(j), t), t, j)
    })
}

/// Silhouettes traced over mesh edges: every edge whose endpoints have
/// strictly opposite n·v signs gets a crossing point, and each camera-facing
/// face joins the two crossings on its edges.
///
/// Lines follow the coarse mesh edges, so they can form small loops and
/// flicker as the camera moves. A vertex with n·v exactly zero produces no
/// crossing on its edges, which leaves a gap where
/// [`extract_face_silhouettes`] still draws a segment.
pub fn extract_edge_silhouettes(
    mesh: &SurfaceMesh,
    face_normals: &[Vector3f],
    topology: &EdgeTopology,
    fields: &ViewDependentFields,
    camera: &Point3f,
) -> Vec<LineSegment> {
    if !fields_cover(&fields.ndotv, mesh, "ndotv") {
        return Vec::new();
    }
    let ndotv = &fields.ndotv;
    let vertices = mesh.vertices();

    let crossings: Vec<Option<Point3f>> = topology
        .edges
        .iter()
        .map(|&[a, b]| {
            let (na, nb) = (ndotv[a], ndotv[b]);
            let opposite = (na < 0.0 && nb > 0.0) || (na > 0.0 && nb < 0.0);
            opposite.then(|| lerp_point(&vertices[a], &vertices[b], find_zero_linear(na, nb)))
        })
        .collect();

    camera_facing_faces(mesh, face_normals, camera)
        .filter_map(|(f, _)| {
            let points: Vec<Point3f> = topology.face_edges[f]
                .iter()
                .filter_map(|&e| crossings[e])
                .collect();
            match points.as_slice() {
                [a, b] => Some(LineSegment::opaque(*a, *b)),
                _ => None,
            }
        })
        .collect()
}

/// Silhouettes traced inside each camera-facing face by interpolating n·v
/// along the two edges of the corner whose sign differs from the others
pub fn extract_face_silhouettes(
    mesh: &SurfaceMesh,
    face_normals: &[Vector3f],
    fields: &ViewDependentFields,
    camera: &Point3f,
) -> Vec<LineSegment> {
    if !fields_cover(&fields.ndotv, mesh, "ndotv") {
        return Vec::new();
    }
    camera_facing_faces(mesh, face_normals, camera)
        .filter_map(|(_, face)| {
            let vals = face.map(|v| fields.ndotv[v]);
            let k = lone_vertex(vals)?;
            let [(a, _, _), (b, _, _)] = corner_crossings(mesh, face, vals, k);
            Some(LineSegment::opaque(a, b))
        })
        .collect()
}

/// Suggestive contours with the criterion selected in `params`
pub fn extract_suggestive_contours(
    mesh: &SurfaceMesh,
    face_normals: &[Vector3f],
    feature_size: f32,
    fields: &ViewDependentFields,
    camera: &Point3f,
    params: &SuggestiveContourParams,
) -> Vec<LineSegment> {
    if !fields_cover(&fields.kr, mesh, "kr")
        || !fields_cover(&fields.num, mesh, "num")
        || !fields_cover(&fields.den, mesh, "den")
    {
        return Vec::new();
    }
    if !(feature_size > 0.0 && feature_size.is_finite()) {
        log::warn!("feature size {feature_size} is not usable for suggestive contours");
        return Vec::new();
    }

    let faces = camera_facing_faces(mesh, face_normals, camera);
    let segments: Vec<LineSegment> = match params.criterion {
        SuggestiveCriterion::DerivativeZero => faces
            .filter_map(|(_, face)| derivative_zero_segment(mesh, face, feature_size, fields, params))
            .collect(),
        SuggestiveCriterion::RadialCurvatureZero => faces
            .flat_map(|(_, face)| radial_curvature_zero_segments(mesh, face, feature_size, fields, params))
            .collect(),
    };

    if params.fading {
        segments
            .into_iter()
            .filter(|s| s.alphas.iter().any(|a| *a > 0.0))
            .collect()
    } else {
        segments
    }
}

fn derivative_zero_segment(
    mesh: &SurfaceMesh,
    face: [usize; 3],
    feature_size: f32,
    fields: &ViewDependentFields,
    params: &SuggestiveContourParams,
) -> Option<LineSegment> {
    let [d0, d1, d2] = face.map(|v| fields.dwkr(v));
    let dw = [d0?, d1?, d2?];
    let kr = face.map(|v| fields.kr[v]);

    let kr_limit = params.kr_limit(feature_size);
    if kr.iter().all(|k| k.abs() > kr_limit) {
        return None;
    }

    let k = lone_vertex(dw)?;
    let swing_limit = params.swing_limit(feature_size);
    let [(pa, ta, ja), (pb, tb, jb)] = corner_crossings(mesh, face, dw, k);
    if (dw[k] - dw[ja]).abs() <= swing_limit || (dw[k] - dw[jb]).abs() <= swing_limit {
        return None;
    }

    let alpha = |t: f32, j: usize| {
        if params.fading {
            let kr_p = kr[k] + t * (kr[j] - kr[k]);
            fade_alpha(kr_p, kr_limit, params.fade_factor)
        } else {
            1.0
        }
    };
    Some(LineSegment {
        endpoints: [pa, pb],
        alphas: [alpha(ta, ja), alpha(tb, jb)],
    })
}

fn radial_curvature_zero_segments(
    mesh: &SurfaceMesh,
    face: [usize; 3],
    feature_size: f32,
    fields: &ViewDependentFields,
    params: &SuggestiveContourParams,
) -> Vec<LineSegment> {
    // A gated corner has no usable derivative
    if face.iter().any(|&v| fields.dwkr(v).is_none()) {
        return Vec::new();
    }
    let num = face.map(|v| fields.num[v]);
    let den = face.map(|v| fields.den[v]);

    // Derivative non-positive at every corner
    if (0..3).all(|i| num[i] <= 0.0 && den[i] >= 0.0) || (0..3).all(|i| num[i] >= 0.0 && den[i] <= 0.0) {
        return Vec::new();
    }

    let kr = face.map(|v| fields.kr[v]);
    let Some(k) = lone_vertex(kr) else {
        return Vec::new();
    };
    let [(p1, t1, j1), (p2, t2, j2)] = corner_crossings(mesh, face, kr, k);
    let at = |vals: &[f32; 3], t: f32, j: usize| vals[k] + t * (vals[j] - vals[k]);
    let (num1, num2) = (at(&num, t1, j1), at(&num, t2, j2));
    let (den1, den2) = (at(&den, t1, j1), at(&den, t2, j2));

    // The derivative changes sign wherever num or den does
    let breaks = [(num1, num2), (den1, den2)]
        .into_iter()
        .filter(|(a, b)| (*a >= 0.0) != (*b >= 0.0))
        .map(|(a, b)| find_zero_linear(a, b))
        .filter(|t| *t > 0.0 && *t < 1.0)
        .sorted_by(f32::total_cmp);

    let fade = params.fade_factor * params.threshold / (feature_size * feature_size);
    let point = |t: f32| {
        let n = num1 + t * (num2 - num1);
        let d = den1 + t * (den2 - den1);
        let alpha = if params.fading {
            let denom = d * fade + n;
            if denom == 0.0 {
                0.0
            } else {
                (n / denom).clamp(0.0, 1.0)
            }
        } else {
            1.0
        };
        (lerp_point(&p1, &p2, t), alpha)
    };

    let mut valid = (num1 >= 0.0) == (den1 >= 0.0);
    std::iter::once(0.0)
        .chain(breaks)
        .chain(std::iter::once(1.0))
        .tuple_windows()
        .filter_map(|(a, b)| {
            let keep = valid && b > a;
            valid = !valid;
            keep.then(|| {
                let ((pa, aa), (pb, ab)) = (point(a), point(b));
                LineSegment {
                    endpoints: [pa, pb],
                    alphas: [aa, ab],
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use contourkit_core::CurvatureAttributes;

    fn triangle() -> (SurfaceMesh, Vec<Vector3f>) {
        let attrs = CurvatureAttributes {
            normals: vec![Vector3f::z(); 3],
            curv1: vec![0.0; 3],
            curv2: vec![0.0; 3],
            pdir1: vec![Vector3f::x(); 3],
            pdir2: vec![Vector3f::y(); 3],
            dcurv: vec![[0.0; 4]; 3],
        };
        let mesh = SurfaceMesh::new(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
            attrs,
        )
        .unwrap();
        (mesh, vec![Vector3f::z()])
    }

    fn camera() -> Point3f {
        Point3f::new(0.3, 0.3, 5.0)
    }

    #[test]
    fn test_lone_vertex() {
        assert_eq!(lone_vertex([1.0, 1.0, -1.0]), Some(2));
        assert_eq!(lone_vertex([-1.0, 0.0, 2.0]), Some(0));
        assert_eq!(lone_vertex([0.5, 1.0, 2.0]), None);
        assert_eq!(lone_vertex([0.0, 0.0, 0.0]), None);
    }

    #[test]
    fn test_face_silhouette_interpolates() {
        let (mesh, normals) = triangle();
        let fields = ViewDependentFields {
            camera: camera(),
            ndotv: vec![0.5, 1.0, -1.5],
            ..Default::default()
        };
        let segments = extract_face_silhouettes(&mesh, &normals, &fields, &camera());
        assert_eq!(segments.len(), 1);
        let [a, b] = segments[0].endpoints;
        // Lone corner 2; edge 2→0 at 0.75 from corner 2, edge 2→1 at 0.6
        assert_relative_eq!(a, Point3f::new(0.0, 0.25, 0.0), epsilon = 1e-6);
        assert_relative_eq!(b, Point3f::new(0.6, 0.4, 0.0), epsilon = 1e-6);
        assert_eq!(segments[0].alphas, [1.0, 1.0]);
    }

    #[test]
    fn test_zero_ndotv_vertex_leaves_edge_gap() {
        let (mesh, normals) = triangle();
        let topology = EdgeTopology::build(mesh.faces());
        let fields = ViewDependentFields {
            camera: camera(),
            ndotv: vec![0.0, 1.0, -1.0],
            ..Default::default()
        };
        let by_edge = extract_edge_silhouettes(&mesh, &normals, &topology, &fields, &camera());
        assert!(by_edge.is_empty());
        let by_face = extract_face_silhouettes(&mesh, &normals, &fields, &camera());
        assert_eq!(by_face.len(), 1);
        assert!(by_face[0].endpoints.iter().any(|p| (p - Point3f::origin()).norm() < 1e-6));
    }

    #[test]
    fn test_back_facing_face_is_skipped() {
        let (mesh, normals) = triangle();
        let behind = Point3f::new(0.3, 0.3, -5.0);
        let fields = ViewDependentFields {
            camera: behind,
            ndotv: vec![0.5, 1.0, -1.5],
            ..Default::default()
        };
        assert!(extract_face_silhouettes(&mesh, &normals, &fields, &behind).is_empty());
    }

    #[test]
    fn test_missing_fields_yield_nothing() {
        let (mesh, normals) = triangle();
        let fields = ViewDependentFields::default();
        assert!(extract_face_silhouettes(&mesh, &normals, &fields, &camera()).is_empty());
        let params = SuggestiveContourParams::default();
        assert!(extract_suggestive_contours(&mesh, &normals, 0.1, &fields, &camera(), &params).is_empty());
    }

    #[test]
    fn test_fade_alpha_is_monotone() {
        let mut last = f32::INFINITY;
        for i in 0..=10 {
            let a = fade_alpha(i as f32 * 0.01, 0.1, 1.0);
            assert!(a <= last);
            last = a;
        }
        assert_eq!(fade_alpha(0.0, 0.1, 1.0), 1.0);
        assert_eq!(fade_alpha(0.1, 0.1, 1.0), 0.0);
        assert_eq!(fade_alpha(0.0, 0.1, 0.5), 0.5);
    }

    #[test]
    fn test_radial_curvature_zero_clips_at_derivative_sign_change() {
        let (mesh, normals) = triangle();
        let fields = ViewDependentFields {
            camera: camera(),
            ndotv: vec![0.5; 3],
            kr: vec![-1.0, 1.0, 1.0],
            // num positive towards vertex 1, negative towards vertex 2
            num: vec![0.0, 2.0, -2.0],
            den: vec![0.5; 3],
        };
        let params = SuggestiveContourParams::default()
            .with_fading(false)
            .with_criterion(SuggestiveCriterion::RadialCurvatureZero);
        let segments = extract_suggestive_contours(&mesh, &normals, 0.1, &fields, &camera(), &params);
        assert_eq!(segments.len(), 1);
        let [a, b] = segments[0].endpoints;
        // Crossings at the edge midpoints; only the half towards vertex 1 is kept
        assert_relative_eq!(a, Point3f::new(0.5, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(b, Point3f::new(0.25, 0.25, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_radial_curvature_zero_skips_gated_corner() {
        let (mesh, normals) = triangle();
        let mut fields = ViewDependentFields {
            camera: camera(),
            ndotv: vec![0.5; 3],
            kr: vec![-1.0, 1.0, 1.0],
            num: vec![1.0; 3],
            den: vec![0.5; 3],
        };
        let params = SuggestiveContourParams::default().with_criterion(SuggestiveCriterion::RadialCurvatureZero);
        let ungated = extract_suggestive_contours(&mesh, &normals, 0.1, &fields, &camera(), &params);
        assert_eq!(ungated.len(), 1);

        fields.den = vec![0.0, 0.0, 0.5];
        assert_eq!(fields.dwkr(0), None);
        for criterion in [SuggestiveCriterion::RadialCurvatureZero, SuggestiveCriterion::DerivativeZero] {
            let params = params.clone().with_criterion(criterion);
            let segments = extract_suggestive_contours(&mesh, &normals, 0.1, &fields, &camera(), &params);
            assert!(segments.is_empty(), "{criterion:?}: {segments:?}");
        }
    }

    #[test]
    fn test_radial_curvature_zero_rejects_negative_derivative() {
        let (mesh, normals) = triangle();
        let fields = ViewDependentFields {
            camera: camera(),
            ndotv: vec![0.5; 3],
            kr: vec![-1.0, 1.0, 1.0],
            num: vec![-1.0; 3],
            den: vec![0.5; 3],
        };
        let params = SuggestiveContourParams::default().with_criterion(SuggestiveCriterion::RadialCurvatureZero);
        assert!(extract_suggestive_contours(&mesh, &normals, 0.1, &fields, &camera(), &params).is_empty());
    }
}
