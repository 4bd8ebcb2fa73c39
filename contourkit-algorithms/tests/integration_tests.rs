//! Integration tests for contourkit-algorithms
//!
//! These run the preparation, field and extraction stages together on small
//! hand-built meshes and on the analytic primitives.

use approx::assert_relative_eq;
use contourkit_algorithms::*;
use contourkit_core::{primitives, CurvatureAttributes, Point3f, SurfaceMesh, TriangleMesh, Vector3f};
use rand::{Rng, SeedableRng};

/// A single flat triangle in the z = 0 plane facing +Z
fn unit_triangle() -> SurfaceMesh {
    let attrs = CurvatureAttributes {
        normals: vec![Vector3f::z(); 3],
        curv1: vec![0.0; 3],
        curv2: vec![0.0; 3],
        pdir1: vec![Vector3f::x(); 3],
        pdir2: vec![Vector3f::y(); 3],
        dcurv: vec![[0.0; 4]; 3],
    };
    SurfaceMesh::new(
        vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
        ],
        vec![[0, 1, 2]],
        attrs,
    )
    .unwrap()
}

fn front_camera() -> Point3f {
    Point3f::new(0.3, 0.3, 5.0)
}

fn with_ndotv(ndotv: Vec<f32>) -> ViewDependentFields {
    ViewDependentFields {
        camera: front_camera(),
        ndotv,
        ..Default::default()
    }
}

/// Fields with `dwkr = [1, 1, -1]` and the given radial curvature
fn suggestive_fields(kr: [f32; 3]) -> ViewDependentFields {
    ViewDependentFields {
        camera: front_camera(),
        ndotv: vec![0.9; 3],
        kr: kr.to_vec(),
        num: vec![0.9, 0.9, -0.9],
        den: vec![0.9; 3],
    }
}

fn has_endpoint(segment: &LineSegment, p: Point3f) -> bool {
    segment.endpoints.iter().any(|e| (e - p).norm() < 1e-5)
}

#[test]
fn test_random_triangles_have_unit_face_normals() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(11);
    let mut vertices = Vec::new();
    let mut faces = Vec::new();
    for f in 0..50 {
        for _ in 0..3 {
            vertices.push(Point3f::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)));
        }
        faces.push([3 * f, 3 * f + 1, 3 * f + 2]);
    }
    let mesh = prepare_surface(TriangleMesh::from_vertices_and_faces(vertices, faces)).unwrap();
    for n in compute_face_normals(&mesh) {
        assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-5);
    }
}

#[test]
fn test_ndotv_sign_on_normal_rays() {
    let mesh = primitives::torus(3.0, 1.0, 24, 12).unwrap();
    let config = FieldConfig::default();
    for i in [0usize, 7, 100, 200] {
        let p = mesh.vertices()[i];
        let n = mesh.normals()[i];
        assert!(compute_ndotv(&mesh, &(p + n * 0.5), &config)[i] > 0.0);
        assert!(compute_ndotv(&mesh, &(p - n * 0.5), &config)[i] < 0.0);
    }
}

#[test]
fn test_feature_size_scales_with_geometry() {
    let mesh = primitives::torus(3.0, 1.0, 48, 24).unwrap();
    let base = compute_feature_size_seeded(&mesh, 5);
    for s in [0.5f32, 2.0, 10.0] {
        let scaled = mesh.scaled(s).unwrap();
        assert_relative_eq!(compute_feature_size_seeded(&scaled, 5), s * base, max_relative = 1e-4);
    }
}

#[test]
fn test_edge_silhouette_on_single_triangle() {
    let mesh = unit_triangle();
    let normals = compute_face_normals(&mesh);
    let topology = EdgeTopology::build(mesh.faces());

    let segments = extract_edge_silhouettes(&mesh, &normals, &topology, &with_ndotv(vec![1.0, 1.0, -1.0]), &front_camera());
    assert_eq!(segments.len(), 1);
    assert!(has_endpoint(&segments[0], Point3f::new(0.0, 0.5, 0.0)));
    assert!(has_endpoint(&segments[0], Point3f::new(0.5, 0.5, 0.0)));

    // Unequal magnitudes: crossing at a / (a - b) from the first endpoint
    let segments = extract_edge_silhouettes(&mesh, &normals, &topology, &with_ndotv(vec![0.5, 1.0, -1.5]), &front_camera());
    assert_eq!(segments.len(), 1);
    assert!(has_endpoint(&segments[0], Point3f::new(0.0, 0.25, 0.0)));
    assert!(has_endpoint(&segments[0], Point3f::new(0.6, 0.4, 0.0)));
}

#[test]
fn test_edge_and_face_silhouettes_agree_on_one_triangle() {
    let mesh = unit_triangle();
    let normals = compute_face_normals(&mesh);
    let topology = EdgeTopology::build(mesh.faces());
    let fields = with_ndotv(vec![-0.2, 0.7, 0.4]);
    let by_edge = extract_edge_silhouettes(&mesh, &normals, &topology, &fields, &front_camera());
    let by_face = extract_face_silhouettes(&mesh, &normals, &fields, &front_camera());
    assert_eq!(by_edge.len(), 1);
    assert_eq!(by_face.len(), 1);
    for p in by_face[0].endpoints {
        assert!(has_endpoint(&by_edge[0], p));
    }
}

#[test]
fn test_same_sign_triangle_has_no_silhouette() {
    let mesh = unit_triangle();
    let normals = compute_face_normals(&mesh);
    let topology = EdgeTopology::build(mesh.faces());
    for ndotv in [vec![0.1, 0.5, 0.9], vec![-0.1, -0.5, -0.9], vec![0.0, 0.0, 0.0]] {
        let fields = with_ndotv(ndotv);
        assert!(extract_face_silhouettes(&mesh, &normals, &fields, &front_camera()).is_empty());
        assert!(extract_edge_silhouettes(&mesh, &normals, &topology, &fields, &front_camera()).is_empty());
    }
}

#[test]
fn test_suggestive_contours_without_fading_are_opaque() {
    let mesh = unit_triangle();
    let normals = compute_face_normals(&mesh);
    let params = SuggestiveContourParams::default().with_fading(false);
    let segments = extract_suggestive_contours(&mesh, &normals, 0.1, &suggestive_fields([0.0, 0.0, 0.005]), &front_camera(), &params);
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].alphas, [1.0, 1.0]);
    // dwkr flips halfway along both edges leaving vertex 2
    assert!(has_endpoint(&segments[0], Point3f::new(0.0, 0.5, 0.0)));
    assert!(has_endpoint(&segments[0], Point3f::new(0.5, 0.5, 0.0)));
}

#[test]
fn test_suggestive_contours_need_small_radial_curvature() {
    let mesh = unit_triangle();
    let normals = compute_face_normals(&mesh);
    for fading in [false, true] {
        let params = SuggestiveContourParams::default().with_fading(fading);
        // kr limit is 0.001 / 0.1 = 0.01
        let fields = suggestive_fields([0.02, -0.03, 0.05]);
        assert!(extract_suggestive_contours(&mesh, &normals, 0.1, &fields, &front_camera(), &params).is_empty());
    }
}

#[test]
fn test_suggestive_contours_need_gated_derivative() {
    let mesh = unit_triangle();
    let normals = compute_face_normals(&mesh);
    let mut fields = suggestive_fields([0.0; 3]);
    fields.den[1] = 0.0;
    let params = SuggestiveContourParams::default().with_fading(false);
    assert!(extract_suggestive_contours(&mesh, &normals, 0.1, &fields, &front_camera(), &params).is_empty());
}

#[test]
fn test_suggestive_fading_decreases_with_radial_curvature() {
    let mesh = unit_triangle();
    let normals = compute_face_normals(&mesh);
    let params = SuggestiveContourParams::default().with_fading(true);
    let mut last = f32::INFINITY;
    for step in 0..10 {
        let k = step as f32 * 0.001;
        let fields = suggestive_fields([k, k, k]);
        let segments = extract_suggestive_contours(&mesh, &normals, 0.1, &fields, &front_camera(), &params);
        assert_eq!(segments.len(), 1, "kr = {k}");
        let alpha = segments[0].alphas[0];
        assert!(alpha <= last, "alpha rose to {alpha} at kr = {k}");
        assert!((0.0..=1.0).contains(&alpha));
        last = alpha;
    }
    assert!(last < 0.1);
}

#[test]
fn test_torus_pipeline_produces_silhouettes() {
    let mesh = primitives::torus(3.0, 1.0, 64, 32).unwrap();
    let analysis = ViewIndependentData::compute_seeded(&mesh, 1);
    let topology = EdgeTopology::build(mesh.faces());
    assert!(topology.is_closed());

    let camera = Point3f::new(2.0, -14.0, 6.0);
    let fields = compute_view_dependent(&mesh, &camera, FieldRequirements::curvature(0.001), &FieldConfig::default());
    let radius = mesh.bounding_sphere().radius;

    let by_face = extract_face_silhouettes(&mesh, &analysis.face_normals, &fields, &camera);
    let by_edge = extract_edge_silhouettes(&mesh, &analysis.face_normals, &topology, &fields, &camera);
    assert!(!by_face.is_empty());
    assert!(!by_edge.is_empty());
    for s in by_face.iter().chain(&by_edge) {
        for p in s.endpoints {
            assert!(p.coords.norm() <= radius + 1e-4);
        }
    }
}

/// Whether `p` lies inside a face that faces the camera
fn on_camera_facing_face(mesh: &SurfaceMesh, face_normals: &[Vector3f], camera: &Point3f, p: &Point3f) -> bool {
    mesh.faces().iter().enumerate().any(|(f, face)| {
        if !faces_camera(mesh, face_normals, f, camera) {
            return false;
        }
        let [a, b, c] = face.map(|v| mesh.vertices()[v]);
        let (e0, e1, ep) = (b - a, c - a, p - a);
        if ep.dot(&face_normals[f]).abs() > 1e-4 {
            return false;
        }
        let (d00, d01, d11) = (e0.dot(&e0), e0.dot(&e1), e1.dot(&e1));
        let (d20, d21) = (ep.dot(&e0), ep.dot(&e1));
        let denom = d00 * d11 - d01 * d01;
        if denom <= 0.0 {
            return false;
        }
        let v = (d11 * d20 - d01 * d21) / denom;
        let w = (d00 * d21 - d01 * d20) / denom;
        let eps = 1e-4;
        v >= -eps && w >= -eps && v + w <= 1.0 + eps
    })
}

#[test]
fn test_torus_suggestive_contours_lie_on_visible_faces() {
    let mesh = primitives::torus(3.0, 1.0, 96, 48).unwrap();
    let analysis = ViewIndependentData::compute_seeded(&mesh, 1);
    let camera = Point3f::new(2.0, -14.0, 6.0);
    let fields = compute_view_dependent(&mesh, &camera, FieldRequirements::curvature(0.001), &FieldConfig::default());

    for criterion in [SuggestiveCriterion::DerivativeZero, SuggestiveCriterion::RadialCurvatureZero] {
        let params = SuggestiveContourParams::default().with_criterion(criterion);
        let segments = extract_suggestive_contours(&mesh, &analysis.face_normals, analysis.feature_size, &fields, &camera, &params);
        assert!(!segments.is_empty(), "{criterion:?} found no lines");
        for s in &segments {
            assert!(s.alphas.iter().all(|a| (0.0..=1.0).contains(a)));
            for p in &s.endpoints {
                assert!(
                    on_camera_facing_face(&mesh, &analysis.face_normals, &camera, p),
                    "{criterion:?}: {p:?} is not on a camera-facing face"
                );
            }
        }
    }
}

#[test]
fn test_estimated_torus_curvature_matches_analytic() {
    let reference = primitives::torus(3.0, 1.0, 96, 48).unwrap();
    let raw = TriangleMesh::from_vertices_and_faces(reference.vertices().to_vec(), reference.faces().to_vec());
    let surface = prepare_surface(raw).unwrap();
    for i in (0..surface.vertex_count()).step_by(37) {
        let expected_mean = reference.curv1()[i] + reference.curv2()[i];
        let estimated_mean = surface.curv1()[i] + surface.curv2()[i];
        assert!(
            (expected_mean - estimated_mean).abs() < 0.1,
            "vertex {i}: expected {expected_mean}, estimated {estimated_mean}"
        );
        assert_relative_eq!(surface.normals()[i].dot(&reference.normals()[i]), 1.0, epsilon = 1e-2);
    }
}
