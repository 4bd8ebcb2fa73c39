//! Per-mesh quantities computed once after load: face normals and the
//! feature size that calibrates every curvature threshold

use contourkit_core::{Point3f, SurfaceMesh, Vector3f};
use std::sync::Mutex;

/// Number of vertices sampled when estimating the feature size
pub const FEATURE_SIZE_SAMPLES: usize = 500;

/// State of the sampling generator, carried across calls
static FEATURE_SIZE_RNG: Mutex<u32> = Mutex::new(0);

#[inline]
fn lcg_next(state: u32) -> u32 {
    state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223)
}

/// Unit normal of every face, oriented by the winding `(p0 - p1) × (p1 - p2)`.
/// Zero-area faces get the zero vector.
pub fn compute_face_normals(mesh: &SurfaceMesh) -> Vec<Vector3f> {
    let vertices = mesh.vertices();
    mesh.faces()
        .iter()
        .map(|&[a, b, c]| {
            let (p0, p1, p2) = (vertices[a], vertices[b], vertices[c]);
            (p0 - p1)
                .cross(&(p1 - p2))
                .try_normalize(1e-12)
                .unwrap_or_else(Vector3f::zeros)
        })
        .collect()
}

/// Estimate the feature size of a mesh, advancing the process-wide sampling
/// generator. Successive calls on the same mesh may differ slightly.
pub fn compute_feature_size(mesh: &SurfaceMesh) -> f32 {
    let mut state = FEATURE_SIZE_RNG
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let (size, next) = feature_size_from(mesh, *state);
    *state = next;
    size
}

/// Estimate the feature size with an explicit generator state, for
/// reproducible results
pub fn compute_feature_size_seeded(mesh: &SurfaceMesh, seed: u32) -> f32 {
    feature_size_from(mesh, seed).0
}

/// Sample `|curv1|` and `|curv2|` at random vertices, take the value at the
/// 10th percentile and return `min(0.01 / value, 0.05 * radius)`.
fn feature_size_from(mesh: &SurfaceMesh, mut state: u32) -> (f32, u32) {
    let radius = mesh.bounding_sphere().radius;
    let nv = mesh.vertex_count();
    let bound = 0.05 * radius;

    let size = if nv == 0 {
        bound
    } else {
        let nsamp = nv.min(FEATURE_SIZE_SAMPLES);
        let mut samples = Vec::with_capacity(2 * nsamp);
        for _ in 0..nsamp {
            state = lcg_next(state);
            let ind = state as usize % nv;
            samples.push(mesh.curv1()[ind].abs());
            samples.push(mesh.curv2()[ind].abs());
        }
        let which = (0.1 * samples.len() as f32) as usize;
        let (_, value, _) = samples.select_nth_unstable_by(which, f32::total_cmp);
        (0.01 / *value).min(bound)
    };

    if size.is_finite() && size > 0.0 {
        (size, state)
    } else {
        log::warn!("feature size estimate {size} is unusable, falling back to 1.0");
        (1.0, state)
    }
}

/// Whether face `face` is turned towards `camera`: the vector from its
/// first vertex to the camera points to the side of its normal. Degenerate
/// faces never face the camera.
#[inline]
pub fn faces_camera(mesh: &SurfaceMesh, face_normals: &[Vector3f], face: usize, camera: &Point3f) -> bool {
    let n = &face_normals[face];
    if *n == Vector3f::zeros() {
        return false;
    }
    let v0 = mesh.vertices()[mesh.faces()[face][0]];
    (camera - v0).dot(n) > 0.0
}

/// View-independent analysis of a mesh
#[derive(Debug, Clone, Default)]
pub struct ViewIndependentData {
    pub face_normals: Vec<Vector3f>,
    pub feature_size: f32,
}

impl ViewIndependentData {
    pub fn compute(mesh: &SurfaceMesh) -> Self {
        let data = Self {
            face_normals: compute_face_normals(mesh),
            feature_size: compute_feature_size(mesh),
        };
        log::debug!(
            "view-independent analysis: {} faces, feature size {}",
            data.face_normals.len(),
            data.feature_size
        );
        data
    }

    /// Same as [`compute`](Self::compute) with a fixed sampling seed
    pub fn compute_seeded(mesh: &SurfaceMesh, seed: u32) -> Self {
        Self {
            face_normals: compute_face_normals(mesh),
            feature_size: compute_feature_size_seeded(mesh, seed),
        }
    }
}
