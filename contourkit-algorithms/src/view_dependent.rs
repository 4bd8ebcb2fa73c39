//! View-dependent per-vertex fields: n·v, radial curvature and the terms
//! of its directional derivative
//!
//! All fields depend on the camera position and are recomputed from scratch
//! whenever it moves. Each vertex is independent, so large meshes are
//! processed on the rayon pool.

use contourkit_core::{Point3f, SurfaceMesh, Vector3f};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Below this squared tangent-plane length the radial direction is undefined
const DEGENERATE_PROJECTION: f32 = 1e-12;

/// Which fields a consumer needs for the current frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FieldRequirements {
    pub ndotv: bool,
    /// Radial curvature and its derivative, with the gating threshold on `den`
    pub curvature: Option<f32>,
}

impl FieldRequirements {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn ndotv() -> Self {
        Self {
            ndotv: true,
            curvature: None,
        }
    }

    pub fn curvature(sc_threshold: f32) -> Self {
        Self {
            ndotv: true,
            curvature: Some(sc_threshold),
        }
    }

    /// Union of two requirement sets. Two curvature requests keep the larger
    /// threshold.
    pub fn merge(self, other: Self) -> Self {
        let curvature = match (self.curvature, other.curvature) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        Self {
            ndotv: self.ndotv || other.ndotv || curvature.is_some(),
            curvature,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.ndotv && self.curvature.is_none()
    }
}

/// Configuration for the per-vertex field pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Meshes with more vertices than this are processed in parallel
    pub parallel_threshold: usize,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 10_000,
        }
    }
}

impl FieldConfig {
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Never go parallel
    pub fn sequential() -> Self {
        Self {
            parallel_threshold: usize::MAX,
        }
    }
}

/// Per-vertex fields for one camera position
#[derive(Debug, Clone)]
pub struct ViewDependentFields {
    pub camera: Point3f,
    pub ndotv: Vec<f32>,
    pub kr: Vec<f32>,
    pub num: Vec<f32>,
    pub den: Vec<f32>,
}

impl Default for ViewDependentFields {
    fn default() -> Self {
        Self {
            camera: Point3f::origin(),
            ndotv: Vec::new(),
            kr: Vec::new(),
            num: Vec::new(),
            den: Vec::new(),
        }
    }
}

impl ViewDependentFields {
    /// Directional derivative of radial curvature, `None` where the
    /// denominator was gated
    #[inline]
    pub fn dwkr(&self, vertex: usize) -> Option<f32> {
        let den = *self.den.get(vertex)?;
        (den != 0.0).then(|| self.num[vertex] / den)
    }

    pub fn has_ndotv(&self) -> bool {
        !self.ndotv.is_empty()
    }

    pub fn has_curvature(&self) -> bool {
        !self.kr.is_empty()
    }
}

#[inline]
fn view_direction(camera: &Point3f, p: &Point3f) -> Vector3f {
    (camera - p).try_normalize(0.0).unwrap_or_else(Vector3f::zeros)
}

fn vertex_ndotv(mesh: &SurfaceMesh, camera: &Point3f, i: usize) -> f32 {
    view_direction(camera, &mesh.vertices()[i]).dot(&mesh.normals()[i])
}

/// `(kr, num, den)` at one vertex
fn vertex_curvature_terms(
    mesh: &SurfaceMesh,
    camera: &Point3f,
    sc_threshold: f32,
    ndotv: f32,
    i: usize,
) -> (f32, f32, f32) {
    let w = view_direction(camera, &mesh.vertices()[i]);
    let u = w.dot(&mesh.pdir1()[i]);
    let v = w.dot(&mesh.pdir2()[i]);
    let s = u * u + v * v;
    let (k1, k2) = (mesh.curv1()[i], mesh.curv2()[i]);

    let (kr, num) = if s < DEGENERATE_PROJECTION {
        (0.5 * (k1 + k2), 0.0)
    } else {
        let kr = (k1 * u * u + k2 * v * v) / s;
        let [c0, c1, c2, c3] = mesh.dcurv()[i];
        let cwww = u * u * (u * c0 + 3.0 * v * c1) + v * v * (3.0 * u * c2 + v * c3);
        let tr = (k2 - k1) * u * v / s;
        (kr, cwww / s - 2.0 * ndotv * tr * tr)
    };

    let den = if ndotv.abs() >= sc_threshold { ndotv } else { 0.0 };
    (kr, num, den)
}

/// `normalize(camera - p) · n` for every vertex
pub fn compute_ndotv(mesh: &SurfaceMesh, camera: &Point3f, config: &FieldConfig) -> Vec<f32> {
    let n = mesh.vertex_count();
    if n > config.parallel_threshold {
        (0..n).into_par_iter().map(|i| vertex_ndotv(mesh, camera, i)).collect()
    } else {
        (0..n).map(|i| vertex_ndotv(mesh, camera, i)).collect()
    }
}

/// Radial curvature `kr` and the numerator and gated denominator of its
/// derivative along the projected view direction. `ndotv` must hold one
/// value per vertex.
pub fn compute_curvature_derivatives(
    mesh: &SurfaceMesh,
    camera: &Point3f,
    sc_threshold: f32,
    ndotv: &[f32],
    config: &FieldConfig,
) -> (Vec<f32>, Vec<f32>, Vec<f32>) {
    let n = mesh.vertex_count();
    let terms = |i: usize| vertex_curvature_terms(mesh, camera, sc_threshold, ndotv[i], i);
    if n > config.parallel_threshold {
        let per_vertex: Vec<_> = (0..n).into_par_iter().map(terms).collect();
        itertools::multiunzip(per_vertex)
    } else {
        itertools::multiunzip((0..n).map(terms))
    }
}

/// Compute the requested fields for `camera`
pub fn compute_view_dependent(
    mesh: &SurfaceMesh,
    camera: &Point3f,
    requirements: FieldRequirements,
    config: &FieldConfig,
) -> ViewDependentFields {
    let mut fields = ViewDependentFields {
        camera: *camera,
        ..Default::default()
    };
    if requirements.is_empty() {
        return fields;
    }
    fields.ndotv = compute_ndotv(mesh, camera, config);
    if let Some(sc_threshold) = requirements.curvature {
        let (kr, num, den) = compute_curvature_derivatives(mesh, camera, sc_threshold, &fields.ndotv, config);
        fields.kr = kr;
        fields.num = num;
        fields.den = den;
    }
    log::trace!(
        "recomputed view-dependent fields for {} vertices (curvature: {})",
        mesh.vertex_count(),
        fields.has_curvature()
    );
    fields
}
