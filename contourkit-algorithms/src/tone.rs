//! Per-vertex ink for shading contours directly onto the mesh

use crate::smoothstep;
use crate::view_dependent::ViewDependentFields;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneParams {
    /// `|n·v|` below which contour ink appears
    pub contour_limit: f32,
    /// Feature-size-scaled `|kr|` below which suggestive ink appears
    pub suggestive_limit: f32,
    /// Minimum feature-size-scaled radial-curvature derivative for suggestive ink
    pub dwkr_limit: f32,
}

impl Default for ToneParams {
    fn default() -> Self {
        Self {
            contour_limit: 0.2,
            suggestive_limit: 1.0,
            dwkr_limit: 0.05,
        }
    }
}

impl ToneParams {
    pub fn with_contour_limit(mut self, limit: f32) -> Self {
        self.contour_limit = limit;
        self
    }

    pub fn with_suggestive_limit(mut self, limit: f32) -> Self {
        self.suggestive_limit = limit;
        self
    }

    pub fn with_dwkr_limit(mut self, limit: f32) -> Self {
        self.dwkr_limit = limit;
        self
    }
}

/// Ink in `[0, 1]` per vertex, the larger of the contour and the suggestive
/// contour contributions. Suggestive ink needs the curvature fields; without
/// them only contour ink is produced.
pub fn compute_vertex_tone(fields: &ViewDependentFields, feature_size: f32, params: &ToneParams) -> Vec<f32> {
    let fs2 = feature_size * feature_size;
    (0..fields.ndotv.len())
        .map(|i| {
            let contour = 1.0 - smoothstep(0.0, params.contour_limit, fields.ndotv[i].abs());
            let suggestive = match (fields.kr.get(i), fields.dwkr(i)) {
                (Some(kr), Some(dwkr)) if dwkr * fs2 > params.dwkr_limit => {
                    1.0 - smoothstep(0.0, params.suggestive_limit, kr.abs() * feature_size)
                }
                _ => 0.0,
            };
            contour.max(suggestive)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contour_ink_peaks_at_silhouette() {
        let fields = ViewDependentFields {
            ndotv: vec![0.0, 0.1, 0.5, -0.05],
            ..Default::default()
        };
        let tone = compute_vertex_tone(&fields, 1.0, &ToneParams::default());
        assert_eq!(tone[0], 1.0);
        assert!(tone[1] > 0.0 && tone[1] < 1.0);
        assert_eq!(tone[2], 0.0);
        assert!(tone[3] > tone[1]);
    }

    #[test]
    fn test_suggestive_ink_needs_positive_derivative() {
        let fields = ViewDependentFields {
            ndotv: vec![0.9, 0.9],
            kr: vec![0.0, 0.0],
            num: vec![1.0, -1.0],
            den: vec![0.9, 0.9],
            ..Default::default()
        };
        let tone = compute_vertex_tone(&fields, 1.0, &ToneParams::default());
        assert_eq!(tone[0], 1.0);
        assert_eq!(tone[1], 0.0);
    }
}
