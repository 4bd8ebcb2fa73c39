//! Shared setup for the contourkit demos: scene configuration loaded from
//! JSON and the model/viewer construction it describes

use anyhow::{Context, Result};
use contourkit_algorithms::{prepare_surface, FieldConfig, SuggestiveContourParams, ToneParams};
use contourkit_core::{primitives, SurfaceMesh, TriangleMesh};
use contourkit_render::{
    BaseDrawer, Command, DrawerKind, EdgeSilhouetteDrawer, FaceSilhouetteDrawer, Frame, Model,
    SuggestiveContourDrawer, ViewerState,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Surface to render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeConfig {
    Torus {
        major: f32,
        minor: f32,
        segments: usize,
        sides: usize,
    },
    Sphere {
        radius: f32,
        stacks: usize,
        slices: usize,
    },
    /// A raw triangle mesh stored as JSON, prepared on load
    Mesh { path: PathBuf },
}

impl Default for ShapeConfig {
    fn default() -> Self {
        ShapeConfig::Torus {
            major: 3.0,
            minor: 1.0,
            segments: 96,
            sides: 48,
        }
    }
}

impl ShapeConfig {
    pub fn build(&self) -> Result<SurfaceMesh> {
        let mesh = match self {
            ShapeConfig::Torus {
                major,
                minor,
                segments,
                sides,
            } => primitives::torus(*major, *minor, *segments, *sides)?,
            ShapeConfig::Sphere {
                radius,
                stacks,
                slices,
            } => primitives::uv_sphere(*radius, *stacks, *slices)?,
            ShapeConfig::Mesh { path } => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading mesh {}", path.display()))?;
                let raw: TriangleMesh = serde_json::from_str(&text)
                    .with_context(|| format!("parsing mesh {}", path.display()))?;
                prepare_surface(raw)?
            }
        };
        Ok(mesh)
    }
}

/// Everything the orbit demo reads from its configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub shape: ShapeConfig,
    pub frames: usize,
    /// Radians per frame about the vertical axis
    pub orbit_step: f32,
    /// Initial tilt above the equator, in radians
    pub elevation: f32,
    /// Camera distance in bounding-sphere radii
    pub distance: f32,
    pub seed: Option<u32>,
    pub face_silhouettes: bool,
    /// Keys applied to the viewer before the first frame
    pub keys: String,
    pub suggestive: SuggestiveContourParams,
    pub tone: ToneParams,
    pub fields: FieldConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            shape: ShapeConfig::default(),
            frames: 36,
            orbit_step: std::f32::consts::TAU / 36.0,
            elevation: 0.35,
            distance: 5.0,
            seed: None,
            face_silhouettes: false,
            keys: String::new(),
            suggestive: SuggestiveContourParams::default(),
            tone: ToneParams::default(),
            fields: FieldConfig::default(),
        }
    }
}

impl RenderConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Build the model with its drawer stack
    pub fn build_model(&self) -> Result<Model> {
        let mesh = self.shape.build()?;
        let model = match self.seed {
            Some(seed) => Model::new_seeded(mesh, seed),
            None => Model::new(mesh),
        };
        let mut model = model.with_field_config(self.fields.clone());

        model.push_drawer(Box::new(BaseDrawer::new().with_tone(self.tone.clone())));
        model.push_drawer(Box::new(EdgeSilhouetteDrawer::default()));
        if self.face_silhouettes {
            model.push_drawer(Box::new(FaceSilhouetteDrawer::default()));
        }
        let suggestive = SuggestiveContourDrawer::default().with_params(self.suggestive.clone());
        model.push_drawer(Box::new(suggestive));
        Ok(model)
    }

    /// Build a viewer holding the model, with the configured keys applied
    pub fn build_viewer(&self) -> Result<ViewerState> {
        let mut viewer = ViewerState::new();
        viewer.add_model(self.build_model()?);
        for key in self.keys.chars() {
            match Command::from_key(key) {
                Some(command) => viewer.handle_command(command),
                None => log::warn!("no command bound to key {key:?}"),
            }
        }
        Ok(viewer)
    }
}

/// Per-frame line counts, written out by the demos
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameStats {
    pub frame: usize,
    pub camera: [f32; 3],
    pub edge_silhouettes: usize,
    pub face_silhouettes: usize,
    pub suggestive_contours: usize,
    pub triangles: usize,
}

impl FrameStats {
    pub fn from_frame(index: usize, frame: &Frame) -> Self {
        let lines = |kind| {
            frame
                .batch(kind)
                .and_then(|b| b.as_lines())
                .map_or(0, |l| l.segment_count())
        };
        Self {
            frame: index,
            camera: [frame.camera.x, frame.camera.y, frame.camera.z],
            edge_silhouettes: lines(DrawerKind::EdgeSilhouette),
            face_silhouettes: lines(DrawerKind::FaceSilhouette),
            suggestive_contours: lines(DrawerKind::SuggestiveContour),
            triangles: frame
                .batch(DrawerKind::Base)
                .and_then(|b| b.as_triangles())
                .map_or(0, |t| t.triangle_count()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contourkit_algorithms::SuggestiveCriterion;

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let config = RenderConfig::from_json(
            r#"{
                "shape": { "kind": "sphere", "radius": 1.5, "stacks": 16, "slices": 24 },
                "frames": 4,
                "keys": "ef",
                "suggestive": { "threshold": 0.002, "fading": false, "fade_factor": 1.0, "criterion": "RadialCurvatureZero" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.frames, 4);
        assert_eq!(config.distance, 5.0);
        assert_eq!(config.suggestive.criterion, SuggestiveCriterion::RadialCurvatureZero);
        assert!(matches!(config.shape, ShapeConfig::Sphere { stacks: 16, .. }));
    }

    #[test]
    fn test_unknown_shape_is_rejected() {
        assert!(RenderConfig::from_json(r#"{ "shape": { "kind": "teapot" } }"#).is_err());
    }

    #[test]
    fn test_viewer_applies_keys() {
        let config = RenderConfig {
            shape: ShapeConfig::Sphere {
                radius: 1.0,
                stacks: 8,
                slices: 12,
            },
            seed: Some(1),
            face_silhouettes: true,
            keys: "zd?".to_string(),
            ..Default::default()
        };
        let viewer = config.build_viewer().unwrap();
        assert!(viewer.is_diffuse());
        let model = &viewer.models()[0];
        assert_eq!(model.drawers().len(), 4);
        let edge = model
            .drawers()
            .iter()
            .find(|d| d.kind() == DrawerKind::EdgeSilhouette)
            .unwrap();
        assert!(!edge.is_visible());
    }
}
