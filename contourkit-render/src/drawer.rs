//! The drawer abstraction: one pass over a model that turns its geometry
//! and fields into a batch of primitives

use crate::draw_buffer::{DrawBatch, LineStyle};
use contourkit_algorithms::{EdgeTopology, FieldRequirements, SuggestiveCriterion, ViewDependentFields};
use contourkit_core::{Point3f, SurfaceMesh, Vector3f};
use serde::{Deserialize, Serialize};

/// Identifies a drawer variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawerKind {
    Base,
    EdgeSilhouette,
    FaceSilhouette,
    SuggestiveContour,
}

impl std::fmt::Display for DrawerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DrawerKind::Base => "base mesh",
            DrawerKind::EdgeSilhouette => "edge silhouette",
            DrawerKind::FaceSilhouette => "face silhouette",
            DrawerKind::SuggestiveContour => "suggestive contour",
        };
        f.write_str(name)
    }
}

/// Read-only view of a model handed to each drawer during a frame
#[derive(Debug, Clone, Copy)]
pub struct DrawContext<'a> {
    pub mesh: &'a SurfaceMesh,
    pub face_normals: &'a [Vector3f],
    pub feature_size: f32,
    pub topology: &'a EdgeTopology,
    pub fields: &'a ViewDependentFields,
    pub camera: Point3f,
}

/// A pass over a model producing one batch of primitives per frame.
///
/// Drawers own their visibility flag, configuration and output buffer. A
/// hidden drawer is skipped by the model entirely. The optional capabilities
/// at the bottom default to doing nothing, so commands aimed at one kind of
/// drawer can be broadcast to all of them.
pub trait Drawer: Send {
    fn kind(&self) -> DrawerKind;

    fn is_visible(&self) -> bool;

    fn set_visible(&mut self, visible: bool);

    fn toggle_visibility(&mut self) {
        let visible = self.is_visible();
        self.set_visible(!visible);
    }

    /// Fields this drawer reads in [`draw`](Drawer::draw)
    fn requirements(&self) -> FieldRequirements;

    /// Fill the internal buffer for the current frame
    fn draw(&mut self, ctx: &DrawContext<'_>);

    /// Hand over the buffered primitives and reset the buffer
    fn flush(&mut self) -> DrawBatch;

    fn line_style_mut(&mut self) -> Option<&mut LineStyle> {
        None
    }

    /// Returns the new fading state, if the drawer fades
    fn toggle_fading(&mut self) -> Option<bool> {
        None
    }

    /// Returns the new criterion, if the drawer has one
    fn toggle_criterion(&mut self) -> Option<SuggestiveCriterion> {
        None
    }

    fn set_fade_factor(&mut self, _fade_factor: f32) {}

    fn set_diffuse(&mut self, _diffuse: bool) {}
}
