//! Silhouette line drawers

use crate::draw_buffer::{DrawBatch, DrawBuffer, LineStyle};
use crate::drawer::{DrawContext, Drawer, DrawerKind};
use contourkit_algorithms::{extract_edge_silhouettes, extract_face_silhouettes, FieldRequirements};
use contourkit_core::Rgb;

/// Traces silhouettes across mesh edges. Lines follow the coarse mesh
/// edges, so they may show small loops and flicker while the camera moves.
#[derive(Debug, Clone)]
pub struct EdgeSilhouetteDrawer {
    visible: bool,
    style: LineStyle,
    buffer: DrawBuffer,
}

impl EdgeSilhouetteDrawer {
    pub fn new(color: Rgb, width: f32) -> Self {
        Self {
            visible: true,
            style: LineStyle::new(color, width),
            buffer: DrawBuffer::new(),
        }
    }

    pub fn style(&self) -> LineStyle {
        self.style
    }
}

impl Default for EdgeSilhouetteDrawer {
    fn default() -> Self {
        Self::new([0.0, 0.0, 0.0], 3.0)
    }
}

impl Drawer for EdgeSilhouetteDrawer {
    fn kind(&self) -> DrawerKind {
        DrawerKind::EdgeSilhouette
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn requirements(&self) -> FieldRequirements {
        FieldRequirements::ndotv()
    }

    fn draw(&mut self, ctx: &DrawContext<'_>) {
        let segments = extract_edge_silhouettes(ctx.mesh, ctx.face_normals, ctx.topology, ctx.fields, &ctx.camera);
        self.buffer.extend(&segments, self.style.color);
    }

    fn flush(&mut self) -> DrawBatch {
        DrawBatch::Lines(self.buffer.flush(self.style))
    }

    fn line_style_mut(&mut self) -> Option<&mut LineStyle> {
        Some(&mut self.style)
    }
}

/// Traces silhouettes inside faces by interpolating n·v, giving one clean
/// segment per crossed face
#[derive(Debug, Clone)]
pub struct FaceSilhouetteDrawer {
    visible: bool,
    style: LineStyle,
    buffer: DrawBuffer,
}

impl FaceSilhouetteDrawer {
    pub fn new(color: Rgb, width: f32) -> Self {
        Self {
            visible: true,
            style: LineStyle::new(color, width),
            buffer: DrawBuffer::new(),
        }
    }

    pub fn style(&self) -> LineStyle {
        self.style
    }
}

impl Default for FaceSilhouetteDrawer {
    fn default() -> Self {
        Self::new([0.0, 0.0, 0.0], 3.0)
    }
}

impl Drawer for FaceSilhouetteDrawer {
    fn kind(&self) -> DrawerKind {
        DrawerKind::FaceSilhouette
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn requirements(&self) -> FieldRequirements {
        FieldRequirements::ndotv()
    }

    fn draw(&mut self, ctx: &DrawContext<'_>) {
        let segments = extract_face_silhouettes(ctx.mesh, ctx.face_normals, ctx.fields, &ctx.camera);
        self.buffer.extend(&segments, self.style.color);
    }

    fn flush(&mut self) -> DrawBatch {
        DrawBatch::Lines(self.buffer.flush(self.style))
    }

    fn line_style_mut(&mut self) -> Option<&mut LineStyle> {
        Some(&mut self.style)
    }
}
