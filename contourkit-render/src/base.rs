//! Drawer for the mesh surface itself

use crate::draw_buffer::{DrawBatch, MeshVertex, TriangleBatch};
use crate::drawer::{DrawContext, Drawer, DrawerKind};
use contourkit_algorithms::{compute_vertex_tone, FieldRequirements, ToneParams};
use contourkit_core::{with_alpha, Rgb};

/// Intensity of the headlight in diffuse mode
const DIFFUSE_INTENSITY: f32 = 0.85;

/// Draws the mesh triangles, either flat in a single color or lit by a
/// headlight with contour ink darkening the shading
#[derive(Debug, Clone)]
pub struct BaseDrawer {
    visible: bool,
    diffuse: bool,
    color: Rgb,
    tone: ToneParams,
    batch: TriangleBatch,
}

impl BaseDrawer {
    pub fn new() -> Self {
        Self {
            visible: true,
            diffuse: false,
            color: [1.0, 1.0, 1.0],
            tone: ToneParams::default(),
            batch: TriangleBatch::default(),
        }
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn with_diffuse(mut self, diffuse: bool) -> Self {
        self.diffuse = diffuse;
        self
    }

    pub fn with_tone(mut self, tone: ToneParams) -> Self {
        self.tone = tone;
        self
    }

    pub fn is_diffuse(&self) -> bool {
        self.diffuse
    }
}

impl Default for BaseDrawer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drawer for BaseDrawer {
    fn kind(&self) -> DrawerKind {
        DrawerKind::Base
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn requirements(&self) -> FieldRequirements {
        if self.diffuse {
            FieldRequirements::ndotv()
        } else {
            FieldRequirements::none()
        }
    }

    fn draw(&mut self, ctx: &DrawContext<'_>) {
        let mesh = ctx.mesh;
        let lit = self.diffuse && ctx.fields.ndotv.len() == mesh.vertex_count();
        let ink = if lit {
            compute_vertex_tone(ctx.fields, ctx.feature_size, &self.tone)
        } else {
            Vec::new()
        };

        self.batch.vertices.clear();
        self.batch.vertices.extend(mesh.vertices().iter().enumerate().map(|(i, p)| {
            let color = if lit {
                let shade = DIFFUSE_INTENSITY * ctx.fields.ndotv[i].max(0.0) * (1.0 - ink[i]);
                self.color.map(|c| c * shade)
            } else {
                self.color
            };
            MeshVertex::new(p, &mesh.normals()[i], with_alpha(color, 1.0))
        }));

        self.batch.indices.clear();
        self.batch
            .indices
            .extend(mesh.faces().iter().flat_map(|f| f.map(|v| v as u32)));
    }

    fn flush(&mut self) -> DrawBatch {
        DrawBatch::Triangles(std::mem::take(&mut self.batch))
    }

    fn set_diffuse(&mut self, diffuse: bool) {
        self.diffuse = diffuse;
    }
}
