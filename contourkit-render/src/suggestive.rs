//! Suggestive contour drawer

use crate::draw_buffer::{DrawBatch, DrawBuffer, LineStyle};
use crate::drawer::{DrawContext, Drawer, DrawerKind};
use contourkit_algorithms::{
    extract_suggestive_contours, FieldRequirements, SuggestiveContourParams, SuggestiveCriterion,
};
use contourkit_core::Rgb;

#[derive(Debug, Clone)]
pub struct SuggestiveContourDrawer {
    visible: bool,
    style: LineStyle,
    params: SuggestiveContourParams,
    buffer: DrawBuffer,
}

impl SuggestiveContourDrawer {
    pub fn new(color: Rgb, width: f32, fading: bool, threshold: f32) -> Self {
        Self {
            visible: true,
            style: LineStyle::new(color, width),
            params: SuggestiveContourParams::default()
                .with_fading(fading)
                .with_threshold(threshold),
            buffer: DrawBuffer::new(),
        }
    }

    pub fn with_params(mut self, params: SuggestiveContourParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &SuggestiveContourParams {
        &self.params
    }

    pub fn is_faded(&self) -> bool {
        self.params.fading
    }

    pub fn style(&self) -> LineStyle {
        self.style
    }
}

impl Default for SuggestiveContourDrawer {
    fn default() -> Self {
        Self::new([0.0, 0.0, 0.0], 2.0, true, 0.001)
    }
}

impl Drawer for SuggestiveContourDrawer {
    fn kind(&self) -> DrawerKind {
        DrawerKind::SuggestiveContour
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn requirements(&self) -> FieldRequirements {
        FieldRequirements::curvature(self.params.threshold)
    }

    fn draw(&mut self, ctx: &DrawContext<'_>) {
        let segments = extract_suggestive_contours(
            ctx.mesh,
            ctx.face_normals,
            ctx.feature_size,
            ctx.fields,
            &ctx.camera,
            &self.params,
        );
        self.buffer.extend(&segments, self.style.color);
    }

    fn flush(&mut self) -> DrawBatch {
        DrawBatch::Lines(self.buffer.flush(self.style))
    }

    fn line_style_mut(&mut self) -> Option<&mut LineStyle> {
        Some(&mut self.style)
    }

    fn toggle_fading(&mut self) -> Option<bool> {
        self.params.fading = !self.params.fading;
        Some(self.params.fading)
    }

    fn toggle_criterion(&mut self) -> Option<SuggestiveCriterion> {
        self.params.criterion = self.params.criterion.toggled();
        Some(self.params.criterion)
    }

    fn set_fade_factor(&mut self, fade_factor: f32) {
        self.params.fade_factor = fade_factor;
    }
}
