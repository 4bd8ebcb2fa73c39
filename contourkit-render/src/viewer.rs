//! Application state of a contour viewer: models, transforms, toggles and
//! the mapping from key presses to commands

use crate::draw_buffer::Frame;
use crate::drawer::{Drawer, DrawerKind};
use crate::fps::FpsCounter;
use crate::model::Model;
use contourkit_core::{BoundingSphere, Point3f, Rgb, Transform3D, Transformable, Vector3f};

const FALSE_COLOR: Rgb = [1.0, 0.0, 0.0];
const BLACK: Rgb = [0.0, 0.0, 0.0];

/// Runtime controls of the viewer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    ToggleBase,
    ToggleEdgeSilhouette,
    ToggleFaceSilhouette,
    ToggleSuggestive,
    ToggleFading,
    ToggleCriterion,
    /// Draw suggestive contours in red
    FalseColor,
    /// Draw suggestive contours in black
    BlackColor,
    ToggleDiffuse,
    SetFadeFactor(f32),
}

impl Command {
    /// Keyboard binding
    pub fn from_key(key: char) -> Option<Self> {
        let command = match key {
            'a' => Command::ToggleBase,
            'z' => Command::ToggleEdgeSilhouette,
            'x' => Command::ToggleFaceSilhouette,
            'e' => Command::ToggleSuggestive,
            'f' => Command::ToggleFading,
            'j' => Command::ToggleCriterion,
            'g' => Command::FalseColor,
            'h' => Command::BlackColor,
            'd' => Command::ToggleDiffuse,
            _ => return None,
        };
        Some(command)
    }
}

/// Everything the viewer keeps between frames
#[derive(Debug)]
pub struct ViewerState {
    models: Vec<Model>,
    transforms: Vec<Transform3D>,
    global_transform: Transform3D,
    global_bsphere: BoundingSphere,
    diffuse: bool,
    fade_factor: f32,
    fps: FpsCounter,
}

impl ViewerState {
    pub fn new() -> Self {
        Self {
            models: Vec::new(),
            transforms: Vec::new(),
            global_transform: Transform3D::identity(),
            global_bsphere: BoundingSphere::default(),
            diffuse: false,
            fade_factor: 1.0,
            fps: FpsCounter::new(),
        }
    }

    /// Add a model with an identity transform, returning its index
    pub fn add_model(&mut self, model: Model) -> usize {
        self.add_model_with_transform(model, Transform3D::identity())
    }

    pub fn add_model_with_transform(&mut self, mut model: Model, transform: Transform3D) -> usize {
        for drawer in model.drawers_mut() {
            drawer.set_diffuse(self.diffuse);
            drawer.set_fade_factor(self.fade_factor);
        }
        self.models.push(model);
        self.transforms.push(transform);
        self.update_bounding_sphere();
        self.models.len() - 1
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn model_mut(&mut self, index: usize) -> Option<&mut Model> {
        self.models.get_mut(index)
    }

    pub fn set_model_transform(&mut self, index: usize, transform: Transform3D) {
        if let Some(slot) = self.transforms.get_mut(index) {
            *slot = transform;
        }
    }

    pub fn global_transform(&self) -> &Transform3D {
        &self.global_transform
    }

    pub fn set_global_transform(&mut self, transform: Transform3D) {
        self.global_transform = transform;
    }

    pub fn bounding_sphere(&self) -> BoundingSphere {
        self.global_bsphere
    }

    pub fn is_diffuse(&self) -> bool {
        self.diffuse
    }

    pub fn fade_factor(&self) -> f32 {
        self.fade_factor
    }

    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }

    /// Recompute the sphere enclosing every model under its transform
    pub fn update_bounding_sphere(&mut self) {
        let spheres: Vec<BoundingSphere> = self
            .models
            .iter()
            .zip(&self.transforms)
            .map(|(model, xf)| {
                let mut sphere = model.bounding_sphere();
                sphere.transform(xf);
                sphere
            })
            .collect();
        self.global_bsphere = BoundingSphere::enclosing(spheres);
    }

    /// Drop all model transforms and place the scene in front of the eye,
    /// five radii down the view axis
    pub fn reset_view(&mut self) {
        self.transforms.iter_mut().for_each(|xf| *xf = Transform3D::identity());
        self.update_bounding_sphere();
        let sphere = self.global_bsphere;
        self.global_transform = Transform3D::translation(Vector3f::new(0.0, 0.0, -5.0 * sphere.radius))
            * Transform3D::translation(-sphere.center.coords);
    }

    /// Eye position in the local frame of model `index`
    pub fn camera_position_for(&self, index: usize) -> Option<Point3f> {
        let model_xf = self.transforms.get(index)?;
        (self.global_transform * *model_xf).eye_position()
    }

    fn for_each_drawer(&mut self, kind: Option<DrawerKind>, mut f: impl FnMut(&mut dyn Drawer)) {
        for model in &mut self.models {
            for drawer in model.drawers_mut() {
                if kind.map_or(true, |k| drawer.kind() == k) {
                    f(drawer);
                }
            }
        }
    }

    fn toggle_visibility(&mut self, kind: DrawerKind) {
        self.for_each_drawer(Some(kind), |d| {
            d.toggle_visibility();
            log::info!("{kind} drawer visible: {}", d.is_visible());
        });
    }

    fn set_line_color(&mut self, kind: DrawerKind, color: Rgb) {
        self.for_each_drawer(Some(kind), |d| {
            if let Some(style) = d.line_style_mut() {
                style.color = color;
            }
        });
    }

    /// Apply a command to the state and the models' drawers
    pub fn handle_command(&mut self, command: Command) {
        match command {
            Command::ToggleBase => self.toggle_visibility(DrawerKind::Base),
            Command::ToggleEdgeSilhouette => self.toggle_visibility(DrawerKind::EdgeSilhouette),
            Command::ToggleFaceSilhouette => self.toggle_visibility(DrawerKind::FaceSilhouette),
            Command::ToggleSuggestive => self.toggle_visibility(DrawerKind::SuggestiveContour),
            Command::ToggleFading => self.for_each_drawer(None, |d| {
                if let Some(fading) = d.toggle_fading() {
                    log::info!("{} fading: {fading}", d.kind());
                }
            }),
            Command::ToggleCriterion => self.for_each_drawer(None, |d| {
                if let Some(criterion) = d.toggle_criterion() {
                    log::info!("{} criterion: {criterion:?}", d.kind());
                }
            }),
            Command::FalseColor => self.set_line_color(DrawerKind::SuggestiveContour, FALSE_COLOR),
            Command::BlackColor => self.set_line_color(DrawerKind::SuggestiveContour, BLACK),
            Command::ToggleDiffuse => {
                self.diffuse = !self.diffuse;
                let diffuse = self.diffuse;
                self.for_each_drawer(None, |d| d.set_diffuse(diffuse));
                log::info!("diffuse lighting: {diffuse}");
            }
            Command::SetFadeFactor(factor) => {
                let factor = factor.max(0.0);
                self.fade_factor = factor;
                self.for_each_drawer(None, |d| d.set_fade_factor(factor));
            }
        }
    }

    /// Render every model from the current global transform, one frame each
    pub fn render_frame(&mut self) -> Vec<Frame> {
        let mut frames = Vec::with_capacity(self.models.len());
        for index in 0..self.models.len() {
            let Some(camera) = self.camera_position_for(index) else {
                log::warn!("model {index} has a singular transform, skipping");
                continue;
            };
            frames.push(self.models[index].render(&camera));
        }
        if let Some(fps) = self.fps.tick() {
            log::debug!("{fps} frames per second");
        }
        frames
    }
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::new()
    }
}
