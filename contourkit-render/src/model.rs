//! A mesh together with its analysis, per-frame fields and drawer stack

use crate::draw_buffer::Frame;
use crate::drawer::{DrawContext, Drawer, DrawerKind};
use contourkit_algorithms::{
    compute_view_dependent, EdgeTopology, FieldConfig, FieldRequirements, ViewDependentFields,
    ViewIndependentData,
};
use contourkit_core::{BoundingSphere, Point3f, SurfaceMesh};

/// A renderable model.
///
/// View-independent data is computed once on construction. View-dependent
/// fields are recomputed when the camera or the set of requested fields
/// changes, before any drawer runs.
pub struct Model {
    mesh: SurfaceMesh,
    analysis: ViewIndependentData,
    topology: EdgeTopology,
    fields: ViewDependentFields,
    computed: Option<(Point3f, FieldRequirements)>,
    field_config: FieldConfig,
    drawers: Vec<Box<dyn Drawer>>,
}

impl Model {
    pub fn new(mesh: SurfaceMesh) -> Self {
        let analysis = ViewIndependentData::compute(&mesh);
        Self::with_analysis(mesh, analysis)
    }

    /// Build a model with a fixed feature-size sampling seed
    pub fn new_seeded(mesh: SurfaceMesh, seed: u32) -> Self {
        let analysis = ViewIndependentData::compute_seeded(&mesh, seed);
        Self::with_analysis(mesh, analysis)
    }

    fn with_analysis(mesh: SurfaceMesh, analysis: ViewIndependentData) -> Self {
        let topology = EdgeTopology::build(mesh.faces());
        log::debug!(
            "model with {} vertices, {} faces, {} edges",
            mesh.vertex_count(),
            mesh.face_count(),
            topology.edge_count()
        );
        Self {
            mesh,
            analysis,
            topology,
            fields: ViewDependentFields::default(),
            computed: None,
            field_config: FieldConfig::default(),
            drawers: Vec::new(),
        }
    }

    pub fn with_field_config(mut self, config: FieldConfig) -> Self {
        self.field_config = config;
        self
    }

    pub fn mesh(&self) -> &SurfaceMesh {
        &self.mesh
    }

    pub fn bounding_sphere(&self) -> BoundingSphere {
        self.mesh.bounding_sphere()
    }

    pub fn feature_size(&self) -> f32 {
        self.analysis.feature_size
    }

    pub fn face_normals(&self) -> &[contourkit_core::Vector3f] {
        &self.analysis.face_normals
    }

    pub fn topology(&self) -> &EdgeTopology {
        &self.topology
    }

    /// Fields from the most recent recompute
    pub fn fields(&self) -> &ViewDependentFields {
        &self.fields
    }

    pub fn push_drawer(&mut self, drawer: Box<dyn Drawer>) {
        self.drawers.push(drawer);
    }

    pub fn pop_drawer(&mut self) -> Option<Box<dyn Drawer>> {
        self.drawers.pop()
    }

    pub fn clear_drawers(&mut self) {
        self.drawers.clear();
    }

    pub fn drawers(&self) -> &[Box<dyn Drawer>] {
        &self.drawers
    }

    pub fn drawers_mut(&mut self) -> impl Iterator<Item = &mut (dyn Drawer + 'static)> + '_ {
        self.drawers.iter_mut().map(|d| d.as_mut())
    }

    /// First drawer of the given kind
    pub fn drawer_mut(&mut self, kind: DrawerKind) -> Option<&mut (dyn Drawer + 'static)> {
        self.drawers_mut().find(|d| d.kind() == kind)
    }

    /// Make sure n·v is available for `camera`
    pub fn need_ndotv(&mut self, camera: &Point3f) {
        self.update_fields(camera, FieldRequirements::ndotv());
    }

    /// Make sure radial curvature and its derivative are available for `camera`
    pub fn need_curvature_derivatives(&mut self, camera: &Point3f, sc_threshold: f32) {
        self.update_fields(camera, FieldRequirements::curvature(sc_threshold));
    }

    fn update_fields(&mut self, camera: &Point3f, requirements: FieldRequirements) {
        if requirements.is_empty() {
            return;
        }
        if self.computed == Some((*camera, requirements)) {
            return;
        }
        self.fields = compute_view_dependent(&self.mesh, camera, requirements, &self.field_config);
        self.computed = Some((*camera, requirements));
    }

    /// Run the visible drawers for one frame, in stack order.
    ///
    /// Fields are brought up to date for the union of the visible drawers'
    /// requirements first; each drawer then fills its buffer, and finally
    /// every buffer is flushed into the returned frame.
    pub fn render(&mut self, camera: &Point3f) -> Frame {
        let requirements = self
            .drawers
            .iter()
            .filter(|d| d.is_visible())
            .fold(FieldRequirements::none(), |acc, d| acc.merge(d.requirements()));
        self.update_fields(camera, requirements);

        let ctx = DrawContext {
            mesh: &self.mesh,
            face_normals: &self.analysis.face_normals,
            feature_size: self.analysis.feature_size,
            topology: &self.topology,
            fields: &self.fields,
            camera: *camera,
        };
        for drawer in self.drawers.iter_mut().filter(|d| d.is_visible()) {
            drawer.draw(&ctx);
        }

        let mut frame = Frame::new(*camera);
        for drawer in self.drawers.iter_mut().filter(|d| d.is_visible()) {
            frame.batches.push((drawer.kind(), drawer.flush()));
        }
        log::trace!(
            "frame: {} batches, {} segments",
            frame.batches.len(),
            frame.segment_count()
        );
        frame
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("vertices", &self.mesh.vertex_count())
            .field("faces", &self.mesh.face_count())
            .field("feature_size", &self.analysis.feature_size)
            .field("drawers", &self.drawers.iter().map(|d| d.kind()).collect::<Vec<_>>())
            .finish()
    }
}
