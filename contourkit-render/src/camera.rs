//! Orbiting camera used to drive the pipeline without an interactive
//! trackball

use contourkit_core::{BoundingSphere, Point3f, Vector3f};
use nalgebra::{Matrix4, Rotation3, Unit};

/// A camera circling a target point
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub position: Point3f,
    pub target: Point3f,
    pub up: Vector3f,
}

impl OrbitCamera {
    pub fn new(position: Point3f, target: Point3f, up: Vector3f) -> Self {
        Self { position, target, up }
    }

    /// Look at a bounding sphere from `distance` radii away along +Z
    pub fn framing(sphere: &BoundingSphere, distance: f32) -> Self {
        let radius = sphere.radius.max(f32::EPSILON);
        Self::new(
            sphere.center + Vector3f::z() * (distance * radius),
            sphere.center,
            Vector3f::y(),
        )
    }

    /// World-to-eye transform, usable as the viewer's global transform
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    pub fn distance(&self) -> f32 {
        (self.position - self.target).norm()
    }

    /// Rotate the camera around the target: `horizontal` radians about the
    /// up axis, then `vertical` radians about the camera's right axis
    pub fn orbit(&mut self, horizontal: f32, vertical: f32) {
        let offset = self.position - self.target;
        let Some(up) = Unit::try_new(self.up, f32::EPSILON) else {
            return;
        };
        let mut offset = Rotation3::from_axis_angle(&up, horizontal) * offset;

        if let Some(right) = Unit::try_new(offset.cross(&up), f32::EPSILON) {
            let tilted = Rotation3::from_axis_angle(&right, vertical) * offset;
            // Stop short of the poles so the up vector stays usable
            if tilted.normalize().dot(&up).abs() < 0.999 {
                offset = tilted;
            }
        }
        self.position = self.target + offset;
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(Point3f::new(0.0, 0.0, 5.0), Point3f::origin(), Vector3f::y())
    }
}
