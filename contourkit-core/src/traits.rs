//! Core traits for contourkit

use crate::{bounds::*, mesh::*, point::*, transform::Transform3D};

/// Trait for objects occupying a region of space
pub trait Bounded {
    /// Get the axis-aligned bounding box of the object
    fn bounding_box(&self) -> (Point3f, Point3f);

    /// Get a sphere enclosing the object
    fn bounding_sphere(&self) -> BoundingSphere;

    /// Get the center point of the object
    fn center(&self) -> Point3f {
        let (min, max) = self.bounding_box();
        nalgebra::center(&min, &max)
    }
}

/// Trait for objects that can be transformed
pub trait Transformable {
    /// Apply a transformation to the object
    fn transform(&mut self, transform: &Transform3D);
}

impl Bounded for TriangleMesh {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        aabb(self.vertices.iter().copied()).unwrap_or((Point3f::origin(), Point3f::origin()))
    }

    fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::from_points(&self.vertices)
    }
}

impl Bounded for SurfaceMesh {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        aabb(self.vertices().iter().copied()).unwrap_or((Point3f::origin(), Point3f::origin()))
    }

    fn bounding_sphere(&self) -> BoundingSphere {
        SurfaceMesh::bounding_sphere(self)
    }
}

impl Transformable for TriangleMesh {
    fn transform(&mut self, transform: &Transform3D) {
        for v in &mut self.vertices {
            *v = transform.transform_point(v);
        }
        if let Some(normals) = &mut self.normals {
            for n in normals.iter_mut() {
                *n = transform
                    .transform_vector(n)
                    .try_normalize(f32::EPSILON)
                    .unwrap_or(*n);
            }
        }
    }
}

impl Transformable for BoundingSphere {
    /// Moves the center; the radius is scaled by the largest axis scale of the
    /// transform so the sphere keeps enclosing the transformed geometry.
    fn transform(&mut self, transform: &Transform3D) {
        self.center = transform.transform_point(&self.center);
        self.radius *= transform.max_axis_scale();
    }
}
