//! Bounding volumes

use crate::point::*;
use serde::{Deserialize, Serialize};

/// A sphere enclosing a set of points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingSphere {
    pub center: Point3f,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Point3f, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Sphere centered on the axis-aligned bounding box of `points`, with the
    /// radius reaching the farthest point. Empty input gives a zero sphere at
    /// the origin.
    pub fn from_points(points: &[Point3f]) -> Self {
        let Some((min, max)) = aabb(points.iter().copied()) else {
            return Self::default();
        };
        let center = nalgebra::center(&min, &max);
        let radius = points
            .iter()
            .map(|p| (p - center).norm())
            .fold(0.0f32, f32::max);
        Self { center, radius }
    }

    /// Smallest sphere around the box enclosing every input sphere, grown so
    /// that each input sphere fits entirely inside it.
    pub fn enclosing<I>(spheres: I) -> Self
    where
        I: IntoIterator<Item = BoundingSphere>,
        I::IntoIter: Clone,
    {
        let spheres = spheres.into_iter();
        let mut boxmin = Point3f::new(f32::MAX, f32::MAX, f32::MAX);
        let mut boxmax = Point3f::new(f32::MIN, f32::MIN, f32::MIN);
        let mut any = false;
        for s in spheres.clone() {
            any = true;
            for j in 0..3 {
                boxmin[j] = boxmin[j].min(s.center[j] - s.radius);
                boxmax[j] = boxmax[j].max(s.center[j] + s.radius);
            }
        }
        if !any {
            return Self::default();
        }
        let center = nalgebra::center(&boxmin, &boxmax);
        let radius = spheres
            .map(|s| (s.center - center).norm() + s.radius)
            .fold(0.0f32, f32::max);
        Self { center, radius }
    }

    pub fn contains(&self, p: &Point3f, epsilon: f32) -> bool {
        (p - self.center).norm() <= self.radius + epsilon
    }
}

impl Default for BoundingSphere {
    fn default() -> Self {
        Self {
            center: Point3f::origin(),
            radius: 0.0,
        }
    }
}

/// Axis-aligned bounding box of a point sequence
pub fn aabb<I: IntoIterator<Item = Point3f>>(points: I) -> Option<(Point3f, Point3f)> {
    let mut iter = points.into_iter();
    let first = iter.next()?;
    let (mut min, mut max) = (first, first);
    for p in iter {
        min = min.inf(&p);
        max = max.sup(&p);
    }
    Some((min, max))
}
