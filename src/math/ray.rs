//! Ray type and slab intersection

use crate::core::types::Vec3;
use super::aabb::Aabb;

/// A ray defined by origin and direction
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    /// Precomputed 1/direction for fast AABB intersection
    pub inv_direction: Vec3,
}

impl Ray {
    /// Create a new ray (direction should be normalized)
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            inv_direction: Vec3::new(
                1.0 / direction.x,
                1.0 / direction.y,
                1.0 / direction.z,
            ),
        }
    }

    /// Get point along ray at parameter t
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Ray-AABB distance using the slab method.
    ///
    /// Returns the entry distance when the ray starts outside the box, the
    /// exit distance when it starts inside, and `f32::INFINITY` on a miss
    /// (including boxes entirely behind the origin).
    ///
    /// Axis-parallel directions produce infinite reciprocals; the per-axis
    /// formulation below keeps those well-defined, so do not refactor it into
    /// a shape that subtracts infinities.
    pub fn cast_distance(&self, aabb: &Aabb) -> f32 {
        let origin = self.origin.to_array();
        let inv = self.inv_direction.to_array();
        let bmin = aabb.min.to_array();
        let bmax = aabb.max.to_array();

        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let mut t1 = (bmin[axis] - origin[axis]) * inv[axis];
            let mut t2 = (bmax[axis] - origin[axis]) * inv[axis];
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_min > t_max {
                return f32::INFINITY;
            }
        }

        if t_min >= 0.0 {
            t_min
        } else if t_max >= 0.0 {
            t_max
        } else {
            f32::INFINITY
        }
    }
}
