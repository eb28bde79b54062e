//! Axis-aligned bounding box
//!
//! The box type shared by records, nodes, and query regions. Overlap is
//! inclusive on every axis: touching faces count as intersecting, which
//! keeps objects sitting exactly on a split plane queryable from either
//! side.

use crate::core::types::Vec3;

/// Axis-aligned box spanning `min` to `max`, faces included
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Box spanning the two corners; callers keep `min <= max` per axis
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box of the given half-extents around `center`
    pub fn from_center_half_extent(center: Vec3, half_extent: Vec3) -> Self {
        Self {
            min: center - half_extent,
            max: center + half_extent,
        }
    }

    /// Unpack from the record layout (min_x, min_y, min_z, max_x, max_y, max_z)
    pub fn from_bounds(bounds: &[f32; 6]) -> Self {
        Self {
            min: Vec3::new(bounds[0], bounds[1], bounds[2]),
            max: Vec3::new(bounds[3], bounds[4], bounds[5]),
        }
    }

    /// Pack into the record layout (min_x, min_y, min_z, max_x, max_y, max_z)
    pub fn to_bounds(&self) -> [f32; 6] {
        [
            self.min.x, self.min.y, self.min.z,
            self.max.x, self.max.y, self.max.z,
        ]
    }

    /// Centroid, the point octant splits pivot on
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Half the edge lengths
    pub fn half_extent(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Whether `p` lies in the box, faces included
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Inclusive overlap: true when the boxes share at least one point
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }

    /// [`Aabb::intersects`] against a still-packed record bounds array
    pub fn intersects_bounds(&self, bounds: &[f32; 6]) -> bool {
        self.min.x <= bounds[3] && self.max.x >= bounds[0] &&
        self.min.y <= bounds[4] && self.max.y >= bounds[1] &&
        self.min.z <= bounds[5] && self.max.z >= bounds[2]
    }

    /// Smallest box covering both
    pub fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Half-split sub-box for octant `index`; bits 0, 1, 2 select the high
    /// half on x, y, z.
    ///
    /// Each corner is taken from `min`, the centroid, or `max` directly
    /// rather than recomputed from offsets, so sibling octants tile the
    /// parent exactly and share split faces bit-for-bit.
    pub fn child_octant(&self, index: u8) -> Aabb {
        let center = self.center();
        Aabb {
            min: Vec3::new(
                if index & 1 != 0 { center.x } else { self.min.x },
                if index & 2 != 0 { center.y } else { self.min.y },
                if index & 4 != 0 { center.z } else { self.min.z },
            ),
            max: Vec3::new(
                if index & 1 != 0 { self.max.x } else { center.x },
                if index & 2 != 0 { self.max.y } else { center.y },
                if index & 4 != 0 { self.max.z } else { center.z },
            ),
        }
    }
}
