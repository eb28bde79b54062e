//! Octree node and octant classification

use crate::math::Aabb;
use crate::store::NIL;

/// Marks a node without children
pub(crate) const NO_CHILDREN: i32 = -1;

/// A single octree node.
///
/// Nodes live in the tree's arena; a split allocates eight children as a
/// contiguous run starting at `first_child` in canonical octant order
/// (bit 0 = x, bit 1 = y, bit 2 = z).
#[derive(Clone, Copy, Debug)]
pub struct Node {
    /// Region covered by this node
    pub bounds: Aabb,
    /// Depth from the root (root = 0)
    pub level: u8,
    /// Store index of the first object held directly at this node, or -1
    pub head: i32,
    /// Arena index of child octant 0, or -1 for a leaf
    pub first_child: i32,
}

impl Node {
    pub fn new(bounds: Aabb, level: u8) -> Self {
        Self {
            bounds,
            level,
            head: NIL,
            first_child: NO_CHILDREN,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.first_child == NO_CHILDREN
    }

    pub fn is_empty(&self) -> bool {
        self.head == NIL
    }
}

/// Pick the child octant of `parent` that wholly contains `bounds`.
///
/// Returns `None` when the box straddles any midplane; such objects stay on
/// the parent's own list. Boxes touching a midplane exactly classify to the
/// low side.
pub(crate) fn classify_octant(parent: &Aabb, bounds: &Aabb) -> Option<u8> {
    let center = parent.center();
    let x = octant_bit(bounds.min.x, bounds.max.x, center.x)?;
    let y = octant_bit(bounds.min.y, bounds.max.y, center.y)?;
    let z = octant_bit(bounds.min.z, bounds.max.z, center.z)?;
    Some(x | (y << 1) | (z << 2))
}

/// 0 for the low half, 1 for the high half, None when straddling the plane
fn octant_bit(min: f32, max: f32, plane: f32) -> Option<u8> {
    if max <= plane {
        Some(0)
    } else if min >= plane {
        Some(1)
    } else {
        None
    }
}
