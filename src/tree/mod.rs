//! Loose octree spatial index

pub mod node;
pub mod octree;

pub use node::Node;
pub use octree::{Octree, OctreeConfig, RayHit, VisibleNode};
