//! Loose octree engine
//!
//! Objects are held at the deepest node whose midplanes they do not
//! straddle; straddlers stay on an ancestor's own list. Every object lives
//! at exactly one node, so no query can emit an id twice.

use std::cmp::Ordering;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::math::{Aabb, Frustum, Ray};
use crate::store::{RecordStore, NIL};
use super::node::{classify_octant, Node, NO_CHILDREN};

/// Traversal stack capacity for the iterative walks.
///
/// Each pop pushes at most seven net frames, so a tree at the default
/// maximum depth of 8 never exceeds this.
const RAY_STACK_DEPTH: usize = 64;

/// Engine configuration
#[derive(Clone, Copy, Debug)]
pub struct OctreeConfig {
    /// Region covered by the root node
    pub root_bounds: Aabb,
    /// Depth at which nodes stop splitting (root = 0)
    pub max_depth: u8,
    /// Object count that triggers a leaf split
    pub max_objects: usize,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            root_bounds: Aabb::from_center_half_extent(Vec3::ZERO, Vec3::splat(5.0)),
            max_depth: 8,
            max_objects: 16,
        }
    }
}

/// A ray hit reported by the queries
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    pub id: i32,
    pub distance: f32,
}

/// Per-node envelope handed to the combined frustum + ray walk
#[derive(Clone, Copy, Debug)]
pub struct VisibleNode {
    /// Region covered by the visited node
    pub bounds: Aabb,
    /// Depth of the visited node
    pub level: u8,
    /// Distance from the ray origin to the node centroid
    pub distance: f32,
    /// Ray hit that tightened the walk-wide closest-hit threshold at this
    /// node, if any
    pub mouse_hit: Option<RayHit>,
}

/// Dynamic loose octree over axis-aligned bounding boxes.
///
/// Nodes live in a contiguous arena with the root at index 0; a split
/// appends eight children as one dense run. Object records live in a
/// [`RecordStore`] and are threaded into one list per node.
pub struct Octree {
    config: OctreeConfig,
    nodes: Vec<Node>,
    store: RecordStore,
    /// Reusable stack for the iterative ray walks
    stack: Vec<i32>,
}

impl Octree {
    pub fn new(config: OctreeConfig) -> Self {
        Self {
            nodes: vec![Node::new(config.root_bounds, 0)],
            store: RecordStore::new(),
            stack: Vec::with_capacity(RAY_STACK_DEPTH),
            config,
        }
    }

    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }

    /// The backing record store
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.store.next_slot() - self.store.free_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of nodes in the arena
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Calculate memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Node>() * self.nodes.len() + self.store.as_bytes().len()
    }

    /// Insert an object. Bounds that do not intersect the root box are
    /// silently dropped.
    pub fn insert(&mut self, bounds: &Aabb, id: i32) {
        if !bounds.intersects(&self.nodes[0].bounds) {
            return;
        }
        let target = self.descend(0, bounds);
        let head = self.nodes[target].head;
        self.nodes[target].head = self.store.allocate(head, bounds.to_bounds(), id);
        self.maybe_split(target);
    }

    /// Remove the first record matching `id`, pruning the search with the
    /// supplied bounds. The bounds must cover the stored box for the prune
    /// to be sound; use [`Octree::remove_by_id`] when they are unknown.
    pub fn remove(&mut self, bounds: &Aabb, id: i32) {
        self.remove_at(0, Some(bounds), id);
    }

    /// Remove the first record matching `id`, searching the whole tree
    pub fn remove_by_id(&mut self, id: i32) {
        self.remove_at(0, None, id);
    }

    /// Move an object to new bounds. Equivalent to remove-then-insert; new
    /// bounds outside the root box drop the object from the tree.
    pub fn update(&mut self, bounds: &Aabb, id: i32) {
        self.remove_by_id(id);
        self.insert(bounds, id);
    }

    /// Visit the id of every object whose bounds intersect `query`
    pub fn aabb_query<F: FnMut(i32)>(&self, query: &Aabb, mut visit: F) {
        self.aabb_query_at(0, query, &mut visit);
    }

    /// Visit the id of every object whose bounds intersect the frustum
    pub fn frustum_query<F: FnMut(i32)>(&self, frustum: &Frustum, mut visit: F) {
        self.frustum_query_at(0, frustum, &mut visit);
    }

    /// Collect every object the ray passes through into `out`, resetting it
    /// first. Children are walked near-to-far; all hits along the ray are
    /// reported, with the slab distance (exit distance for rays starting
    /// inside a box).
    pub fn raycast(&mut self, ray: &Ray, out: &mut Vec<RayHit>) {
        out.clear();
        self.stack.clear();
        self.stack.push(0);

        while let Some(node_idx) = self.stack.pop() {
            let node = self.nodes[node_idx as usize];

            self.store.traverse(node.head, |record| {
                let distance = ray.cast_distance(&Aabb::from_bounds(&record.bounds));
                if distance.is_finite() {
                    out.push(RayHit { id: record.id, distance });
                }
                true
            });

            if node.first_child != NO_CHILDREN {
                // enter distances for the surviving children, near first
                let mut order = [(0.0f32, 0i32); 8];
                let mut live = 0;
                for octant in 0..8 {
                    let child = node.first_child + octant;
                    let distance = ray.cast_distance(&self.nodes[child as usize].bounds);
                    if distance.is_finite() {
                        order[live] = (distance, child);
                        live += 1;
                    }
                }
                order[..live].sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
                // LIFO stack: push far children first
                for &(_, child) in order[..live].iter().rev() {
                    self.stack.push(child);
                }
            }
        }
    }

    /// Single depth-first walk combining frustum culling with a nearest-hit
    /// ray pick.
    ///
    /// The visitor sees one envelope per surviving node and returns `false`
    /// to stop the whole walk. A node's records are only slab-tested while
    /// its box can still beat the closest hit seen so far; children are
    /// pushed unsorted because visitors want breadth, not strict
    /// near-to-far order.
    pub fn frustum_raycast<F: FnMut(&VisibleNode) -> bool>(
        &mut self,
        frustum: &Frustum,
        ray: &Ray,
        mut visit: F,
    ) {
        self.stack.clear();
        self.stack.push(0);
        let mut closest = f32::INFINITY;

        while let Some(node_idx) = self.stack.pop() {
            let node = self.nodes[node_idx as usize];
            if !frustum.intersects_aabb(&node.bounds) {
                continue;
            }
            if node.head == NIL && node.first_child == NO_CHILDREN {
                continue;
            }

            let distance = (node.bounds.center() - ray.origin).length();
            let mut mouse_hit = None;

            if node.head != NIL && ray.cast_distance(&node.bounds) < closest {
                self.store.traverse(node.head, |record| {
                    let hit = ray.cast_distance(&Aabb::from_bounds(&record.bounds));
                    if hit < closest {
                        closest = hit;
                        mouse_hit = Some(RayHit { id: record.id, distance: hit });
                    }
                    true
                });
            }

            let envelope = VisibleNode {
                bounds: node.bounds,
                level: node.level,
                distance,
                mouse_hit,
            };
            if !visit(&envelope) {
                return;
            }

            if node.first_child != NO_CHILDREN {
                for octant in 0..8 {
                    self.stack.push(node.first_child + octant);
                }
            }
        }
    }

    /// Drop every object and all child nodes. Buffers are retained.
    pub fn clear(&mut self) {
        self.store.clear();
        self.nodes.truncate(1);
        let root = &mut self.nodes[0];
        root.head = NIL;
        root.first_child = NO_CHILDREN;
    }

    /// Walk from `node_idx` to the node that should hold `bounds`: follow
    /// child links while the box classifies into a single octant.
    fn descend(&self, node_idx: usize, bounds: &Aabb) -> usize {
        let mut node_idx = node_idx;
        loop {
            let node = &self.nodes[node_idx];
            if node.first_child == NO_CHILDREN {
                return node_idx;
            }
            match classify_octant(&node.bounds, bounds) {
                Some(octant) => node_idx = node.first_child as usize + octant as usize,
                None => return node_idx,
            }
        }
    }

    /// Split `node_idx` when it is an over-full leaf above the depth limit
    fn maybe_split(&mut self, node_idx: usize) {
        let node = self.nodes[node_idx];
        if node.first_child == NO_CHILDREN
            && node.level < self.config.max_depth
            && self.store.length(node.head) >= self.config.max_objects
        {
            self.split(node_idx);
        }
    }

    /// Give `node_idx` eight children and redistribute its list: records
    /// that fit a single octant move down (possibly splitting further),
    /// straddlers stay on this node's own list.
    fn split(&mut self, node_idx: usize) {
        let parent = self.nodes[node_idx];
        log::debug!(
            "splitting node {} at level {} with {} objects",
            node_idx,
            parent.level,
            self.store.length(parent.head)
        );

        let first_child = self.nodes.len() as i32;
        for octant in 0..8u8 {
            self.nodes.push(Node::new(
                parent.bounds.child_octant(octant),
                parent.level + 1,
            ));
        }
        self.nodes[node_idx].first_child = first_child;

        // this walk re-threads links as it goes, so it keeps its own cursor
        // instead of going through the store's read-only traversal
        let mut cur = parent.head;
        self.nodes[node_idx].head = NIL;
        while cur != NIL {
            let record = self.store.get(cur);
            match classify_octant(&parent.bounds, &record.bounds) {
                Some(octant) => {
                    self.relink(first_child as usize + octant as usize, cur, &record.bounds);
                }
                None => {
                    let head = self.nodes[node_idx].head;
                    self.store.set_next(cur, head);
                    self.nodes[node_idx].head = cur;
                }
            }
            cur = record.next;
        }
    }

    /// Re-thread an existing record into the subtree at `node_idx`
    fn relink(&mut self, node_idx: usize, record_idx: i32, bounds: &Aabb) {
        let target = self.descend(node_idx, bounds);
        let head = self.nodes[target].head;
        self.store.set_next(record_idx, head);
        self.nodes[target].head = record_idx;
        self.maybe_split(target);
    }

    fn remove_at(&mut self, node_idx: usize, bounds: Option<&Aabb>, id: i32) -> bool {
        let node = self.nodes[node_idx];
        if let Some(bounds) = bounds {
            if !bounds.intersects(&node.bounds) {
                return false;
            }
        }

        let new_head = self.store.free(node.head, id);
        if new_head != node.head {
            self.nodes[node_idx].head = new_head;
            return true;
        }

        if node.first_child != NO_CHILDREN {
            for octant in 0..8 {
                if self.remove_at(node.first_child as usize + octant, bounds, id) {
                    return true;
                }
            }
        }
        false
    }

    fn aabb_query_at<F: FnMut(i32)>(&self, node_idx: usize, query: &Aabb, visit: &mut F) {
        let node = &self.nodes[node_idx];
        if !query.intersects(&node.bounds) {
            return;
        }
        if node.first_child != NO_CHILDREN {
            for octant in 0..8 {
                self.aabb_query_at(node.first_child as usize + octant, query, visit);
            }
        }
        self.store.traverse(node.head, |record| {
            if query.intersects_bounds(&record.bounds) {
                visit(record.id);
            }
            true
        });
    }

    fn frustum_query_at<F: FnMut(i32)>(&self, node_idx: usize, frustum: &Frustum, visit: &mut F) {
        let node = &self.nodes[node_idx];
        if !frustum.intersects_aabb(&node.bounds) {
            return;
        }
        if node.first_child != NO_CHILDREN {
            for octant in 0..8 {
                self.frustum_query_at(node.first_child as usize + octant, frustum, visit);
            }
        }
        self.store.traverse(node.head, |record| {
            if frustum.intersects_aabb(&Aabb::from_bounds(&record.bounds)) {
                visit(record.id);
            }
            true
        });
    }
}

impl Default for Octree {
    fn default() -> Self {
        Self::new(OctreeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Mat4;

    fn tree(half_extent: f32, max_depth: u8, max_objects: usize) -> Octree {
        Octree::new(OctreeConfig {
            root_bounds: Aabb::from_center_half_extent(Vec3::ZERO, Vec3::splat(half_extent)),
            max_depth,
            max_objects,
        })
    }

    fn cube(center: Vec3, side: f32) -> Aabb {
        Aabb::from_center_half_extent(center, Vec3::splat(side * 0.5))
    }

    fn query_ids(tree: &Octree, query: &Aabb) -> Vec<i32> {
        let mut ids = Vec::new();
        tree.aabb_query(query, |id| ids.push(id));
        ids.sort_unstable();
        ids
    }

    fn root_query(tree: &Octree) -> Vec<i32> {
        let root = tree.config().root_bounds;
        query_ids(tree, &root)
    }

    #[test]
    fn test_default_config() {
        let tree = Octree::default();
        let config = tree.config();
        assert_eq!(config.root_bounds.size(), Vec3::splat(10.0));
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.max_objects, 16);
        assert_eq!(tree.node_count(), 1);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_insert_remove_round_trip() {
        let mut tree = tree(10.0, 8, 16);
        tree.insert(&Aabb::new(Vec3::splat(-3.0), Vec3::splat(-1.0)), 1);
        tree.insert(&Aabb::new(Vec3::splat(2.0), Vec3::splat(4.0)), 2);
        assert_eq!(root_query(&tree), vec![1, 2]);

        tree.remove(&Aabb::new(Vec3::splat(-3.0), Vec3::splat(-1.0)), 1);
        assert_eq!(root_query(&tree), vec![2]);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_out_of_root_insert_dropped() {
        let mut tree = tree(10.0, 8, 16);
        tree.insert(&cube(Vec3::splat(50.0), 1.0), 1);
        assert!(root_query(&tree).is_empty());
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut tree = tree(10.0, 8, 16);
        tree.insert(&cube(Vec3::splat(2.0), 1.0), 1);
        tree.remove_by_id(42);
        tree.remove_by_id(1);
        tree.remove_by_id(1); // second removal of the same id
        assert!(root_query(&tree).is_empty());
    }

    #[test]
    fn test_remove_prunes_on_bounds() {
        let mut tree = tree(10.0, 2, 1);
        // force a split so the object lives in a child subtree
        tree.insert(&cube(Vec3::splat(3.0), 1.0), 1);
        tree.insert(&cube(Vec3::splat(-3.0), 1.0), 2);

        // bounds in the opposite octant prune the subtree holding id 1
        tree.remove(&cube(Vec3::splat(-3.0), 1.0), 1);
        assert_eq!(root_query(&tree), vec![1, 2]);

        // matching bounds find it
        tree.remove(&cube(Vec3::splat(3.0), 1.0), 1);
        assert_eq!(root_query(&tree), vec![2]);

        // the unpruned search needs no bounds at all
        tree.remove_by_id(2);
        assert!(root_query(&tree).is_empty());
    }

    #[test]
    fn test_frustum_query_filters_records() {
        let mut tree = tree(30.0, 8, 16);
        // both objects share the root list; only one is in view
        tree.insert(&cube(Vec3::new(0.0, 0.0, -5.0), 1.0), 1);
        tree.insert(&cube(Vec3::new(0.0, 0.0, 5.0), 1.0), 2);

        let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_3, 1.0, 0.1, 100.0);
        let frustum = Frustum::from_view_projection(&proj);

        let mut ids = Vec::new();
        tree.frustum_query(&frustum, |id| ids.push(id));
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_split_trigger_moves_cluster_down() {
        let mut tree = tree(10.0, 3, 2);
        tree.insert(&cube(Vec3::splat(1.0), 1.0), 1);
        tree.insert(&cube(Vec3::splat(1.5), 1.0), 2);
        tree.insert(&cube(Vec3::splat(1.2), 1.0), 3);

        assert_eq!(root_query(&tree), vec![1, 2, 3]);
        // all three classify into the same octant, so the root list drains
        assert!(tree.nodes[0].is_empty());
        assert!(!tree.nodes[0].is_leaf());
        // one descendant holds the whole cluster
        let full = tree
            .nodes
            .iter()
            .filter(|n| !n.is_empty())
            .collect::<Vec<_>>();
        assert_eq!(full.len(), 1);
        assert_eq!(tree.store.length(full[0].head), 3);
    }

    #[test]
    fn test_loose_straddler_stays_at_root() {
        let mut tree = tree(10.0, 2, 1);
        tree.insert(&Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0)), 1);
        tree.insert(&cube(Vec3::splat(3.0), 1.0), 2);

        assert!(!tree.nodes[0].is_leaf());
        // the straddler sits on the root's own list despite the splits
        assert_eq!(tree.store.length(tree.nodes[0].head), 1);
        assert_eq!(tree.store.get(tree.nodes[0].head).id, 1);
        assert_eq!(root_query(&tree), vec![1, 2]);
    }

    #[test]
    fn test_no_duplicate_emission_across_splits() {
        let mut tree = tree(10.0, 4, 2);
        // deterministic scatter, many straddlers and clusters
        let mut seed = 0x2545f4914f6cdd1du64;
        let mut next = || {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (((seed >> 32) as u32) as f32 / u32::MAX as f32 - 0.5) * 16.0
        };
        for id in 0..200 {
            let center = Vec3::new(next(), next(), next());
            tree.insert(&cube(center, 1.5), id);
        }

        let ids = root_query(&tree);
        assert_eq!(ids.len(), 200);
        for (expected, id) in ids.iter().enumerate() {
            assert_eq!(*id, expected as i32, "each id must appear exactly once");
        }
    }

    #[test]
    fn test_update_matches_remove_then_insert() {
        let old_bounds = cube(Vec3::splat(-4.0), 1.0);
        let new_bounds = cube(Vec3::splat(4.0), 1.0);

        let mut updated = tree(10.0, 8, 16);
        updated.insert(&old_bounds, 7);
        updated.update(&new_bounds, 7);

        let mut reinserted = tree(10.0, 8, 16);
        reinserted.insert(&old_bounds, 7);
        reinserted.remove(&old_bounds, 7);
        reinserted.insert(&new_bounds, 7);

        let probe = cube(Vec3::splat(4.0), 2.0);
        assert_eq!(query_ids(&updated, &probe), query_ids(&reinserted, &probe));
        assert_eq!(query_ids(&updated, &old_bounds), query_ids(&reinserted, &old_bounds));
        assert_eq!(root_query(&updated), root_query(&reinserted));
    }

    #[test]
    fn test_update_out_of_root_drops_object() {
        let mut tree = tree(10.0, 8, 16);
        tree.insert(&cube(Vec3::splat(2.0), 1.0), 1);
        tree.update(&cube(Vec3::splat(100.0), 1.0), 1);
        assert!(root_query(&tree).is_empty());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut tree = tree(10.0, 3, 2);
        for id in 0..20 {
            tree.insert(&cube(Vec3::splat(id as f32 * 0.4 - 4.0), 0.5), id);
        }
        tree.remove_by_id(5);
        assert!(tree.node_count() > 1);

        tree.clear();
        assert_eq!(tree.store().next_slot(), 0);
        assert_eq!(tree.store().free_len(), 0);
        assert_eq!(tree.node_count(), 1);
        assert!(root_query(&tree).is_empty());
    }

    #[test]
    fn test_raycast_near_hit_ordering() {
        let mut tree = tree(10.0, 8, 16);
        tree.insert(&cube(Vec3::splat(2.0), 1.0), 1);
        tree.insert(&cube(Vec3::splat(5.0), 1.0), 2);

        let ray = Ray::new(Vec3::ZERO, Vec3::splat(1.0).normalize());
        let mut out = Vec::new();
        tree.raycast(&ray, &mut out);

        assert_eq!(out.len(), 2);
        let hit1 = out.iter().find(|h| h.id == 1).unwrap();
        let hit2 = out.iter().find(|h| h.id == 2).unwrap();
        assert!(hit1.distance < hit2.distance);
    }

    #[test]
    fn test_raycast_miss_is_empty() {
        let mut tree = tree(10.0, 8, 16);
        tree.insert(&cube(Vec3::splat(2.0), 1.0), 1);

        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::X);
        let mut out = vec![RayHit { id: 9, distance: 0.0 }];
        tree.raycast(&ray, &mut out);
        assert!(out.is_empty(), "out is reset before the walk");
    }

    #[test]
    fn test_raycast_inside_box_reports_exit() {
        let mut tree = tree(10.0, 8, 16);
        tree.insert(&cube(Vec3::splat(2.0), 1.0), 1);

        // origin inside the box, pointing +x: exit at x = 2.5
        let ray = Ray::new(Vec3::splat(2.0), Vec3::X);
        let mut out = Vec::new();
        tree.raycast(&ray, &mut out);

        assert_eq!(out.len(), 1);
        assert!((out[0].distance - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_raycast_survives_deep_tree() {
        let mut tree = tree(10.0, 8, 1);
        for id in 0..40 {
            let t = id as f32 / 40.0;
            tree.insert(&cube(Vec3::splat(t * 8.0 - 4.0), 0.2), id);
        }
        let ray = Ray::new(Vec3::splat(-9.0), Vec3::splat(1.0).normalize());
        let mut out = Vec::new();
        tree.raycast(&ray, &mut out);
        assert_eq!(out.len(), 40, "diagonal ray crosses every cube");
    }

    #[test]
    fn test_frustum_query_contains_all() {
        let mut tree = tree(10.0, 8, 4);
        for id in 0..10 {
            tree.insert(&cube(Vec3::splat(id as f32 - 5.0), 0.5), id);
        }

        let vp = Mat4::orthographic_rh(-50.0, 50.0, -50.0, 50.0, -50.0, 50.0);
        let frustum = Frustum::from_view_projection(&vp);
        let mut ids = Vec::new();
        tree.frustum_query(&frustum, |id| ids.push(id));
        ids.sort_unstable();
        assert_eq!(ids, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_frustum_query_disjoint_emits_nothing() {
        let mut tree = tree(30.0, 8, 16);
        tree.insert(&cube(Vec3::splat(15.0), 1.0), 1);

        // camera at origin looking toward +z with a short far plane
        let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_3, 1.0, 0.1, 5.0);
        let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::Z, Vec3::Y);
        let frustum = Frustum::from_view_projection(&(proj * view));

        let mut count = 0;
        tree.frustum_query(&frustum, |_| count += 1);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_frustum_raycast_combined_visit() {
        let mut tree = tree(30.0, 8, 16);
        // in front of the camera (which looks down -z)
        tree.insert(&cube(Vec3::new(0.0, 0.0, -5.0), 1.0), 1);
        // far behind the camera
        tree.insert(&cube(Vec3::new(0.0, 0.0, 20.0), 1.0), 2);

        let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_3, 1.0, 0.1, 100.0);
        let frustum = Frustum::from_view_projection(&proj);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let mut best: Option<RayHit> = None;
        tree.frustum_raycast(&frustum, &ray, |node| {
            if let Some(hit) = node.mouse_hit {
                best = Some(hit);
            }
            true
        });

        let hit = best.expect("visitor must observe the pick");
        assert_eq!(hit.id, 1);
        assert!((hit.distance - 4.5).abs() < 1e-5);
    }

    #[test]
    fn test_frustum_raycast_visitor_stop() {
        let mut tree = tree(10.0, 3, 1);
        for id in 0..12 {
            tree.insert(&cube(Vec3::splat(id as f32 * 0.5 - 3.0), 0.4), id);
        }

        let vp = Mat4::orthographic_rh(-50.0, 50.0, -50.0, 50.0, -50.0, 50.0);
        let frustum = Frustum::from_view_projection(&vp);
        let ray = Ray::new(Vec3::splat(-9.0), Vec3::splat(1.0).normalize());

        let mut visits = 0;
        tree.frustum_raycast(&frustum, &ray, |_| {
            visits += 1;
            false
        });
        assert_eq!(visits, 1);
    }

    #[test]
    fn test_frustum_raycast_skips_empty_leaves() {
        let mut tree = tree(10.0, 2, 1);
        // two inserts force a split, leaving six empty sibling leaves
        tree.insert(&cube(Vec3::splat(3.0), 1.0), 1);
        tree.insert(&cube(Vec3::splat(-3.0), 1.0), 2);

        let vp = Mat4::orthographic_rh(-50.0, 50.0, -50.0, 50.0, -50.0, 50.0);
        let frustum = Frustum::from_view_projection(&vp);
        let ray = Ray::new(Vec3::splat(-9.0), Vec3::splat(1.0).normalize());

        let mut visits = 0;
        tree.frustum_raycast(&frustum, &ray, |_| {
            visits += 1;
            true
        });
        // root, the two split children, and the two occupied grandchildren;
        // the 20 empty leaves are skipped
        assert_eq!(visits, 5);
        assert_eq!(tree.node_count(), 25);
    }

    #[test]
    fn test_memory_usage_grows_with_content() {
        let mut tree = tree(10.0, 8, 16);
        let before = tree.memory_usage();
        tree.insert(&cube(Vec3::splat(1.0), 1.0), 1);
        assert_eq!(tree.memory_usage(), before + 32);
    }
}
