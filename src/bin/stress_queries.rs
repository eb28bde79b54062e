//! Populate an octree with a deterministic scatter and exercise every query
//!
//! Usage: cargo run --release --bin stress_queries

use glam::Vec3;

use loctree::core::types::Mat4;
use loctree::math::{Aabb, Frustum, Ray};
use loctree::tree::{Octree, OctreeConfig};

const OBJECT_COUNT: usize = 10_000;

fn main() {
    loctree::core::logging::init();

    let mut tree = Octree::new(OctreeConfig {
        root_bounds: Aabb::from_center_half_extent(Vec3::ZERO, Vec3::splat(100.0)),
        ..OctreeConfig::default()
    });

    for i in 0..OBJECT_COUNT {
        let t = i as f32 * 0.37;
        let center = Vec3::new(
            t.sin() * 80.0,
            (t * 0.7).cos() * 80.0,
            (t * 1.3).sin() * 80.0,
        );
        tree.insert(&Aabb::from_center_half_extent(center, Vec3::splat(0.5)), i as i32);
    }
    log::info!(
        "built tree: {} objects, {} nodes, {} bytes",
        tree.len(),
        tree.node_count(),
        tree.memory_usage()
    );

    let probe = Aabb::from_center_half_extent(Vec3::splat(20.0), Vec3::splat(30.0));
    let mut overlapping = 0u32;
    tree.aabb_query(&probe, |_| overlapping += 1);
    println!("aabb query: {} objects overlap the probe region", overlapping);

    let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_3, 1.0, 0.1, 300.0);
    let frustum = Frustum::from_view_projection(&proj);
    let mut visible = 0u32;
    tree.frustum_query(&frustum, |_| visible += 1);
    println!("frustum query: {} objects visible from the origin", visible);

    let ray = Ray::new(Vec3::splat(-99.0), Vec3::splat(1.0).normalize());
    let mut hits = Vec::new();
    tree.raycast(&ray, &mut hits);
    println!("raycast: {} hits along the main diagonal", hits.len());

    let pick_ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
    let mut visited = 0u32;
    let mut picked = None;
    tree.frustum_raycast(&frustum, &pick_ray, |node| {
        visited += 1;
        if let Some(hit) = node.mouse_hit {
            picked = Some(hit);
        }
        true
    });
    match picked {
        Some(hit) => println!(
            "combined walk: visited {} nodes, picked id {} at distance {:.3}",
            visited, hit.id, hit.distance
        ),
        None => println!("combined walk: visited {} nodes, nothing under the cursor", visited),
    }
}
