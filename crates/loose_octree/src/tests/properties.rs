//! Randomized checks of query completeness and tree invariants
//!
//! Every query result is compared against a brute-force scan over the
//! objects the test believes are stored.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::scenarios::assert_contained;
use crate::prelude::*;

const WORLD_HALF_SIZE: f32 = 50.0;

fn world() -> AABB {
    AABB::new(
        Vec3::new(-WORLD_HALF_SIZE, -WORLD_HALF_SIZE, -WORLD_HALF_SIZE),
        Vec3::new(WORLD_HALF_SIZE, WORLD_HALF_SIZE, WORLD_HALF_SIZE),
    )
}

fn random_box(rng: &mut StdRng, max_half: f32) -> AABB {
    let half = Vec3::new(
        rng.gen_range(0.0..max_half),
        rng.gen_range(0.0..max_half),
        rng.gen_range(0.0..max_half),
    );
    let limit = WORLD_HALF_SIZE - max_half;
    let center = Vec3::new(
        rng.gen_range(-limit..limit),
        rng.gen_range(-limit..limit),
        rng.gen_range(-limit..limit),
    );
    AABB::from_center_extents(center, half)
}

fn assert_query_matches(octree: &Octree<Object<()>>, live: &[Object<()>], query: &AABB) {
    let mut found: Vec<u64> = octree.get_colliding(query).iter().map(|o| o.id.0).collect();
    found.sort_unstable();

    let unique = found.len();
    found.dedup();
    assert_eq!(unique, found.len(), "duplicate object in query result");

    let mut expected: Vec<u64> = live
        .iter()
        .filter(|o| o.bounds.intersects(query))
        .map(|o| o.id.0)
        .collect();
    expected.sort_unstable();

    assert_eq!(found, expected, "query {query}");
}

fn populate(rng: &mut StdRng, octree: &mut Octree<Object<()>>, count: u64) -> Vec<Object<()>> {
    (0..count)
        .map(|id| {
            let object = Object::new(ObjectId(id), random_box(rng, 3.0), ());
            assert!(octree.insert(object.clone()));
            object
        })
        .collect()
}

#[test]
fn test_random_queries_are_complete_and_unique() {
    let mut rng = StdRng::seed_from_u64(0x0c7_7ee);
    let mut octree = Octree::new(world());
    let live = populate(&mut rng, &mut octree, 300);

    assert_eq!(octree.object_count(), live.len());
    assert!(octree.height() > 2);
    assert_contained(octree.root());

    for _ in 0..100 {
        let query = random_box(&mut rng, 20.0);
        assert_query_matches(&octree, &live, &query);
    }
    assert_query_matches(&octree, &live, &world());
}

#[test]
fn test_random_removals_keep_invariants() {
    let mut rng = StdRng::seed_from_u64(42);
    let config = OctreeConfig::with_capacity(3);
    let mut octree = Octree::with_config(world(), config).unwrap();
    let mut live = populate(&mut rng, &mut octree, 200);

    while live.len() > 20 {
        let index = rng.gen_range(0..live.len());
        let object = live.swap_remove(index);
        assert!(octree.remove(&object));
        assert!(!octree.remove(&object));

        if live.len() % 30 == 0 {
            assert_contained(octree.root());
            let query = random_box(&mut rng, 15.0);
            assert_query_matches(&octree, &live, &query);
        }
    }

    assert_eq!(octree.object_count(), live.len());
    assert_query_matches(&octree, &live, &world());
}

#[test]
fn test_random_moves_track_objects() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut octree = Octree::new(world());
    let mut live = populate(&mut rng, &mut octree, 150);

    for _ in 0..400 {
        let index = rng.gen_range(0..live.len());
        let target = random_box(&mut rng, 3.0);
        let values = [
            target.min.x, target.min.y, target.min.z,
            target.max.x, target.max.y, target.max.z,
        ];
        assert!(octree.move_object(&mut live[index], &values));
        assert_eq!(live[index].bounds, target);
    }

    assert_eq!(octree.object_count(), live.len());
    assert_contained(octree.root());
    for _ in 0..50 {
        let query = random_box(&mut rng, 20.0);
        assert_query_matches(&octree, &live, &query);
    }
}

#[test]
fn test_usage_stays_within_unit_interval_for_spread_objects() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut octree = Octree::new(world());
    populate(&mut rng, &mut octree, 100);

    let usage = octree.usage();
    assert!(usage > 0.0);
    assert!(usage <= 1.0, "usage {usage}");
}
