//! Abstract spatial query interface for broad-phase collision detection
//!
//! Based on Game Engine Architecture 3rd Edition, Section 13.3.2:
//! "Spatial partitioning schemes... allow us to quickly cull out pairs of
//! objects that cannot possibly be colliding."
//!
//! This abstraction allows swapping different spatial partitioning schemes
//! (octree, grid, BVH, etc.) without changing the collision system.

use crate::foundation::bounds::AABB;
use crate::foundation::math::Vec3;
use crate::spatial::object::OctreeObject;
use crate::spatial::octree::{MoveTarget, Octree};

/// Abstract interface for spatial partitioning used in broad-phase collision detection
pub trait SpatialQuery<O: OctreeObject> {
    /// Insert an object, `false` if it lies outside the structure's volume
    fn insert(&mut self, object: O) -> bool;

    /// Remove an object from the spatial structure
    fn remove(&mut self, object: &O) -> bool;

    /// Update an object's bounds in the spatial structure
    fn update(&mut self, object: &mut O, bounds: AABB) -> bool;

    /// Query objects near a specific object (for collision detection)
    /// Returns objects whose bounds overlap it, excluding the object itself
    fn query_nearby(&self, object: &O) -> Vec<&O>;

    /// Query objects within a sphere
    fn query_sphere(&self, center: Vec3, radius: f32) -> Vec<&O>;

    /// Query objects within an AABB
    fn query_aabb(&self, aabb: &AABB) -> Vec<&O>;

    /// Look up a stored object by identity
    fn get(&self, id: &O::Id) -> Option<&O>;

    /// Clear all objects from the spatial structure
    fn clear(&mut self);

    /// Get the number of objects in the structure
    fn object_count(&self) -> usize;
}

impl<O: OctreeObject> SpatialQuery<O> for Octree<O> {
    fn insert(&mut self, object: O) -> bool {
        Octree::insert(self, object)
    }

    fn remove(&mut self, object: &O) -> bool {
        Octree::remove(self, object)
    }

    fn update(&mut self, object: &mut O, bounds: AABB) -> bool {
        // Octree requires remove + re-insert for updates
        self.try_move_to(object, MoveTarget::MinMax(bounds)).is_ok()
    }

    fn query_nearby(&self, object: &O) -> Vec<&O> {
        let id = object.id();
        self.get_colliding(&object.bounds())
            .into_iter()
            .filter(|candidate| candidate.id() != id)
            .collect()
    }

    fn query_sphere(&self, center: Vec3, radius: f32) -> Vec<&O> {
        self.query_radius(center, radius)
    }

    fn query_aabb(&self, aabb: &AABB) -> Vec<&O> {
        self.get_colliding(aabb)
    }

    fn get(&self, id: &O::Id) -> Option<&O> {
        self.find(id)
    }

    fn clear(&mut self) {
        Octree::clear(self);
    }

    fn object_count(&self) -> usize {
        Octree::object_count(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OctreeConfig;
    use crate::spatial::object::{Object, ObjectId};

    fn sphere_body(id: u64, position: Vec3, radius: f32) -> Object<()> {
        Object::new(
            ObjectId(id),
            AABB::from_center_extents(position, Vec3::new(radius, radius, radius)),
            (),
        )
    }

    fn spatial() -> Box<dyn SpatialQuery<Object<()>>> {
        let bounds = AABB::new(
            Vec3::new(-50.0, -50.0, -50.0),
            Vec3::new(50.0, 50.0, 50.0),
        );
        let config = OctreeConfig::with_capacity(4);
        Box::new(Octree::with_config(bounds, config).unwrap())
    }

    #[test]
    fn test_spatial_query_insert_remove() {
        let mut spatial = spatial();
        let object = sphere_body(1, Vec3::zeros(), 5.0);

        assert!(spatial.insert(object.clone()));
        assert_eq!(spatial.object_count(), 1);

        assert!(spatial.remove(&object));
        assert_eq!(spatial.object_count(), 0);
    }

    #[test]
    fn test_spatial_query_nearby_excludes_self() {
        let mut spatial = spatial();
        let a = sphere_body(1, Vec3::zeros(), 2.0);
        let b = sphere_body(2, Vec3::new(3.0, 0.0, 0.0), 2.0);
        let c = sphere_body(3, Vec3::new(30.0, 0.0, 0.0), 2.0);
        for object in [&a, &b, &c] {
            spatial.insert(object.clone());
        }

        let nearby: Vec<ObjectId> = spatial.query_nearby(&a).iter().map(|o| o.id).collect();
        assert_eq!(nearby, vec![ObjectId(2)]);
        assert!(spatial.query_nearby(&c).is_empty());
    }

    #[test]
    fn test_spatial_query_update() {
        let mut spatial = spatial();
        let mut object = sphere_body(1, Vec3::zeros(), 1.0);
        spatial.insert(object.clone());

        let target = AABB::from_center_extents(Vec3::new(20.0, 20.0, 20.0), Vec3::new(1.0, 1.0, 1.0));
        assert!(spatial.update(&mut object, target));
        assert_eq!(spatial.get(&ObjectId(1)).unwrap().bounds, target);
        assert_eq!(spatial.query_sphere(Vec3::new(20.0, 20.0, 20.0), 0.5).len(), 1);
        assert!(spatial.query_aabb(&AABB::point(Vec3::zeros())).is_empty());

        spatial.clear();
        assert_eq!(spatial.object_count(), 0);
    }
}
