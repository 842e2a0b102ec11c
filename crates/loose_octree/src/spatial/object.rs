//! Objects stored in the octree
//!
//! An object is anything with bounds and a stable identity. Removal and
//! moves match on identity only, so two objects with identical bounds and
//! payload are still distinct entries.

use std::fmt::Debug;

use crate::foundation::bounds::AABB;

/// Contract for values stored in an [`Octree`](crate::spatial::Octree)
pub trait OctreeObject {
    /// Identity used to find the object again on remove and move
    type Id: PartialEq + Debug;

    /// Stable identity of this object
    fn id(&self) -> Self::Id;

    /// Current world-space bounds
    fn bounds(&self) -> AABB;

    /// Replace the bounds, used when the object is moved
    fn set_bounds(&mut self, bounds: AABB);
}

/// Object identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl ObjectId {
    /// Get the raw ID
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// General purpose object: bounds plus an application payload
#[derive(Debug, Clone, PartialEq)]
pub struct Object<T> {
    /// Identity of the object
    pub id: ObjectId,

    /// World-space bounds
    pub bounds: AABB,

    /// Application data carried alongside the bounds
    pub data: T,
}

impl<T> Object<T> {
    /// Create a new object
    pub fn new(id: ObjectId, bounds: AABB, data: T) -> Self {
        Self { id, bounds, data }
    }
}

impl<T> OctreeObject for Object<T> {
    type Id = ObjectId;

    fn id(&self) -> ObjectId {
        self.id
    }

    fn bounds(&self) -> AABB {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: AABB) {
        self.bounds = bounds;
    }
}
