//! # Loose Octree
//!
//! A loose octree for answering "which objects overlap this region?" and
//! for keeping bounded objects indexed while they are inserted, removed
//! and moved.
//!
//! ## Features
//!
//! - **Loose placement**: objects straddling octant boundaries stay at the
//!   parent instead of being duplicated
//! - **Split and merge**: leaves split past a configurable capacity and
//!   collapse again once removals bring the count back down
//! - **Bounds-aware queries**: whole subtrees are returned or pruned by
//!   region tests before any per-object test
//! - **Broad-phase trait**: [`spatial::SpatialQuery`] lets collision code
//!   swap partitioning schemes
//!
//! ## Quick Start
//!
//! ```rust
//! use loose_octree::prelude::*;
//!
//! let world = AABB::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 10.0, 10.0));
//! let mut octree = Octree::new(world);
//!
//! let mut ship = Object::new(ObjectId(1), AABB::point(Vec3::new(1.0, 1.0, 1.0)), "ship");
//! assert!(octree.insert(ship.clone()));
//!
//! assert!(octree.move_object(&mut ship, &[6.0, 6.0, 6.0]));
//!
//! let query = AABB::new(Vec3::new(5.0, 5.0, 5.0), Vec3::new(10.0, 10.0, 10.0));
//! assert_eq!(octree.get_colliding(&query).len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod spatial;

#[cfg(test)]
mod tests;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, OctreeConfig},
        foundation::{
            bounds::AABB,
            math::Vec3,
        },
        spatial::{MoveTarget, Object, ObjectId, Octree, OctreeError, OctreeObject, SpatialQuery},
    };
}
