//! Spatial partitioning data structures
//!
//! Provides a loose octree for broad-phase collision detection and
//! proximity queries over bounded objects in 3D space.

mod node;
mod object;
mod octree;
mod spatial_query;

pub use node::{NodeDump, OctreeNode, Subdivision};
pub use object::{Object, ObjectId, OctreeObject};
pub use octree::{MoveTarget, Octree, OctreeError};
pub use spatial_query::SpatialQuery;
