//! Octree spatial partitioning structure
//!
//! Owns the root node for a fixed world region and the configuration that
//! every node consults. All operations enter at the root; the boolean
//! methods are the everyday API and the `try_*` variants report why an
//! operation was refused.

use log::{debug, warn};
use thiserror::Error;

use crate::config::{ConfigError, OctreeConfig};
use crate::foundation::bounds::AABB;
use crate::foundation::math::Vec3;
use crate::spatial::node::{NodeDump, OctreeNode};
use crate::spatial::object::OctreeObject;

/// Octree errors
#[derive(Error, Debug)]
pub enum OctreeError {
    /// Object bounds do not fit inside the tree's world region
    #[error("Bounds {bounds} do not fit inside region {region}")]
    OutOfBounds {
        /// Offending bounds
        bounds: AABB,
        /// World region of the tree
        region: AABB,
    },

    /// No object with the given identity is stored in the tree
    #[error("Object not found in octree")]
    NotFound,

    /// Move called with a bounds slice that is neither 3 nor 6 values long
    #[error("Invalid bounds argument: expected 3 or 6 values, got {0}")]
    InvalidArgument(usize),

    /// Rejected configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Destination of a move
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveTarget {
    /// New center; the object becomes a cube whose half-size is its
    /// current X extent
    Center(Vec3),
    /// Explicit new bounds
    MinMax(AABB),
}

impl MoveTarget {
    /// Bounds after moving an object currently occupying `current`
    pub fn resolve(&self, current: &AABB) -> AABB {
        match self {
            Self::Center(center) => AABB::from_center_size(*center, current.extents().x * 2.0),
            Self::MinMax(bounds) => *bounds,
        }
    }
}

impl TryFrom<&[f32]> for MoveTarget {
    type Error = OctreeError;

    /// Accepts `[x, y, z]` or `[min_x, min_y, min_z, max_x, max_y, max_z]`
    fn try_from(values: &[f32]) -> Result<Self, Self::Error> {
        match values {
            [x, y, z] => Ok(Self::Center(Vec3::new(*x, *y, *z))),
            _ => <&[f32; 6]>::try_from(values)
                .map(|min_max| Self::MinMax(AABB::from_min_max_slice(min_max)))
                .map_err(|_| OctreeError::InvalidArgument(values.len())),
        }
    }
}

/// Loose octree over objects implementing [`OctreeObject`]
#[derive(Debug, Clone)]
pub struct Octree<O> {
    /// Root node containing the entire world space
    root: OctreeNode<O>,

    /// Configuration
    config: OctreeConfig,
}

impl<O> Octree<O> {
    /// Create a new octree with given world bounds and the default capacity
    pub fn new(world_bounds: AABB) -> Self {
        Self {
            root: OctreeNode::new(world_bounds),
            config: OctreeConfig::default(),
        }
    }

    /// Create a new octree with an explicit configuration
    pub fn with_config(world_bounds: AABB, config: OctreeConfig) -> Result<Self, OctreeError> {
        config.validate()?;

        Ok(Self {
            root: OctreeNode::new(world_bounds),
            config,
        })
    }

    /// World region covered by the tree
    pub fn region(&self) -> &AABB {
        self.root.region()
    }

    /// Active configuration
    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }

    /// Root node (for visualization)
    pub fn root(&self) -> &OctreeNode<O> {
        &self.root
    }

    /// Height of the tree, 1 for an unsplit root
    pub fn height(&self) -> usize {
        self.root.height()
    }

    /// Total number of nodes
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Total number of stored objects
    pub fn object_count(&self) -> usize {
        self.root.object_count()
    }

    /// Load factor: objects / (nodes * capacity)
    #[allow(clippy::cast_precision_loss)]
    pub fn usage(&self) -> f64 {
        self.object_count() as f64 / (self.node_count() * self.config.capacity) as f64
    }

    /// Every stored object, in traversal order
    pub fn all_objects(&self) -> Vec<&O> {
        let mut objects = Vec::new();
        self.root.all_objects(&mut objects);
        objects
    }

    /// Every node in pre-order (for visualization)
    pub fn nodes(&self) -> Vec<&OctreeNode<O>> {
        let mut nodes = Vec::new();
        self.root.nodes(&mut nodes);
        nodes
    }

    /// Get all leaf nodes (for visualization)
    pub fn leaves(&self) -> Vec<&OctreeNode<O>> {
        let mut leaves = Vec::new();
        self.root.leaves(&mut leaves);
        leaves
    }

    /// Get all nodes at a specific depth, root is depth 0 (for visualization)
    pub fn nodes_at_depth(&self, depth: usize) -> Vec<&OctreeNode<O>> {
        let mut nodes = Vec::new();
        self.root.nodes_at_depth(depth, &mut nodes);
        nodes
    }

    /// Textual dump of the whole tree
    pub fn dump(&self, verbose: bool) -> NodeDump<'_, O> {
        self.root.dump(verbose)
    }

    /// Clear the octree, keeping its region and configuration
    pub fn clear(&mut self) {
        self.root = OctreeNode::new(*self.root.region());
    }
}

impl<O: OctreeObject> Octree<O> {
    /// Insert an object into the octree
    ///
    /// Returns `false` if the object lies outside the world region; the
    /// object is dropped in that case.
    pub fn insert(&mut self, object: O) -> bool {
        self.try_insert(object).is_ok()
    }

    /// Insert an object, reporting why it was refused
    pub fn try_insert(&mut self, object: O) -> Result<(), OctreeError> {
        self.root.insert(object, &self.config).map_err(|rejected| {
            warn!(
                "Object {:?} with bounds {} lies outside octree region {}",
                rejected.id(),
                rejected.bounds(),
                self.root.region()
            );
            OctreeError::OutOfBounds {
                bounds: rejected.bounds(),
                region: *self.root.region(),
            }
        })
    }

    /// Remove the object with the same identity
    pub fn remove(&mut self, object: &O) -> bool {
        self.try_remove(object).is_ok()
    }

    /// Remove the object with the same identity and hand it back
    pub fn take(&mut self, object: &O) -> Option<O> {
        self.root.remove(object, &self.config)
    }

    /// Remove an object, reporting `NotFound` if it is not stored
    pub fn try_remove(&mut self, object: &O) -> Result<O, OctreeError> {
        self.take(object).ok_or(OctreeError::NotFound)
    }

    /// Move an object to new bounds given as 3 (center) or 6 (min/max) values
    ///
    /// On success the caller's object carries the new bounds as well.
    pub fn move_object(&mut self, object: &mut O, new_bounds: &[f32]) -> bool {
        match self.try_move(object, new_bounds) {
            Ok(()) => true,
            Err(err) => {
                debug!("Move of {:?} refused: {}", object.id(), err);
                false
            }
        }
    }

    /// Move an object, reporting why the move was refused
    pub fn try_move(&mut self, object: &mut O, new_bounds: &[f32]) -> Result<(), OctreeError> {
        let target = MoveTarget::try_from(new_bounds)?;
        self.try_move_to(object, target)
    }

    /// Move an object to a typed target
    ///
    /// The destination is checked against the world region before the
    /// object is taken out, so a refused move leaves the tree and `object`
    /// untouched.
    pub fn try_move_to(&mut self, object: &mut O, target: MoveTarget) -> Result<(), OctreeError> {
        let new_bounds = target.resolve(&object.bounds());
        let region = *self.root.region();
        if !new_bounds.fits_in(&region) {
            return Err(OctreeError::OutOfBounds { bounds: new_bounds, region });
        }

        let mut stored = self.take(object).ok_or(OctreeError::NotFound)?;
        stored.set_bounds(new_bounds);
        object.set_bounds(new_bounds);

        self.root
            .insert(stored, &self.config)
            .map_err(|rejected| OctreeError::OutOfBounds { bounds: rejected.bounds(), region })
    }

    /// Objects whose bounds intersect `bounds`
    pub fn get_colliding(&self, bounds: &AABB) -> Vec<&O> {
        let mut results = Vec::new();
        self.root.get_colliding(bounds, &mut results);
        results
    }

    /// Objects whose bounds intersect a sphere
    pub fn query_radius(&self, center: Vec3, radius: f32) -> Vec<&O> {
        let mut results = Vec::new();
        self.root.query_radius(center, radius, &mut results);
        results
    }

    /// Find an object by identity
    pub fn find(&self, id: &O::Id) -> Option<&O> {
        self.root.find(id)
    }
}
