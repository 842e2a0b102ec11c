//! Octree node
//!
//! A node governs a fixed region and stores the objects that fit inside it.
//! Once a leaf overflows its capacity it splits into 8 octant children and
//! pushes down every object that fits a single child. Objects straddling an
//! octant boundary stay at the parent, which is what makes the tree "loose".

use std::fmt;

use log::{debug, trace};

use crate::config::OctreeConfig;
use crate::foundation::bounds::AABB;
use crate::foundation::math::Vec3;
use crate::spatial::object::OctreeObject;

/// Whether a node has been subdivided
#[derive(Debug, Clone)]
pub enum Subdivision<O> {
    /// No children
    Leaf,
    /// Exactly 8 children, indexed by octant (see [`AABB::octants`])
    Split(Box<[OctreeNode<O>; 8]>),
}

/// Single node in the octree hierarchy
#[derive(Debug, Clone)]
pub struct OctreeNode<O> {
    /// World-space region governed by this node, fixed at construction
    region: AABB,

    /// Objects stored directly at this node
    objects: Vec<O>,

    /// Child nodes (8 octants) or leaf marker
    children: Subdivision<O>,
}

impl<O> OctreeNode<O> {
    /// Create a new leaf node
    pub fn new(region: AABB) -> Self {
        Self {
            region,
            objects: Vec::new(),
            children: Subdivision::Leaf,
        }
    }

    /// Region governed by this node
    pub fn region(&self) -> &AABB {
        &self.region
    }

    /// Objects stored directly at this node
    pub fn objects(&self) -> &[O] {
        &self.objects
    }

    /// Child nodes, `None` for a leaf
    pub fn children(&self) -> Option<&[OctreeNode<O>; 8]> {
        match &self.children {
            Subdivision::Leaf => None,
            Subdivision::Split(children) => Some(children),
        }
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        matches!(self.children, Subdivision::Leaf)
    }

    /// Height of the subtree, a lone leaf has height 1
    pub fn height(&self) -> usize {
        self.children()
            .map_or(0, |children| children.iter().map(OctreeNode::height).max().unwrap_or(0))
            + 1
    }

    /// Number of nodes in the subtree, including this one
    pub fn node_count(&self) -> usize {
        1 + self.children()
            .map_or(0, |children| children.iter().map(OctreeNode::node_count).sum())
    }

    /// Number of objects in the subtree
    pub fn object_count(&self) -> usize {
        self.objects.len()
            + self.children()
                .map_or(0, |children| children.iter().map(OctreeNode::object_count).sum())
    }

    /// Collect every object in the subtree
    pub fn all_objects<'a>(&'a self, results: &mut Vec<&'a O>) {
        results.extend(self.objects.iter());

        if let Some(children) = self.children() {
            for child in children {
                child.all_objects(results);
            }
        }
    }

    /// Collect every node in the subtree in pre-order (for visualization)
    pub fn nodes<'a>(&'a self, nodes: &mut Vec<&'a OctreeNode<O>>) {
        nodes.push(self);

        if let Some(children) = self.children() {
            for child in children {
                child.nodes(nodes);
            }
        }
    }

    /// Get all leaf nodes (for visualization)
    pub fn leaves<'a>(&'a self, leaves: &mut Vec<&'a OctreeNode<O>>) {
        match self.children() {
            None => leaves.push(self),
            Some(children) => {
                for child in children {
                    child.leaves(leaves);
                }
            }
        }
    }

    /// Get all nodes `depth` levels below this one (for visualization)
    pub fn nodes_at_depth<'a>(&'a self, depth: usize, nodes: &mut Vec<&'a OctreeNode<O>>) {
        if depth == 0 {
            nodes.push(self);
        } else if let Some(children) = self.children() {
            for child in children {
                child.nodes_at_depth(depth - 1, nodes);
            }
        }
    }

    /// Textual dump of the subtree
    ///
    /// Verbose output lists every object and recurses into children;
    /// otherwise only counts are printed.
    pub fn dump(&self, verbose: bool) -> NodeDump<'_, O> {
        NodeDump { node: self, verbose }
    }
}

impl<O: OctreeObject> OctreeNode<O> {
    /// Insert an object into this subtree
    ///
    /// Hands the object back if its bounds do not fit this node's region.
    /// Once the fit check passes the insert always succeeds: an object that
    /// fits no single child is kept at this node regardless of capacity.
    /// A leaf whose region can no longer be halved never splits, so it
    /// absorbs any number of coincident objects.
    pub fn insert(&mut self, object: O, config: &OctreeConfig) -> Result<(), O> {
        if !object.bounds().fits_in(&self.region) {
            return Err(object);
        }

        if self.is_leaf() {
            if self.objects.len() < config.capacity || !self.region.is_divisible() {
                self.objects.push(object);
                return Ok(());
            }

            self.split(config);
        }

        self.insert_into_children(object, config);
        Ok(())
    }

    /// Subdivide this node into 8 children and redistribute its objects
    fn split(&mut self, config: &OctreeConfig) {
        debug!(
            "Splitting node {} holding {} objects",
            self.region,
            self.objects.len()
        );

        let octants = self.region.octants();
        self.children = Subdivision::Split(Box::new(octants.map(OctreeNode::new)));

        for object in std::mem::take(&mut self.objects) {
            self.insert_into_children(object, config);
        }

        trace!(
            "Split of {} kept {} straddling objects at the parent",
            self.region,
            self.objects.len()
        );
    }

    /// Offer an object to each child in octant order, keeping it here if none accepts
    fn insert_into_children(&mut self, mut object: O, config: &OctreeConfig) {
        if let Subdivision::Split(children) = &mut self.children {
            for child in children.iter_mut() {
                match child.insert(object, config) {
                    Ok(()) => return,
                    Err(rejected) => object = rejected,
                }
            }
        }

        self.objects.push(object);
    }

    /// Remove the object with the same identity from this subtree
    ///
    /// Only one match is removed per call. A successful removal inside a
    /// child triggers a merge attempt at this node.
    pub fn remove(&mut self, object: &O, config: &OctreeConfig) -> Option<O> {
        self.remove_matching(&object.id(), &object.bounds(), config)
    }

    fn remove_matching(&mut self, id: &O::Id, bounds: &AABB, config: &OctreeConfig) -> Option<O> {
        // Objects are only ever stored where their bounds fit
        if !bounds.fits_in(&self.region) {
            return None;
        }

        if let Some(index) = self.objects.iter().position(|o| o.id() == *id) {
            return Some(self.objects.remove(index));
        }

        let removed = match &mut self.children {
            Subdivision::Leaf => None,
            Subdivision::Split(children) => children
                .iter_mut()
                .find_map(|child| child.remove_matching(id, bounds, config)),
        }?;

        self.merge(config);
        Some(removed)
    }

    /// Collapse childless children back into this node if they fit
    ///
    /// Only one level is checked: if any child has children of its own the
    /// subtree held more than `capacity` objects at some point and the merge
    /// is refused.
    pub fn merge(&mut self, config: &OctreeConfig) -> bool {
        let Subdivision::Split(children) = &self.children else {
            return false;
        };

        if children.iter().any(|child| !child.is_leaf()) {
            return false;
        }

        let total = self.objects.len()
            + children.iter().map(|child| child.objects.len()).sum::<usize>();
        if total > config.capacity {
            return false;
        }

        if let Subdivision::Split(children) = std::mem::replace(&mut self.children, Subdivision::Leaf) {
            for child in *children {
                self.objects.extend(child.objects);
            }
        }

        debug!("Merged children of {} back into {} objects", self.region, total);
        true
    }

    /// Collect every object whose bounds intersect `bounds`
    pub fn get_colliding<'a>(&'a self, bounds: &AABB, results: &mut Vec<&'a O>) {
        // Region entirely inside the query: everything below collides
        if self.region.fits_in(bounds) {
            self.all_objects(results);
            return;
        }

        if !self.region.intersects(bounds) {
            return;
        }

        results.extend(self.objects.iter().filter(|o| o.bounds().intersects(bounds)));

        if let Some(children) = self.children() {
            for child in children {
                child.get_colliding(bounds, results);
            }
        }
    }

    /// Collect every object whose bounds intersect a sphere
    pub fn query_radius<'a>(&'a self, center: Vec3, radius: f32, results: &mut Vec<&'a O>) {
        if !self.region.intersects_sphere(center, radius) {
            return;
        }

        results.extend(
            self.objects
                .iter()
                .filter(|o| o.bounds().intersects_sphere(center, radius)),
        );

        if let Some(children) = self.children() {
            for child in children {
                child.query_radius(center, radius, results);
            }
        }
    }

    /// Find an object in this node or its children
    pub fn find(&self, id: &O::Id) -> Option<&O> {
        if let Some(object) = self.objects.iter().find(|o| o.id() == *id) {
            return Some(object);
        }

        self.children()?
            .iter()
            .find_map(|child| child.find(id))
    }
}

/// Display adapter returned by [`OctreeNode::dump`]
pub struct NodeDump<'a, O> {
    node: &'a OctreeNode<O>,
    verbose: bool,
}

impl<O: fmt::Debug> NodeDump<'_, O> {
    fn write_node(&self, f: &mut fmt::Formatter<'_>, node: &OctreeNode<O>, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        writeln!(f, "{pad}region: {}", node.region)?;

        if self.verbose {
            writeln!(f, "{pad}objects: [")?;
            for object in &node.objects {
                writeln!(f, "{pad}  {object:?},")?;
            }
            writeln!(f, "{pad}]")?;
        } else {
            writeln!(f, "{pad}objects: {}", node.objects.len())?;
        }

        match node.children() {
            None => writeln!(f, "{pad}children: 0"),
            Some(children) if self.verbose => {
                writeln!(f, "{pad}children: [")?;
                for child in children {
                    self.write_node(f, child, depth + 1)?;
                }
                writeln!(f, "{pad}]")
            }
            Some(children) => writeln!(f, "{pad}children: {}", children.len()),
        }
    }
}

impl<O: fmt::Debug> fmt::Display for NodeDump<'_, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, self.node, 0)
    }
}
