//! Axis-aligned bounding boxes
//!
//! `AABB` is the region type of every octree node and the bounds type of
//! every stored object. Containment (`fits_in`) and overlap (`intersects`)
//! are both inclusive of the box faces, so touching boxes overlap and a box
//! always fits inside itself.

use std::fmt;

use crate::foundation::math::Vec3;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given extents (half-size)
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Create a cube centered at a point with the given edge length
    pub fn from_center_size(center: Vec3, size: f32) -> Self {
        let half = size * 0.5;
        Self::from_center_extents(center, Vec3::new(half, half, half))
    }

    /// Create an AABB from `[min_x, min_y, min_z, max_x, max_y, max_z]`
    pub fn from_min_max_slice(values: &[f32; 6]) -> Self {
        Self {
            min: Vec3::new(values[0], values[1], values[2]),
            max: Vec3::new(values[3], values[4], values[5]),
        }
    }

    /// Degenerate box covering a single point
    pub fn point(position: Vec3) -> Self {
        Self { min: position, max: position }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Get the full edge lengths of the AABB
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Check if splitting into octants would yield strictly smaller boxes
    ///
    /// False once the center rounds onto a face on every axis, which is
    /// where repeated halving ends in `f32`.
    pub fn is_divisible(&self) -> bool {
        let center = self.center();
        (0..3).any(|axis| self.min[axis] < center[axis] && center[axis] < self.max[axis])
    }

    /// Check if this AABB lies entirely inside `other`
    pub fn fits_in(&self, other: &AABB) -> bool {
        self.min.x >= other.min.x && self.max.x <= other.max.x &&
        self.min.y >= other.min.y && self.max.y <= other.max.y &&
        self.min.z >= other.min.z && self.max.z <= other.max.z
    }

    /// Check if this AABB intersects another AABB
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Check if this AABB intersects a sphere
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        let closest_point = Vec3::new(
            center.x.clamp(self.min.x, self.max.x),
            center.y.clamp(self.min.y, self.max.y),
            center.z.clamp(self.min.z, self.max.z),
        );

        (closest_point - center).magnitude_squared() <= radius * radius
    }

    /// Split into 8 equal octants around the center
    ///
    /// Octant layout:
    /// 0: -X, -Y, -Z (back-bottom-left)
    /// 1: +X, -Y, -Z (back-bottom-right)
    /// 2: -X, +Y, -Z (back-top-left)
    /// 3: +X, +Y, -Z (back-top-right)
    /// 4: -X, -Y, +Z (front-bottom-left)
    /// 5: +X, -Y, +Z (front-bottom-right)
    /// 6: -X, +Y, +Z (front-top-left)
    /// 7: +X, +Y, +Z (front-top-right)
    pub fn octants(&self) -> [AABB; 8] {
        let center = self.center();

        std::array::from_fn(|octant| {
            let (min_x, max_x) = if octant & 1 != 0 { (center.x, self.max.x) } else { (self.min.x, center.x) };
            let (min_y, max_y) = if octant & 2 != 0 { (center.y, self.max.y) } else { (self.min.y, center.y) };
            let (min_z, max_z) = if octant & 4 != 0 { (center.z, self.max.z) } else { (self.min.z, center.z) };

            AABB::new(Vec3::new(min_x, min_y, min_z), Vec3::new(max_x, max_y, max_z))
        })
    }
}

impl fmt::Display for AABB {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[({}, {}, {}) - ({}, {}, {})]",
            self.min.x, self.min.y, self.min.z,
            self.max.x, self.max.y, self.max.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cube(min: f32, max: f32) -> AABB {
        AABB::new(Vec3::new(min, min, min), Vec3::new(max, max, max))
    }

    #[test]
    fn test_fits_in_is_reflexive_and_inclusive() {
        let region = cube(0.0, 10.0);
        assert!(region.fits_in(&region));
        assert!(cube(0.0, 5.0).fits_in(&region));
        assert!(!cube(-0.1, 5.0).fits_in(&region));
        assert!(!region.fits_in(&cube(0.0, 5.0)));
    }

    #[test]
    fn test_intersects_touching_faces() {
        let a = cube(0.0, 5.0);
        let b = cube(5.0, 10.0);
        let c = cube(5.1, 10.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_octants_cover_region() {
        let region = cube(0.0, 10.0);
        let octants = region.octants();

        assert_eq!(octants[0], cube(0.0, 5.0));
        assert_eq!(octants[7], cube(5.0, 10.0));
        assert_eq!(octants[1].min, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(octants[6].max, Vec3::new(5.0, 10.0, 10.0));

        let volume: f32 = octants.iter().map(|o| o.size().product()).sum();
        assert_relative_eq!(volume, region.size().product());
        assert!(octants.iter().all(|o| o.fits_in(&region)));
    }

    #[test]
    fn test_from_center_size() {
        let aabb = AABB::from_center_size(Vec3::new(1.0, 2.0, 3.0), 4.0);
        assert_relative_eq!(aabb.min, Vec3::new(-1.0, 0.0, 1.0));
        assert_relative_eq!(aabb.max, Vec3::new(3.0, 4.0, 5.0));
        assert_relative_eq!(aabb.extents(), Vec3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_is_divisible() {
        assert!(cube(0.0, 10.0).is_divisible());

        // Flat on one axis still halves on the others
        let plane = AABB::new(Vec3::new(0.0, 0.0, 3.0), Vec3::new(10.0, 10.0, 3.0));
        assert!(plane.is_divisible());

        assert!(!AABB::point(Vec3::new(1.0, 1.0, 1.0)).is_divisible());

        let one = 1.0_f32;
        let next = f32::from_bits(one.to_bits() + 1);
        assert!(!cube(one, next).is_divisible());
    }

    #[test]
    fn test_intersects_sphere() {
        let aabb = cube(0.0, 1.0);
        assert!(aabb.intersects_sphere(Vec3::new(2.0, 0.5, 0.5), 1.0));
        assert!(!aabb.intersects_sphere(Vec3::new(3.0, 3.0, 3.0), 1.0));
    }
}
