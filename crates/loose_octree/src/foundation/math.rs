//! Math utilities and types
//!
//! Coordinates are single precision, matching the rest of the engine.

pub use nalgebra::Vector3;

/// 3D vector type
pub type Vec3 = Vector3<f32>;
