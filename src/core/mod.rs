//! Core types and math primitives

pub mod math;
pub mod types;

pub use types::{Bounds3D, CalibrationPoint, Point3D, PointCloud, RawSample, SphericalSample};
