//! Raw-sample to point-cloud pipeline

mod geometry;
mod processor;

pub use geometry::{sample_to_spherical, AngularOffsets};
pub use processor::{FilterMode, ProcessorConfig, ScanProcessor};
