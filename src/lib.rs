//! drishti-scan - pan/tilt distance-scanner rig with 3D reconstruction
//!
//! Drives a rotating pan/tilt rig with an analog range sensor over a serial
//! line, collects raw (pan, tilt, reading) samples, and reconstructs them
//! into a calibrated 3D point cloud.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 shell / main                        │  ← Operator session
//! └─────────────────────────────────────────────────────┘
//!            │                              │
//! ┌─────────────────────────┐  ┌───────────────────────┐
//! │          rig/           │  │        render/        │  ← Collaborators
//! │ (transport, discovery,  │  │     (SVG output)      │
//! │   protocol, driver)     │  │                       │
//! └─────────────────────────┘  └───────────────────────┘
//!            │                              │
//! ┌─────────────────────────────────────────────────────┐
//! │             pipeline/ + calibration/                │  ← Processing core
//! │   (filtering, response fit, spherical conversion)   │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! │                 (types, math)                       │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! The processing core is pure: given a calibration model and a batch of raw
//! samples it produces filtered, calibrated points deterministically, with no
//! I/O and no shared state. Serial handling, the command shell, and SVG
//! rendering are thin layers around it.

pub mod calibration;
pub mod config;
pub mod core;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod rig;
pub mod shell;

// Re-export commonly used types
pub use crate::calibration::{fit, CalibrationError, CalibrationModel, FitConfig, InputShapeError};
pub use crate::config::AppConfig;
pub use crate::core::math::to_cartesian;
pub use crate::core::types::{CalibrationPoint, Point3D, PointCloud, RawSample, SphericalSample};
pub use crate::error::{Error, Result};
pub use crate::pipeline::{
    sample_to_spherical, AngularOffsets, FilterMode, ProcessorConfig, ScanProcessor,
};
pub use crate::shell::ScannerShell;
