#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// The seam to the vision library providing the detector algorithms.
pub mod backend;

/// Constructed detector wrapper.
pub mod detector;

/// Error types for detector lookup, construction and configuration.
pub mod error;

/// Detector identifiers and their priority order.
pub mod kind;

/// Per-algorithm construction parameters.
pub mod params;

/// The probed detector registry.
pub mod registry;

/// OpenCV detectors (feature-gated).
///
/// Requires the `opencv` feature flag and a system OpenCV with the
/// `features2d` and `stitching` modules. SURF additionally needs `nonfree`.
#[cfg(feature = "opencv")]
pub mod opencv;

pub use crate::backend::{FeatureBackend, FeatureSummary};
pub use crate::detector::FeatureDetector;
pub use crate::error::{ConfigError, FeatureError};
pub use crate::kind::{DetectorKind, ParseDetectorKindError};
pub use crate::params::{
    AkazeDescriptorType, AkazeParams, BriskParams, DetectorParams, Diffusivity, OrbParams,
    OrbScoreType, SiftParams, SurfParams,
};
pub use crate::registry::DetectorRegistry;
