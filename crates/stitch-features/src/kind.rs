use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The keypoint detector algorithms known to the registry.
///
/// The declaration order is the probing priority: the first kind available in
/// the linked vision library becomes the default detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectorKind {
    /// Speeded-Up Robust Features. Patented, usually absent from stock builds.
    Surf,
    /// Oriented FAST and Rotated BRIEF. Always available.
    Orb,
    /// Scale-Invariant Feature Transform.
    Sift,
    /// Binary Robust Invariant Scalable Keypoints.
    Brisk,
    /// Accelerated KAZE.
    Akaze,
}

impl DetectorKind {
    /// All detector kinds, in probing priority order.
    pub const ALL: [DetectorKind; 5] = [
        DetectorKind::Surf,
        DetectorKind::Orb,
        DetectorKind::Sift,
        DetectorKind::Brisk,
        DetectorKind::Akaze,
    ];

    /// The kind that must be present in every registry.
    pub const FALLBACK: DetectorKind = DetectorKind::Orb;

    /// Returns the lowercase identifier of the detector, e.g. `"orb"`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DetectorKind::Surf => "surf",
            DetectorKind::Orb => "orb",
            DetectorKind::Sift => "sift",
            DetectorKind::Brisk => "brisk",
            DetectorKind::Akaze => "akaze",
        }
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name any known detector.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown feature detector: {0}")]
pub struct ParseDetectorKindError(pub String);

impl FromStr for DetectorKind {
    type Err = ParseDetectorKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DetectorKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ParseDetectorKindError(s.to_string()))
    }
}
