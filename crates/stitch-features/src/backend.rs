use crate::{kind::DetectorKind, params::DetectorParams};

/// Keypoint count and descriptor shape of a computed feature-set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureSummary {
    /// Number of detected keypoints.
    pub keypoints: usize,
    /// Number of descriptor rows, one per described keypoint.
    pub descriptor_rows: usize,
    /// Length of a single descriptor, in elements.
    pub descriptor_cols: usize,
}

/// The vision library that provides the detector algorithms.
///
/// The registry never looks inside the handles, images or feature-sets of a
/// backend: it probes, constructs and forwards.
///
/// Implementations must support [`DetectorKind::Orb`].
pub trait FeatureBackend {
    /// Opaque handle to a constructed detector.
    type Detector;

    /// Image type accepted by the compute routine.
    type Image: ?Sized;

    /// Opaque result of running a detector over an image.
    type Features;

    /// Error raised by the library.
    type Error: std::error::Error + 'static;

    /// Human readable name of the library, used in log messages.
    fn name(&self) -> &str;

    /// Whether the library was built with the given algorithm.
    fn is_compiled(&self, kind: DetectorKind) -> bool;

    /// Construct a detector from its parameters.
    fn create(&self, params: &DetectorParams) -> Result<Self::Detector, Self::Error>;

    /// Compute the features of `image`, restricted to the non-zero region of
    /// `mask` when one is given.
    fn compute_features(
        &self,
        detector: &mut Self::Detector,
        image: &Self::Image,
        mask: Option<&Self::Image>,
    ) -> Result<Self::Features, Self::Error>;

    /// Keypoint count and descriptor shape of a feature-set.
    fn summarize(&self, features: &Self::Features) -> FeatureSummary;

    /// Record the position of the source image within a batch.
    ///
    /// Backends storing the index in a narrower integer saturate at its
    /// maximum value.
    fn set_image_index(&self, _features: &mut Self::Features, _index: usize) {}
}
