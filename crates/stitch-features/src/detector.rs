use crate::{backend::FeatureBackend, kind::DetectorKind};

/// A constructed feature detector.
///
/// Holds exactly one backend detector handle. Detection takes `&mut self`;
/// build one detector per thread to compute features in parallel.
pub struct FeatureDetector<'r, B: FeatureBackend> {
    backend: &'r B,
    kind: DetectorKind,
    handle: B::Detector,
}

impl<'r, B: FeatureBackend> FeatureDetector<'r, B> {
    pub(crate) fn new(backend: &'r B, kind: DetectorKind, handle: B::Detector) -> Self {
        Self {
            backend,
            kind,
            handle,
        }
    }

    /// The algorithm behind this detector.
    pub fn kind(&self) -> DetectorKind {
        self.kind
    }

    /// The backend detector handle.
    pub fn handle(&self) -> &B::Detector {
        &self.handle
    }

    /// Compute the features of `image`.
    ///
    /// The backend result and error are returned as-is.
    pub fn detect(&mut self, image: &B::Image) -> Result<B::Features, B::Error> {
        self.backend.compute_features(&mut self.handle, image, None)
    }

    /// Compute the features of `image` inside the non-zero region of `mask`.
    pub fn detect_with_mask(
        &mut self,
        image: &B::Image,
        mask: &B::Image,
    ) -> Result<B::Features, B::Error> {
        self.backend
            .compute_features(&mut self.handle, image, Some(mask))
    }

    /// Compute the features of every image, in order.
    ///
    /// Each feature-set is tagged with the position of its image in the
    /// sequence. Stops at the first error.
    pub fn detect_batch<'i>(
        &mut self,
        images: impl IntoIterator<Item = &'i B::Image>,
    ) -> Result<Vec<B::Features>, B::Error>
    where
        B::Image: 'i,
    {
        images
            .into_iter()
            .enumerate()
            .map(|(index, image)| {
                let mut features = self.detect(image)?;
                self.backend.set_image_index(&mut features, index);
                Ok(features)
            })
            .collect()
    }
}

impl<B: FeatureBackend> std::fmt::Debug for FeatureDetector<'_, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureDetector")
            .field("backend", &self.backend.name())
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
