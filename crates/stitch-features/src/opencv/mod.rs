use std::sync::OnceLock;

use opencv::{
    core::{Mat, Ptr},
    features2d::{self, Feature2D},
    prelude::*,
    stitching::{self, Detail_ImageFeatures},
};

use crate::{
    backend::{FeatureBackend, FeatureSummary},
    detector::FeatureDetector,
    error::FeatureError,
    kind::DetectorKind,
    params::{BriskParams, DetectorParams, OrbParams, OrbScoreType},
};

mod compat;

/// Feature detectors provided by the linked OpenCV library.
///
/// Features are computed with the stitching module's
/// `detail::computeImageFeatures2`, so the result plugs directly into the
/// OpenCV feature matchers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenCvBackend;

/// A detector constructed from the process-wide OpenCV registry.
pub type OpenCvDetector = FeatureDetector<'static, OpenCvBackend>;

impl FeatureBackend for OpenCvBackend {
    type Detector = Ptr<Feature2D>;
    type Image = Mat;
    type Features = Detail_ImageFeatures;
    type Error = opencv::Error;

    fn name(&self) -> &str {
        "opencv"
    }

    fn is_compiled(&self, kind: DetectorKind) -> bool {
        match kind {
            DetectorKind::Surf => cfg!(feature = "nonfree"),
            DetectorKind::Orb | DetectorKind::Sift | DetectorKind::Brisk | DetectorKind::Akaze => {
                true
            }
        }
    }

    fn create(&self, params: &DetectorParams) -> opencv::Result<Self::Detector> {
        let detector: Ptr<Feature2D> = match params {
            DetectorParams::Surf(params) => surf_create(params)?,
            DetectorParams::Orb(params) => orb_create(params)?.into(),
            DetectorParams::Sift(params) => compat::sift_create(params)?.into(),
            DetectorParams::Brisk(params) => brisk_create(params)?.into(),
            DetectorParams::Akaze(params) => compat::akaze_create(params)?.into(),
        };
        Ok(detector)
    }

    fn compute_features(
        &self,
        detector: &mut Self::Detector,
        image: &Mat,
        mask: Option<&Mat>,
    ) -> opencv::Result<Self::Features> {
        let mut features = Detail_ImageFeatures::default();
        match mask {
            Some(mask) => stitching::compute_image_features2(detector, image, &mut features, mask)?,
            None => {
                stitching::compute_image_features2(detector, image, &mut features, &Mat::default())?
            }
        }
        Ok(features)
    }

    fn summarize(&self, features: &Self::Features) -> FeatureSummary {
        let descriptors = features.descriptors();
        FeatureSummary {
            keypoints: features.keypoints().len(),
            descriptor_rows: descriptors.rows().max(0) as usize,
            descriptor_cols: descriptors.cols().max(0) as usize,
        }
    }

    fn set_image_index(&self, features: &mut Self::Features, index: usize) {
        debug_assert!(index <= i32::MAX as usize, "image index {index} overflows img_idx");
        features.set_img_idx(i32::try_from(index).unwrap_or(i32::MAX));
    }
}

fn orb_create(params: &OrbParams) -> opencv::Result<Ptr<features2d::ORB>> {
    let score_type = match params.score_type {
        OrbScoreType::Harris => features2d::ORB_ScoreType::HARRIS_SCORE,
        OrbScoreType::Fast => features2d::ORB_ScoreType::FAST_SCORE,
    };
    features2d::ORB::create(
        params.n_features,
        params.scale_factor,
        params.n_levels,
        params.edge_threshold,
        params.first_level,
        params.wta_k,
        score_type,
        params.patch_size,
        params.fast_threshold,
    )
}

fn brisk_create(params: &BriskParams) -> opencv::Result<Ptr<features2d::BRISK>> {
    features2d::BRISK::create(params.threshold, params.octaves, params.pattern_scale)
}

#[cfg(feature = "nonfree")]
fn surf_create(params: &crate::params::SurfParams) -> opencv::Result<Ptr<Feature2D>> {
    let surf = opencv::xfeatures2d::SURF::create(
        params.hessian_threshold,
        params.n_octaves,
        params.n_octave_layers,
        params.extended,
        params.upright,
    )?;
    Ok(surf.into())
}

#[cfg(not(feature = "nonfree"))]
fn surf_create(_params: &crate::params::SurfParams) -> opencv::Result<Ptr<Feature2D>> {
    Err(opencv::Error::new(
        opencv::core::StsNotImplemented,
        "SURF requires the `nonfree` feature and an OpenCV build with xfeatures2d",
    ))
}

static REGISTRY: OnceLock<crate::DetectorRegistry<OpenCvBackend>> = OnceLock::new();

/// The process-wide registry of OpenCV detectors.
///
/// Probed on first access.
pub fn registry() -> &'static crate::DetectorRegistry<OpenCvBackend> {
    REGISTRY.get_or_init(|| crate::DetectorRegistry::probe(OpenCvBackend))
}

/// The OpenCV detectors available on this build, in priority order.
pub fn identifiers() -> &'static [DetectorKind] {
    registry().identifiers()
}

/// Construct an OpenCV detector by name, or the default one when `name` is `None`.
pub fn construct(name: Option<&str>) -> Result<OpenCvDetector, FeatureError<opencv::Error>> {
    match name {
        Some(name) => registry().construct(name),
        None => registry().construct_default(),
    }
}
