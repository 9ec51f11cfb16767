//! Detector factories that build across OpenCV versions.
//!
//! The `opencv` crate generates its bindings from the installed headers, so
//! factories whose argument list grew over time have different Rust
//! signatures depending on the system library:
//! - OpenCV 4.8 added `enable_precise_upscale` to `SIFT::create`
//! - OpenCV 4.7 added `max_points` to `AKAZE::create`
//!
//! For those the `_def` factory is used and the parameters are applied
//! through the setters. The SIFT setters appeared in OpenCV 4.7, which is
//! the minimum supported version.

use opencv::{core::Ptr, features2d, prelude::*, Result};

use crate::params::{AkazeDescriptorType, AkazeParams, Diffusivity, SiftParams};

pub(crate) fn sift_create(params: &SiftParams) -> Result<Ptr<features2d::SIFT>> {
    let mut sift = features2d::SIFT::create_def()?;
    sift.set_n_features(params.n_features)?;
    sift.set_n_octave_layers(params.n_octave_layers)?;
    sift.set_contrast_threshold(params.contrast_threshold)?;
    sift.set_edge_threshold(params.edge_threshold)?;
    sift.set_sigma(params.sigma)?;
    Ok(sift)
}

pub(crate) fn akaze_create(params: &AkazeParams) -> Result<Ptr<features2d::AKAZE>> {
    let mut akaze = features2d::AKAZE::create_def()?;
    akaze.set_descriptor_type(akaze_descriptor_type(params.descriptor_type))?;
    akaze.set_descriptor_size(params.descriptor_size)?;
    akaze.set_descriptor_channels(params.descriptor_channels)?;
    akaze.set_threshold(f64::from(params.threshold))?;
    akaze.set_n_octaves(params.n_octaves)?;
    akaze.set_n_octave_layers(params.n_octave_layers)?;
    akaze.set_diffusivity(diffusivity(params.diffusivity))?;
    Ok(akaze)
}

fn akaze_descriptor_type(value: AkazeDescriptorType) -> features2d::AKAZE_DescriptorType {
    match value {
        AkazeDescriptorType::KazeUpright => features2d::AKAZE_DescriptorType::DESCRIPTOR_KAZE_UPRIGHT,
        AkazeDescriptorType::Kaze => features2d::AKAZE_DescriptorType::DESCRIPTOR_KAZE,
        AkazeDescriptorType::MldbUpright => features2d::AKAZE_DescriptorType::DESCRIPTOR_MLDB_UPRIGHT,
        AkazeDescriptorType::Mldb => features2d::AKAZE_DescriptorType::DESCRIPTOR_MLDB,
    }
}

fn diffusivity(value: Diffusivity) -> features2d::KAZE_DiffusivityType {
    match value {
        Diffusivity::PmG1 => features2d::KAZE_DiffusivityType::DIFF_PM_G1,
        Diffusivity::PmG2 => features2d::KAZE_DiffusivityType::DIFF_PM_G2,
        Diffusivity::Weickert => features2d::KAZE_DiffusivityType::DIFF_WEICKERT,
        Diffusivity::Charbonnier => features2d::KAZE_DiffusivityType::DIFF_CHARBONNIER,
    }
}
