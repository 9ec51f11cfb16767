use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, kind::DetectorKind};

/// Parameters of the SURF detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfParams {
    /// Threshold for the hessian keypoint detector.
    pub hessian_threshold: f64,
    /// Number of pyramid octaves.
    pub n_octaves: i32,
    /// Number of layers within each octave.
    pub n_octave_layers: i32,
    /// Use 128-element descriptors instead of 64-element ones.
    pub extended: bool,
    /// Skip the orientation computation.
    pub upright: bool,
}

impl Default for SurfParams {
    fn default() -> Self {
        Self {
            hessian_threshold: 100.0,
            n_octaves: 4,
            n_octave_layers: 3,
            extended: false,
            upright: false,
        }
    }
}

/// How ORB ranks the detected keypoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrbScoreType {
    /// Harris corner measure.
    #[default]
    Harris,
    /// FAST score. Slightly less stable keypoints, faster to compute.
    Fast,
}

/// Parameters of the ORB detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbParams {
    /// Maximum number of features to retain.
    pub n_features: i32,
    /// Pyramid decimation ratio, greater than 1.
    pub scale_factor: f32,
    /// Number of pyramid levels.
    pub n_levels: i32,
    /// Size of the border where features are not detected.
    pub edge_threshold: i32,
    /// Pyramid level the source image is placed on.
    pub first_level: i32,
    /// Number of points producing each element of the oriented BRIEF descriptor.
    pub wta_k: i32,
    /// Keypoint ranking.
    pub score_type: OrbScoreType,
    /// Size of the patch used by the oriented BRIEF descriptor.
    pub patch_size: i32,
    /// FAST threshold.
    pub fast_threshold: i32,
}

impl Default for OrbParams {
    fn default() -> Self {
        Self {
            n_features: 500,
            scale_factor: 1.2,
            n_levels: 8,
            edge_threshold: 31,
            first_level: 0,
            wta_k: 2,
            score_type: OrbScoreType::Harris,
            patch_size: 31,
            fast_threshold: 20,
        }
    }
}

/// Parameters of the SIFT detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiftParams {
    /// Number of best features to retain, `0` keeps all of them.
    pub n_features: i32,
    /// Number of layers in each octave.
    pub n_octave_layers: i32,
    /// Threshold used to filter out weak features in low-contrast regions.
    pub contrast_threshold: f64,
    /// Threshold used to filter out edge-like features.
    pub edge_threshold: f64,
    /// Sigma of the Gaussian applied to the input image at octave 0.
    pub sigma: f64,
}

impl Default for SiftParams {
    fn default() -> Self {
        Self {
            n_features: 0,
            n_octave_layers: 3,
            contrast_threshold: 0.04,
            edge_threshold: 10.0,
            sigma: 1.6,
        }
    }
}

/// Parameters of the BRISK detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BriskParams {
    /// AGAST detection threshold score.
    pub threshold: i32,
    /// Detection octaves, `0` for single scale.
    pub octaves: i32,
    /// Scale applied to the sampling pattern.
    pub pattern_scale: f32,
}

impl Default for BriskParams {
    fn default() -> Self {
        Self {
            threshold: 30,
            octaves: 3,
            pattern_scale: 1.0,
        }
    }
}

/// Descriptor flavour computed by AKAZE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AkazeDescriptorType {
    /// Upright KAZE descriptor.
    KazeUpright,
    /// KAZE descriptor.
    Kaze,
    /// Upright modified-local difference binary descriptor.
    MldbUpright,
    /// Modified-local difference binary descriptor.
    #[default]
    Mldb,
}

/// Conductivity function of the nonlinear scale space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diffusivity {
    /// Perona-Malik g1.
    PmG1,
    /// Perona-Malik g2.
    #[default]
    PmG2,
    /// Weickert.
    Weickert,
    /// Charbonnier.
    Charbonnier,
}

/// Parameters of the AKAZE detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AkazeParams {
    /// Type of the extracted descriptor.
    pub descriptor_type: AkazeDescriptorType,
    /// Size of the descriptor in bits, `0` means full size.
    pub descriptor_size: i32,
    /// Number of channels in the descriptor, 1 to 3.
    pub descriptor_channels: i32,
    /// Detector response threshold to accept a point.
    pub threshold: f32,
    /// Maximum octave evolution of the image.
    pub n_octaves: i32,
    /// Default number of sublevels per scale level.
    pub n_octave_layers: i32,
    /// Diffusivity type.
    pub diffusivity: Diffusivity,
}

impl Default for AkazeParams {
    fn default() -> Self {
        Self {
            descriptor_type: AkazeDescriptorType::Mldb,
            descriptor_size: 0,
            descriptor_channels: 3,
            threshold: 0.001,
            n_octaves: 4,
            n_octave_layers: 4,
            diffusivity: Diffusivity::PmG2,
        }
    }
}

/// Construction parameters for one detector algorithm.
///
/// Each variant carries only the fields its algorithm understands. In a
/// configuration file the variant is selected with the `algorithm` key:
///
/// ```
/// use stitch_features::{DetectorKind, DetectorParams};
///
/// let params = DetectorParams::from_json_str(r#"{ "algorithm": "orb", "n_features": 2000 }"#)?;
/// assert_eq!(params.kind(), DetectorKind::Orb);
/// # Ok::<(), stitch_features::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "lowercase")]
pub enum DetectorParams {
    /// SURF parameters.
    Surf(SurfParams),
    /// ORB parameters.
    Orb(OrbParams),
    /// SIFT parameters.
    Sift(SiftParams),
    /// BRISK parameters.
    Brisk(BriskParams),
    /// AKAZE parameters.
    Akaze(AkazeParams),
}

impl DetectorParams {
    /// The default parameters of the given detector.
    pub fn defaults(kind: DetectorKind) -> Self {
        match kind {
            DetectorKind::Surf => Self::Surf(SurfParams::default()),
            DetectorKind::Orb => Self::Orb(OrbParams::default()),
            DetectorKind::Sift => Self::Sift(SiftParams::default()),
            DetectorKind::Brisk => Self::Brisk(BriskParams::default()),
            DetectorKind::Akaze => Self::Akaze(AkazeParams::default()),
        }
    }

    /// The detector these parameters construct.
    pub fn kind(&self) -> DetectorKind {
        match self {
            Self::Surf(_) => DetectorKind::Surf,
            Self::Orb(_) => DetectorKind::Orb,
            Self::Sift(_) => DetectorKind::Sift,
            Self::Brisk(_) => DetectorKind::Brisk,
            Self::Akaze(_) => DetectorKind::Akaze,
        }
    }

    /// Parse parameters from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read parameters from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileDoesNotExist(path.to_path_buf()));
        }
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

impl From<DetectorKind> for DetectorParams {
    fn from(kind: DetectorKind) -> Self {
        Self::defaults(kind)
    }
}

macro_rules! impl_from_params {
    ($($params:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$params> for DetectorParams {
                fn from(params: $params) -> Self {
                    Self::$variant(params)
                }
            }
        )*
    };
}

impl_from_params! {
    SurfParams => Surf,
    OrbParams => Orb,
    SiftParams => Sift,
    BriskParams => Brisk,
    AkazeParams => Akaze,
}
