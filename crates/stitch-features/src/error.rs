use crate::kind::{DetectorKind, ParseDetectorKindError};

/// An error type for detector lookup and construction.
///
/// `E` is the error type of the vision library backing the registry. Its
/// errors are forwarded untouched.
#[derive(thiserror::Error, Debug)]
pub enum FeatureError<E> {
    /// The identifier does not name any known detector.
    #[error("Unknown feature detector: {0}")]
    UnknownDetector(String),

    /// The detector is known but did not survive probing on this build.
    #[error("Feature detector {0} is not available in this build")]
    DetectorUnavailable(DetectorKind),

    /// Error raised by the vision library.
    #[error(transparent)]
    Backend(E),
}

impl<E> FeatureError<E> {
    /// Whether this is a configuration error, i.e. the requested detector
    /// could not be looked up in the registry.
    pub fn is_lookup_error(&self) -> bool {
        matches!(
            self,
            FeatureError::UnknownDetector(_) | FeatureError::DetectorUnavailable(_)
        )
    }
}

impl<E> From<ParseDetectorKindError> for FeatureError<E> {
    fn from(err: ParseDetectorKindError) -> Self {
        FeatureError::UnknownDetector(err.0)
    }
}

/// An error type for loading detector parameters.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Error to read the file.
    #[error("Failed to read the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to parse the parameters.
    #[error("Failed to parse detector parameters. {0}")]
    Json(#[from] serde_json::Error),
}
