use std::cell::Cell;

use stitch_features::{
    DetectorKind, DetectorParams, DetectorRegistry, FeatureBackend, FeatureError, FeatureSummary,
    OrbParams,
};

#[derive(Debug, PartialEq, thiserror::Error)]
#[error("{0}")]
struct LibraryError(&'static str);

#[derive(Debug, Clone, PartialEq)]
struct ToyFeatures {
    kind: DetectorKind,
    keypoints: usize,
    image_index: Option<usize>,
}

/// A vision library whose available detectors are scripted per test.
///
/// A "keypoint" is any byte above 127, described by a 32-element descriptor.
#[derive(Debug, Default)]
struct ScriptedLibrary {
    compiled: Vec<DetectorKind>,
    failing: Vec<DetectorKind>,
    creations: Cell<usize>,
}

impl ScriptedLibrary {
    fn with(compiled: &[DetectorKind]) -> Self {
        Self {
            compiled: compiled.to_vec(),
            ..Default::default()
        }
    }

    fn failing(mut self, failing: &[DetectorKind]) -> Self {
        self.failing = failing.to_vec();
        self
    }
}

impl FeatureBackend for ScriptedLibrary {
    type Detector = DetectorParams;
    type Image = [u8];
    type Features = ToyFeatures;
    type Error = LibraryError;

    fn name(&self) -> &str {
        "scripted"
    }

    fn is_compiled(&self, kind: DetectorKind) -> bool {
        self.compiled.contains(&kind)
    }

    fn create(&self, params: &DetectorParams) -> Result<DetectorParams, LibraryError> {
        self.creations.set(self.creations.get() + 1);
        if self.failing.contains(&params.kind()) {
            return Err(LibraryError("algorithm disabled in this build"));
        }
        if let DetectorParams::Orb(orb) = params {
            if orb.scale_factor <= 1.0 {
                return Err(LibraryError("scale factor must be greater than one"));
            }
        }
        Ok(params.clone())
    }

    fn compute_features(
        &self,
        detector: &mut DetectorParams,
        image: &[u8],
        mask: Option<&[u8]>,
    ) -> Result<ToyFeatures, LibraryError> {
        if image.is_empty() {
            return Err(LibraryError("empty image"));
        }
        let keypoints = image
            .iter()
            .enumerate()
            .filter(|(i, _)| mask.map_or(true, |m| m.get(*i).copied().unwrap_or(0) != 0))
            .filter(|(_, &v)| v > 127)
            .count();
        Ok(ToyFeatures {
            kind: detector.kind(),
            keypoints,
            image_index: None,
        })
    }

    fn summarize(&self, features: &ToyFeatures) -> FeatureSummary {
        FeatureSummary {
            keypoints: features.keypoints,
            descriptor_rows: features.keypoints,
            descriptor_cols: 32,
        }
    }

    fn set_image_index(&self, features: &mut ToyFeatures, index: usize) {
        features.image_index = Some(index);
    }
}

const IMAGE: [u8; 8] = [0, 200, 10, 255, 128, 3, 90, 180];

#[test]
fn probe_keeps_priority_order() {
    let registry = DetectorRegistry::probe(ScriptedLibrary::with(&[
        DetectorKind::Akaze,
        DetectorKind::Sift,
        DetectorKind::Orb,
    ]));
    assert_eq!(
        registry.identifiers(),
        [DetectorKind::Orb, DetectorKind::Sift, DetectorKind::Akaze]
    );
    assert_eq!(registry.default_kind(), DetectorKind::Orb);
}

#[test]
fn probe_orb_and_sift_only() {
    let registry = DetectorRegistry::probe(ScriptedLibrary::with(&[
        DetectorKind::Orb,
        DetectorKind::Sift,
    ]));
    let names: Vec<_> = registry.identifiers().iter().map(|k| k.as_str()).collect();
    assert_eq!(names, ["orb", "sift"]);
    assert_eq!(registry.default_kind(), DetectorKind::Orb);
    assert!(!registry.contains(DetectorKind::Surf));
}

#[test]
fn default_is_first_available_in_priority_order() {
    let registry = DetectorRegistry::probe(ScriptedLibrary::with(&DetectorKind::ALL));
    assert_eq!(registry.identifiers(), DetectorKind::ALL);
    assert_eq!(registry.default_kind(), DetectorKind::Surf);

    let registry = DetectorRegistry::probe(ScriptedLibrary::with(&[
        DetectorKind::Brisk,
        DetectorKind::Orb,
    ]));
    assert_eq!(registry.default_kind(), DetectorKind::Orb);
}

#[test]
fn probe_constructs_every_compiled_candidate() {
    let registry = DetectorRegistry::probe(
        ScriptedLibrary::with(&DetectorKind::ALL).failing(&[DetectorKind::Surf]),
    );
    assert_eq!(registry.backend().creations.get(), DetectorKind::ALL.len());
    assert!(!registry.contains(DetectorKind::Surf));
    assert_eq!(registry.default_kind(), DetectorKind::Orb);
}

#[test]
fn probe_not_compiled_skips_construction() {
    let registry = DetectorRegistry::probe(ScriptedLibrary::with(&[DetectorKind::Orb]));
    assert_eq!(registry.backend().creations.get(), 1);
}

#[test]
fn orb_is_always_registered() {
    let registry = DetectorRegistry::probe(ScriptedLibrary::with(&[DetectorKind::Brisk]));
    assert!(registry.contains(DetectorKind::Orb));
    assert_eq!(registry.identifiers(), [DetectorKind::Orb, DetectorKind::Brisk]);
    assert!(registry.construct("orb").is_ok());
}

#[test]
fn every_registered_detector_constructs_and_detects() -> Result<(), Box<dyn std::error::Error>> {
    let registry = DetectorRegistry::probe(
        ScriptedLibrary::with(&DetectorKind::ALL).failing(&[DetectorKind::Surf]),
    );
    for &kind in registry.identifiers() {
        let mut detector = registry.construct(kind.as_str())?;
        assert_eq!(detector.kind(), kind);
        let features = detector.detect(&IMAGE)?;
        assert_eq!(features.kind, kind);
        assert_eq!(features.keypoints, 4);
    }
    Ok(())
}

#[test]
fn construct_unknown_name_is_lookup_error() {
    let registry = DetectorRegistry::probe(ScriptedLibrary::with(&DetectorKind::ALL));
    let err = registry.construct("not-a-real-name").unwrap_err();
    assert!(err.is_lookup_error());
    assert!(matches!(err, FeatureError::UnknownDetector(ref name) if name == "not-a-real-name"));

    for name in ["ORB", " orb", "Sift\n", "AKAZE", " sift "] {
        let err = registry.construct(name).unwrap_err();
        assert!(matches!(err, FeatureError::UnknownDetector(ref got) if got == name));
    }
}

#[test]
fn construct_unavailable_is_lookup_error() {
    let registry = DetectorRegistry::probe(ScriptedLibrary::with(&[DetectorKind::Orb]));
    let err = registry.construct("surf").unwrap_err();
    assert!(err.is_lookup_error());
    assert!(matches!(
        err,
        FeatureError::DetectorUnavailable(DetectorKind::Surf)
    ));
    assert_eq!(
        err.to_string(),
        "Feature detector surf is not available in this build"
    );
}

#[test]
fn construct_forwards_library_errors() {
    let registry = DetectorRegistry::probe(ScriptedLibrary::with(&[DetectorKind::Orb]));
    let params = OrbParams {
        scale_factor: 0.5,
        ..Default::default()
    };
    let err = registry.construct_with(params).unwrap_err();
    assert!(!err.is_lookup_error());
    assert!(matches!(
        err,
        FeatureError::Backend(LibraryError("scale factor must be greater than one"))
    ));
    assert_eq!(err.to_string(), "scale factor must be greater than one");
}

#[test]
fn construct_with_forwards_params() -> Result<(), Box<dyn std::error::Error>> {
    let registry = DetectorRegistry::probe(ScriptedLibrary::with(&[DetectorKind::Orb]));
    let params = OrbParams {
        n_features: 2000,
        ..Default::default()
    };
    let detector = registry.construct_with(params.clone())?;
    assert_eq!(detector.handle(), &DetectorParams::Orb(params));
    Ok(())
}

#[test]
fn construct_default_uses_default_kind() -> Result<(), Box<dyn std::error::Error>> {
    let registry = DetectorRegistry::probe(ScriptedLibrary::with(&[
        DetectorKind::Sift,
        DetectorKind::Orb,
    ]));
    let detector = registry.construct_default()?;
    assert_eq!(detector.kind(), DetectorKind::Orb);
    Ok(())
}

#[test]
fn detect_forwards_library_errors() -> Result<(), Box<dyn std::error::Error>> {
    let registry = DetectorRegistry::probe(ScriptedLibrary::with(&[DetectorKind::Orb]));
    let mut detector = registry.construct("orb")?;
    assert_eq!(detector.detect(&[]), Err(LibraryError("empty image")));
    Ok(())
}

#[test]
fn detect_is_stable() -> Result<(), Box<dyn std::error::Error>> {
    let registry = DetectorRegistry::probe(ScriptedLibrary::with(&[DetectorKind::Orb]));
    let mut detector = registry.construct("orb")?;
    let first = registry.backend().summarize(&detector.detect(&IMAGE)?);
    let second = registry.backend().summarize(&detector.detect(&IMAGE)?);
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn detect_with_mask() -> Result<(), Box<dyn std::error::Error>> {
    let registry = DetectorRegistry::probe(ScriptedLibrary::with(&[DetectorKind::Orb]));
    let mut detector = registry.construct("orb")?;
    let mask = [0, 0, 0, 0, 1, 1, 1, 1];
    let features = detector.detect_with_mask(&IMAGE, &mask)?;
    assert_eq!(features.keypoints, 2);
    Ok(())
}

#[test]
fn detect_batch_tags_image_index() -> Result<(), Box<dyn std::error::Error>> {
    let registry = DetectorRegistry::probe(ScriptedLibrary::with(&[DetectorKind::Orb]));
    let mut detector = registry.construct("orb")?;
    let images: Vec<Vec<u8>> = vec![IMAGE.to_vec(), vec![255; 3]];
    let features = detector.detect_batch(images.iter().map(Vec::as_slice))?;
    assert_eq!(features.len(), 2);
    assert_eq!(features[0].image_index, Some(0));
    assert_eq!(features[1].image_index, Some(1));
    assert_eq!(features[1].keypoints, 3);
    Ok(())
}

#[test]
fn detect_batch_stops_at_first_error() -> Result<(), Box<dyn std::error::Error>> {
    let registry = DetectorRegistry::probe(ScriptedLibrary::with(&[DetectorKind::Orb]));
    let mut detector = registry.construct("orb")?;
    let images: [&[u8]; 3] = [&IMAGE, &[], &IMAGE];
    let res = detector.detect_batch(images);
    assert_eq!(res, Err(LibraryError("empty image")));
    Ok(())
}
