use crate::{
    backend::FeatureBackend,
    detector::FeatureDetector,
    error::FeatureError,
    kind::DetectorKind,
    params::DetectorParams,
};

/// The detectors a vision library can construct on this build.
///
/// The registry is built once by [`DetectorRegistry::probe`] and is read-only
/// afterwards.
pub struct DetectorRegistry<B: FeatureBackend> {
    backend: B,
    available: Vec<DetectorKind>,
    default_kind: DetectorKind,
}

impl<B: FeatureBackend> DetectorRegistry<B> {
    /// Probe every [`DetectorKind`] in priority order and keep the ones the
    /// backend can construct.
    ///
    /// A detector is available when the backend reports it as compiled in and
    /// a construction with default parameters succeeds. Unavailable detectors
    /// are logged and skipped; probing never fails. ORB is always registered.
    pub fn probe(backend: B) -> Self {
        let mut available = Vec::with_capacity(DetectorKind::ALL.len());

        for kind in DetectorKind::ALL {
            match probe_kind(&backend, kind) {
                Ok(()) => {
                    log::debug!("{}: registered feature detector {kind}", backend.name());
                    available.push(kind);
                }
                Err(reason) if kind == DetectorKind::FALLBACK => {
                    log::error!(
                        "{}: fallback feature detector {kind} failed to probe ({reason}), keeping it registered",
                        backend.name()
                    );
                    available.push(kind);
                }
                Err(reason) => {
                    log::info!("{}: {kind} not available ({reason})", backend.name());
                }
            }
        }

        // the fallback is always pushed, so the list is never empty
        let default_kind = available.first().copied().unwrap_or(DetectorKind::FALLBACK);

        Self {
            backend,
            available,
            default_kind,
        }
    }

    /// The available detectors, in priority order.
    pub fn identifiers(&self) -> &[DetectorKind] {
        &self.available
    }

    /// The first available detector in priority order.
    pub fn default_kind(&self) -> DetectorKind {
        self.default_kind
    }

    /// Whether `kind` survived probing.
    pub fn contains(&self, kind: DetectorKind) -> bool {
        self.available.contains(&kind)
    }

    /// The vision library behind this registry.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Look up a detector by name and construct it with default parameters.
    pub fn construct(&self, name: &str) -> Result<FeatureDetector<'_, B>, FeatureError<B::Error>> {
        let kind = name.parse::<DetectorKind>()?;
        self.construct_with(DetectorParams::defaults(kind))
    }

    /// Construct the default detector with default parameters.
    pub fn construct_default(&self) -> Result<FeatureDetector<'_, B>, FeatureError<B::Error>> {
        self.construct_with(DetectorParams::defaults(self.default_kind))
    }

    /// Construct the detector selected by `params`, forwarding the parameters
    /// to the backend.
    pub fn construct_with(
        &self,
        params: impl Into<DetectorParams>,
    ) -> Result<FeatureDetector<'_, B>, FeatureError<B::Error>> {
        let params = params.into();
        let kind = params.kind();
        if !self.contains(kind) {
            return Err(FeatureError::DetectorUnavailable(kind));
        }

        let handle = self
            .backend
            .create(&params)
            .map_err(FeatureError::Backend)?;

        Ok(FeatureDetector::new(&self.backend, kind, handle))
    }
}

impl<B: FeatureBackend + std::fmt::Debug> std::fmt::Debug for DetectorRegistry<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectorRegistry")
            .field("backend", &self.backend)
            .field("available", &self.available)
            .field("default_kind", &self.default_kind)
            .finish()
    }
}

/// Why a detector did not make it into the registry.
#[derive(Debug, thiserror::Error)]
enum ProbeFailure<E> {
    #[error("not compiled in")]
    NotCompiled,

    #[error("construction failed: {0}")]
    Construction(E),
}

fn probe_kind<B: FeatureBackend>(
    backend: &B,
    kind: DetectorKind,
) -> Result<(), ProbeFailure<B::Error>> {
    if !backend.is_compiled(kind) {
        return Err(ProbeFailure::NotCompiled);
    }
    backend
        .create(&DetectorParams::defaults(kind))
        .map(drop)
        .map_err(ProbeFailure::Construction)
}
