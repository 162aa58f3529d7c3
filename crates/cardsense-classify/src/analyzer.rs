//! Per-modality analyzers: walk the backend chain, end at the local heuristic.

use tracing::{debug, info, warn};

use crate::backends::{ImageBackend, TextBackend};
use crate::heuristics;
use crate::types::{ImageSignal, TextSignal};

/// Image analysis over an ordered backend chain.
pub struct ImageAnalyzer {
    backends: Vec<Box<dyn ImageBackend>>,
}

impl ImageAnalyzer {
    pub fn new(backends: Vec<Box<dyn ImageBackend>>) -> Self {
        Self { backends }
    }

    /// Analyzer with no remote backends.
    pub fn local_only() -> Self {
        Self::new(Vec::new())
    }

    /// Names of the configured chain, local fallback last.
    pub fn chain(&self) -> Vec<&'static str> {
        chain_names(self.backends.iter().map(|b| (b.name(), b.is_available())))
    }

    /// Analyze one image reference. Never fails.
    pub async fn analyze(&self, image_ref: &str) -> ImageSignal {
        for backend in &self.backends {
            if !backend.is_available() {
                debug!("Image backend {} has no credentials, skipping", backend.name());
                continue;
            }
            match backend.analyze(image_ref).await {
                Ok(signal) => {
                    info!(
                        "Image classified by {}: {} ({:.2})",
                        backend.name(),
                        signal.category,
                        signal.confidence
                    );
                    return signal.normalized();
                }
                Err(e) => warn!("Image backend {} failed, falling through: {}", backend.name(), e),
            }
        }

        debug!("Using local image default");
        heuristics::default_image_signal()
    }
}

/// Text analysis over an ordered backend chain.
pub struct TextAnalyzer {
    backends: Vec<Box<dyn TextBackend>>,
}

impl TextAnalyzer {
    pub fn new(backends: Vec<Box<dyn TextBackend>>) -> Self {
        Self { backends }
    }

    pub fn local_only() -> Self {
        Self::new(Vec::new())
    }

    pub fn chain(&self) -> Vec<&'static str> {
        chain_names(self.backends.iter().map(|b| (b.name(), b.is_available())))
    }

    /// Analyze free text. Never fails.
    pub async fn analyze(&self, text: &str) -> TextSignal {
        for backend in &self.backends {
            if !backend.is_available() {
                debug!("Text backend {} has no credentials, skipping", backend.name());
                continue;
            }
            match backend.analyze(text).await {
                Ok(signal) => {
                    info!(
                        "Text classified by {}: {} ({:.2})",
                        backend.name(),
                        signal.category,
                        signal.confidence
                    );
                    return signal.normalized();
                }
                Err(e) => warn!("Text backend {} failed, falling through: {}", backend.name(), e),
            }
        }

        debug!("Using local keyword heuristic");
        heuristics::analyze_text(text)
    }
}

/// Available backend names followed by the local fallback.
fn chain_names(backends: impl Iterator<Item = (&'static str, bool)>) -> Vec<&'static str> {
    backends
        .filter(|(_, available)| *available)
        .map(|(name, _)| name)
        .chain(std::iter::once("local"))
        .collect()
}
