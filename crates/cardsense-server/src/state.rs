//! Shared application state.

use std::sync::Arc;

use cardsense_classify::{BackendConfig, RecommendationEngine};
use cardsense_core::{CardSenseConfig, Error, Result};
use tracing::info;

use crate::usage::{TracingUsageSink, UsageSink};

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: CardSenseConfig,
    pub backend_config: BackendConfig,
    pub engine: RecommendationEngine,
    pub usage_sink: Arc<dyn UsageSink>,
}

impl AppState {
    /// Load backend credentials and build the engine's backend chains.
    pub fn new(config: CardSenseConfig) -> Result<Self> {
        let backend_config = BackendConfig::load(&config.ai_config_file);

        let client = reqwest::Client::builder()
            .timeout(config.backend_timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        let engine = RecommendationEngine::from_config(&backend_config, client);

        info!(
            "Backend chains: image={:?} text={:?}",
            engine.image_chain(),
            engine.text_chain()
        );

        Ok(Self::with_engine(
            config,
            backend_config,
            engine,
            Arc::new(TracingUsageSink),
        ))
    }

    /// Assemble state from explicit parts.
    pub fn with_engine(
        config: CardSenseConfig,
        backend_config: BackendConfig,
        engine: RecommendationEngine,
        usage_sink: Arc<dyn UsageSink>,
    ) -> Self {
        Self {
            config,
            backend_config,
            engine,
            usage_sink,
        }
    }
}
