//! Recommendation engine facade.
//!
//! Drives the image and text analyzers, fuses their signals, and converts
//! any failure that escapes them into a fixed default recommendation.

use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use reqwest::Client;
use tracing::{debug, error, warn};

use cardsense_core::{Error, Result};

use crate::analyzer::{ImageAnalyzer, TextAnalyzer};
use crate::backends::{HuggingFaceClip, HuggingFaceSentiment, OpenAIText, OpenAIVision};
use crate::config::BackendConfig;
use crate::fusion;
use crate::lexicon;
use crate::types::{AnalysisRequest, Category, RecommendationResult, Suggestions};

/// Confidence of the fallback recommendation.
pub const DEFAULT_CONFIDENCE: f64 = 0.3;

/// Public entry point for card classification.
pub struct RecommendationEngine {
    image: ImageAnalyzer,
    text: TextAnalyzer,
}

impl RecommendationEngine {
    pub fn new(image: ImageAnalyzer, text: TextAnalyzer) -> Self {
        Self { image, text }
    }

    /// Engine that never leaves the process.
    pub fn local_only() -> Self {
        Self::new(ImageAnalyzer::local_only(), TextAnalyzer::local_only())
    }

    /// Build the standard chains: Hugging Face first, OpenAI second.
    pub fn from_config(config: &BackendConfig, client: Client) -> Self {
        let image = ImageAnalyzer::new(vec![
            Box::new(HuggingFaceClip::new(
                client.clone(),
                config.huggingface_token.clone(),
                config.clip_model.clone(),
            )),
            Box::new(OpenAIVision::new(
                client.clone(),
                config.openai_api_key.clone(),
                config.openai_vision_model.clone(),
            )),
        ]);
        let text = TextAnalyzer::new(vec![
            Box::new(HuggingFaceSentiment::new(
                client.clone(),
                config.huggingface_token.clone(),
                config.sentiment_model.clone(),
            )),
            Box::new(OpenAIText::new(
                client,
                config.openai_api_key.clone(),
                config.openai_text_model.clone(),
            )),
        ]);
        Self::new(image, text)
    }

    /// Active image chain, local fallback last.
    pub fn image_chain(&self) -> Vec<&'static str> {
        self.image.chain()
    }

    /// Active text chain, local fallback last.
    pub fn text_chain(&self) -> Vec<&'static str> {
        self.text.chain()
    }

    /// Full classification: image and text analyzed concurrently, then fused.
    ///
    /// Only the first image is analyzed; additional images are ignored.
    pub async fn classify(&self, request: &AnalysisRequest) -> RecommendationResult {
        guarded("full", self.run_full(request)).await
    }

    /// Image-only classification, skipping text analysis and fusion.
    pub async fn classify_image(&self, image_ref: &str) -> RecommendationResult {
        guarded("image", self.run_image(image_ref)).await
    }

    /// Text-only classification, skipping image analysis and fusion.
    pub async fn classify_text(&self, text: &str) -> RecommendationResult {
        guarded("text", self.run_text(text)).await
    }

    /// Recommendation returned when the pipeline itself fails.
    pub fn default_result() -> RecommendationResult {
        RecommendationResult {
            category: Category::Business,
            confidence: DEFAULT_CONFIDENCE,
            reasoning: "Default analysis due to unavailable AI services".to_string(),
            suggestions: Suggestions {
                title: Some(lexicon::title_for(Category::Business).to_string()),
                description: Some("Create a professional digital business card".to_string()),
                tags: Vec::new(),
                theme: Some(lexicon::theme_for(Category::Business).to_string()),
                improvements: Vec::new(),
            },
            image_analysis: None,
            text_analysis: None,
        }
    }

    async fn run_full(&self, request: &AnalysisRequest) -> Result<RecommendationResult> {
        if request.is_empty() {
            return Err(Error::InvalidRequest(
                "at least one of images, text or title is required".into(),
            ));
        }
        if request.images.len() > 1 {
            debug!("Ignoring {} additional image(s)", request.images.len() - 1);
        }

        let combined = request.combined_text();
        let image_task = async {
            match request.primary_image() {
                Some(image_ref) => Some(self.image.analyze(image_ref).await),
                None => None,
            }
        };
        let text_task = async {
            match combined.as_deref() {
                Some(text) => Some(self.text.analyze(text).await),
                None => None,
            }
        };
        let (image, text) = tokio::join!(image_task, text_task);

        Ok(fusion::fuse(image.as_ref(), text.as_ref()))
    }

    async fn run_image(&self, image_ref: &str) -> Result<RecommendationResult> {
        if image_ref.trim().is_empty() {
            return Err(Error::InvalidRequest("image reference is empty".into()));
        }
        let signal = self.image.analyze(image_ref).await;

        let improvements = if signal.is_appropriate {
            Vec::new()
        } else {
            vec!["Content may need review".to_string()]
        };
        Ok(RecommendationResult {
            category: signal.category,
            confidence: signal.confidence,
            reasoning: format!(
                "Image analysis detected {} with {} style",
                signal.objects.join(", "),
                signal.style
            ),
            suggestions: Suggestions {
                title: None,
                description: None,
                tags: signal.objects.clone(),
                theme: signal.suggested_theme.clone(),
                improvements,
            },
            image_analysis: Some(fusion::image_summary(&signal, signal.confidence)),
            text_analysis: None,
        })
    }

    async fn run_text(&self, text: &str) -> Result<RecommendationResult> {
        if text.is_empty() {
            return Err(Error::InvalidRequest("text is empty".into()));
        }
        let signal = self.text.analyze(text).await;

        Ok(RecommendationResult {
            category: signal.category,
            confidence: signal.confidence,
            reasoning: format!(
                "Text analysis shows {} sentiment with topics: {}",
                signal.sentiment,
                signal.topics.join(", ")
            ),
            suggestions: Suggestions {
                title: None,
                description: None,
                tags: signal.suggested_tags.clone(),
                theme: None,
                improvements: signal.improvements.clone(),
            },
            image_analysis: None,
            text_analysis: Some(fusion::text_summary(&signal, signal.confidence)),
        })
    }
}

/// Run one pipeline, turning errors and panics into the default result.
async fn guarded<F>(mode: &str, pipeline: F) -> RecommendationResult
where
    F: Future<Output = Result<RecommendationResult>>,
{
    match AssertUnwindSafe(pipeline).catch_unwind().await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            warn!("{} analysis failed, using default: {}", mode, e);
            RecommendationEngine::default_result()
        }
        Err(_) => {
            error!("{} analysis panicked, using default", mode);
            RecommendationEngine::default_result()
        }
    }
}
