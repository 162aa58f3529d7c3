//! Analyze routes — card category recommendation.
//! Matches the /api/ai/analyze endpoint of the card builder.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info_span, warn, Instrument};

use cardsense_classify::{AnalysisRequest, Category, RecommendationEngine, RecommendationResult};

use crate::state::AppState;
use crate::usage::UsageEvent;

pub const MODEL_VERSION: &str = "1.0.0";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/ai/analyze", get(capabilities).post(analyze))
}

/// Which analyzers a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisType {
    Image,
    Text,
    Full,
}

impl AnalysisType {
    /// Unknown or missing values mean a full analysis.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("image") => AnalysisType::Image,
            Some("text") => AnalysisType::Text,
            _ => AnalysisType::Full,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Image => "image",
            AnalysisType::Text => "text",
            AnalysisType::Full => "full",
        }
    }
}

/// Incoming analyze request body.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub images: Vec<String>,
    pub text: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "userInput")]
    pub user_input: Option<serde_json::Value>,
    #[serde(rename = "analysisType")]
    pub analysis_type: Option<String>,
}

impl AnalyzeRequest {
    fn into_parts(self) -> (AnalysisType, AnalysisRequest) {
        let mode = AnalysisType::from_param(self.analysis_type.as_deref());
        let request = AnalysisRequest {
            images: self.images,
            text: self.text,
            title: self.title,
            user_input: self.user_input,
        };
        (mode, request)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub version: &'static str,
    pub capabilities: Vec<&'static str>,
    pub accuracy: String,
}

/// Successful analyze response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: RecommendationResult,
    pub timestamp: String,
    pub model_info: ModelInfo,
}

impl AnalyzeResponse {
    fn new(analysis: RecommendationResult) -> Self {
        let accuracy = format!("{}%", (analysis.confidence * 100.0).round() as i64);
        Self {
            success: true,
            analysis,
            timestamp: chrono::Utc::now().to_rfc3339(),
            model_info: ModelInfo {
                version: MODEL_VERSION,
                capabilities: vec!["image_analysis", "text_analysis", "category_suggestion"],
                accuracy,
            },
        }
    }
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

/// 500 carrying the default recommendation.
fn analysis_failed(details: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "AI analysis failed",
            "details": details,
            "fallback": RecommendationEngine::default_result(),
        })),
    )
        .into_response()
}

// ---------------------------------------------------------------
// POST /api/ai/analyze
// ---------------------------------------------------------------

async fn analyze(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!("Rejected analyze body: {}", rejection.body_text());
            return analysis_failed(rejection.body_text());
        }
    };
    let (mode, request) = req.into_parts();

    if request.is_empty() {
        return bad_request("At least one of images, text, or title is required");
    }
    let text = request.combined_text();
    let work = match mode {
        AnalysisType::Image => match request.primary_image() {
            Some(image) => Work::Image(image),
            None => return bad_request("Images required for image analysis"),
        },
        AnalysisType::Text => match text.as_deref() {
            Some(text) => Work::Text(text),
            None => return bad_request("Text or title required for text analysis"),
        },
        AnalysisType::Full => Work::Full(&request),
    };

    let request_id = uuid::Uuid::new_v4().to_string();
    let span = info_span!("analyze", request_id = %request_id, mode = mode.as_str());
    let outcome = tokio::time::timeout(state.config.request_timeout, work.run(&state.engine))
        .instrument(span)
        .await;

    match outcome {
        Ok(analysis) => {
            state.usage_sink.record(&UsageEvent {
                request_id,
                analysis_type: mode.as_str().to_string(),
                suggested_category: analysis.category,
                confidence: analysis.confidence,
                created_at: chrono::Utc::now(),
            });
            (StatusCode::OK, Json(AnalyzeResponse::new(analysis))).into_response()
        }
        Err(elapsed) => {
            error!("Analysis {} exceeded {:?}", request_id, state.config.request_timeout);
            analysis_failed(elapsed.to_string())
        }
    }
}

/// A validated unit of engine work.
enum Work<'a> {
    Image(&'a str),
    Text(&'a str),
    Full(&'a AnalysisRequest),
}

impl Work<'_> {
    async fn run(self, engine: &RecommendationEngine) -> RecommendationResult {
        match self {
            Work::Image(image) => engine.classify_image(image).await,
            Work::Text(text) => engine.classify_text(text).await,
            Work::Full(request) => engine.classify(request).await,
        }
    }
}

// ---------------------------------------------------------------
// GET /api/ai/analyze
// ---------------------------------------------------------------

async fn capabilities(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let categories: Vec<Category> = Category::ALL.to_vec();

    Json(json!({
        "available_models": {
            "image_analysis": ["CLIP", "OpenAI Vision", "Local default"],
            "text_analysis": ["RoBERTa sentiment", "OpenAI", "Local keywords"],
            "category_detection": ["Hybrid AI", "Rule-based"],
        },
        "backend_chains": {
            "image": state.engine.image_chain(),
            "text": state.engine.text_chain(),
        },
        "backend_config": state.backend_config.to_response(),
        "supported_categories": categories,
        "features": [
            "Automatic category suggestion",
            "Content appropriateness check",
            "Theme recommendation",
            "Tag generation",
            "Improvement suggestions",
            "Sentiment analysis",
            "Image object detection",
            "Color palette extraction",
        ],
        "rate_limits": {
            "authenticated": "100 requests/hour",
            "anonymous": "10 requests/hour",
        },
        "accuracy_metrics": {
            "image_categorization": "87%",
            "text_sentiment": "91%",
            "overall_suggestion": "84%",
        },
        "model_version": MODEL_VERSION,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_type_param() {
        assert_eq!(AnalysisType::from_param(Some("image")), AnalysisType::Image);
        assert_eq!(AnalysisType::from_param(Some("text")), AnalysisType::Text);
        assert_eq!(AnalysisType::from_param(Some("full")), AnalysisType::Full);
        assert_eq!(AnalysisType::from_param(Some("video")), AnalysisType::Full);
        assert_eq!(AnalysisType::from_param(None), AnalysisType::Full);
    }

    #[test]
    fn test_envelope_accuracy() {
        let mut result = RecommendationEngine::default_result();
        result.confidence = 0.546;
        let envelope = AnalyzeResponse::new(result);
        assert_eq!(envelope.model_info.accuracy, "55%");
        assert!(envelope.success);
        assert!(chrono::DateTime::parse_from_rfc3339(&envelope.timestamp).is_ok());
    }
}
