//! API parity tests — validates that the analyze endpoint's response shapes
//! match what the card builder frontend expects.
//!
//! These tests build the real router around a local-only engine and drive it
//! with `tower::ServiceExt::oneshot` (no network, no listening socket).

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use cardsense_classify::backends::ImageBackend;
use cardsense_classify::{
    BackendConfig, ImageAnalyzer, ImageSignal, RecommendationEngine, TextAnalyzer,
};
use cardsense_core::CardSenseConfig;
use cardsense_server::usage::{UsageEvent, UsageSink};
use cardsense_server::{build_router, AppState};

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<UsageEvent>>,
}

impl UsageSink for RecordingSink {
    fn record(&self, event: &UsageEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Vision backend that never answers in time.
struct StalledBackend;

impl ImageBackend for StalledBackend {
    fn name(&self) -> &'static str {
        "stalled"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn analyze<'a>(&'a self, _image_ref: &'a str) -> BoxFuture<'a, cardsense_core::Result<ImageSignal>> {
        async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Err(cardsense_core::Error::Http("stalled".into()))
        }
        .boxed()
    }
}

fn local_state(sink: Arc<RecordingSink>) -> Arc<AppState> {
    Arc::new(AppState::with_engine(
        CardSenseConfig::default(),
        BackendConfig::default(),
        RecommendationEngine::local_only(),
        sink,
    ))
}

async fn post_analyze(state: Arc<AppState>, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/ai/analyze")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(state, request).await
}

async fn send(state: Arc<AppState>, request: Request<Body>) -> (StatusCode, Value) {
    let response = build_router(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Verify the success envelope: { success, analysis, timestamp, model_info }.
#[tokio::test]
async fn test_full_analysis_envelope_shape() {
    let sink = Arc::new(RecordingSink::default());
    let (status, body) = post_analyze(
        local_state(sink.clone()),
        json!({
            "images": ["https://cdn.example.com/card.png"],
            "text": "Our professional business company offers service and contact info",
            "title": "Acme Consulting",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["timestamp"].is_string());
    assert_eq!(body["model_info"]["version"], "1.0.0");
    assert!(body["model_info"]["capabilities"].is_array());
    assert!(body["model_info"]["accuracy"].as_str().unwrap().ends_with('%'));

    let analysis = &body["analysis"];
    assert_eq!(analysis["suggestedCategory"], "business");
    assert!(analysis["confidence"].is_number());
    assert!(analysis["reasoning"]
        .as_str()
        .unwrap()
        .starts_with("Based on image content (business, 50% confidence)"));
    assert_eq!(analysis["suggestions"]["theme"], "professional-minimal");
    assert!(analysis["suggestions"]["tags"].is_array());
    assert!(analysis["imageAnalysis"]["objects"].is_array());
    assert_eq!(analysis["textAnalysis"]["language"], "en");

    let events = sink.events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].analysis_type, "full");
}

#[tokio::test]
async fn test_title_only_passes_text_signal_through() {
    let sink = Arc::new(RecordingSink::default());
    let (status, body) = post_analyze(
        local_state(sink),
        json!({ "title": "art business social meme fan" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analysis"]["suggestedCategory"], "art");
    assert_eq!(body["analysis"]["confidence"], 0.3);
    assert!(body["analysis"].get("imageAnalysis").is_none());
}

#[tokio::test]
async fn test_image_mode_shape() {
    let sink = Arc::new(RecordingSink::default());
    let (status, body) = post_analyze(
        local_state(sink.clone()),
        json!({ "images": ["https://cdn.example.com/a.png"], "analysisType": "image" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let analysis = &body["analysis"];
    assert_eq!(analysis["suggestedCategory"], "business");
    assert_eq!(analysis["confidence"], 0.5);
    assert_eq!(analysis["reasoning"], "Image analysis detected unknown with unknown style");
    assert_eq!(analysis["suggestions"]["tags"], json!(["unknown"]));
    assert_eq!(analysis["imageAnalysis"]["quality"], 0.5);
    assert_eq!(sink.events.lock().unwrap()[0].analysis_type, "image");
}

#[tokio::test]
async fn test_text_mode_shape() {
    let (status, body) = post_analyze(
        local_state(Arc::new(RecordingSink::default())),
        json!({ "text": "Funny viral meme lol", "analysisType": "text" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let analysis = &body["analysis"];
    assert_eq!(analysis["suggestedCategory"], "meme");
    assert_eq!(analysis["textAnalysis"]["sentiment"], "neutral");
    assert_eq!(analysis["suggestions"]["improvements"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_missing_input_is_rejected() {
    let sink = Arc::new(RecordingSink::default());
    let state = local_state(sink.clone());

    let (status, body) = post_analyze(state.clone(), json!({ "userInput": {"x": 1} })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = post_analyze(state.clone(), json!({ "images": [], "text": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) =
        post_analyze(state.clone(), json!({ "text": "hello", "analysisType": "image" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Images required for image analysis");

    let (status, body) =
        post_analyze(state, json!({ "images": ["a.png"], "analysisType": "text" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Text or title required for text analysis");

    assert!(sink.events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_timeout_returns_fallback() {
    let sink = Arc::new(RecordingSink::default());
    let config = CardSenseConfig {
        request_timeout: Duration::from_millis(50),
        ..CardSenseConfig::default()
    };
    let engine = RecommendationEngine::new(
        ImageAnalyzer::new(vec![Box::new(StalledBackend)]),
        TextAnalyzer::local_only(),
    );
    let state = Arc::new(AppState::with_engine(
        config,
        BackendConfig::default(),
        engine,
        sink.clone(),
    ));

    let (status, body) = post_analyze(state, json!({ "images": ["a.png"] })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "AI analysis failed");
    assert_eq!(body["fallback"]["suggestedCategory"], "business");
    assert_eq!(body["fallback"]["confidence"], 0.3);
    assert_eq!(
        body["fallback"]["reasoning"],
        "Default analysis due to unavailable AI services"
    );
    assert!(sink.events.lock().unwrap().is_empty());
}

/// Bodies that fail to deserialize get the same 500 + fallback envelope.
#[tokio::test]
async fn test_malformed_body_returns_fallback() {
    let sink = Arc::new(RecordingSink::default());
    let state = local_state(sink.clone());

    let raw_bodies = [r#"{"images": "a.png"}"#, "{not json", r#"{"text": 5}"#];
    for raw in raw_bodies {
        let request = Request::builder()
            .method("POST")
            .uri("/api/ai/analyze")
            .header("content-type", "application/json")
            .body(Body::from(raw))
            .unwrap();
        let (status, body) = send(state.clone(), request).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "body {}", raw);
        assert_eq!(body["error"], "AI analysis failed");
        assert!(body["details"].is_string());
        assert_eq!(body["fallback"]["suggestedCategory"], "business");
        assert_eq!(body["fallback"]["confidence"], 0.3);
    }
    assert!(sink.events.lock().unwrap().is_empty());
}

/// Verify the capability document shape and that no credential leaks.
#[tokio::test]
async fn test_capabilities_shape() {
    let backend_config = BackendConfig {
        openai_api_key: Some("sk-do-not-leak".into()),
        ..BackendConfig::default()
    };
    let state = Arc::new(AppState::with_engine(
        CardSenseConfig::default(),
        backend_config,
        RecommendationEngine::local_only(),
        Arc::new(RecordingSink::default()),
    ));
    let request = Request::builder()
        .uri("/api/ai/analyze")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(state, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["supported_categories"],
        json!(["business", "social", "meme", "fan", "art"])
    );
    assert_eq!(body["backend_chains"]["image"], json!(["local"]));
    assert_eq!(body["backend_config"]["openaiConfigured"], true);
    assert!(body["rate_limits"]["anonymous"].is_string());
    assert!(!body.to_string().contains("sk-do-not-leak"));
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(local_state(Arc::new(RecordingSink::default())), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
