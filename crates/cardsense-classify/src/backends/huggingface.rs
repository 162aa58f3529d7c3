//! Hugging Face Inference API backends (CLIP zero-shot, RoBERTa sentiment).

use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use cardsense_core::{Error, Result};

use super::{post_json, string_list, ImageBackend, TextBackend};
use crate::heuristics;
use crate::lexicon::IMAGE_CANDIDATE_LABELS;
use crate::types::{Category, ImageSignal, Sentiment, TextSignal};

pub const HUGGINGFACE_API_BASE: &str = "https://api-inference.huggingface.co";

/// Zero-shot image classification against one candidate label per category.
pub struct HuggingFaceClip {
    client: Client,
    token: Option<String>,
    model: String,
}

impl HuggingFaceClip {
    pub fn new(client: Client, token: Option<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            token,
            model: model.into(),
        }
    }

    async fn classify(&self, image_ref: &str) -> Result<ImageSignal> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| Error::Config("Hugging Face token not configured".into()))?;
        let url = format!("{}/models/{}", HUGGINGFACE_API_BASE, self.model);
        let body = json!({
            "inputs": image_ref,
            "parameters": { "candidate_labels": IMAGE_CANDIDATE_LABELS },
        });

        debug!("Classifying image with {}", self.model);
        let results = post_json(&self.client, &url, token, &body).await?;
        parse_clip_response(&results)
    }
}

impl ImageBackend for HuggingFaceClip {
    fn name(&self) -> &'static str {
        "huggingface-clip"
    }

    fn is_available(&self) -> bool {
        self.token.is_some()
    }

    fn analyze<'a>(&'a self, image_ref: &'a str) -> BoxFuture<'a, Result<ImageSignal>> {
        self.classify(image_ref).boxed()
    }
}

/// Sentiment scoring; the category itself comes from the keyword heuristic.
pub struct HuggingFaceSentiment {
    client: Client,
    token: Option<String>,
    model: String,
}

impl HuggingFaceSentiment {
    pub fn new(client: Client, token: Option<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            token,
            model: model.into(),
        }
    }

    async fn score(&self, text: &str) -> Result<TextSignal> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| Error::Config("Hugging Face token not configured".into()))?;
        let url = format!("{}/models/{}", HUGGINGFACE_API_BASE, self.model);

        debug!("Scoring sentiment with {}", self.model);
        let results = post_json(&self.client, &url, token, &json!({ "inputs": text })).await?;
        parse_sentiment_response(&results, text)
    }
}

impl TextBackend for HuggingFaceSentiment {
    fn name(&self) -> &'static str {
        "huggingface-sentiment"
    }

    fn is_available(&self) -> bool {
        self.token.is_some()
    }

    fn analyze<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<TextSignal>> {
        self.score(text).boxed()
    }
}

/// A `(label, score)` pair from a classification response.
#[derive(Debug, Clone, PartialEq)]
struct Prediction {
    label: String,
    score: Option<f64>,
}

/// Pull the highest scoring prediction out of the shapes the Inference API
/// returns: `[{label, score}]`, `[[{label, score}]]` or
/// `{labels: [..], scores: [..]}`.
fn top_prediction(results: &Value) -> Option<Prediction> {
    if let Some(labels) = results.get("labels").and_then(Value::as_array) {
        let scores = results.get("scores").and_then(Value::as_array);
        let predictions = labels.iter().enumerate().filter_map(|(i, label)| {
            let label = label.as_str()?.to_string();
            let score = scores.and_then(|s| s.get(i)).and_then(Value::as_f64);
            Some(Prediction { label, score })
        });
        return highest(predictions);
    }

    let mut entries = results.as_array()?;
    if let Some(inner) = entries.first().and_then(Value::as_array) {
        entries = inner;
    }

    highest(entries.iter().filter_map(|entry| {
        let label = entry.get("label")?.as_str()?.to_string();
        let score = entry.get("score").and_then(Value::as_f64);
        Some(Prediction { label, score })
    }))
}

/// First prediction with the highest score; missing scores count as zero.
fn highest(predictions: impl Iterator<Item = Prediction>) -> Option<Prediction> {
    predictions.fold(None, |best: Option<Prediction>, p| {
        let keep = best
            .as_ref()
            .is_some_and(|b| b.score.unwrap_or(0.0) >= p.score.unwrap_or(0.0));
        if keep {
            best
        } else {
            Some(p)
        }
    })
}

fn parse_clip_response(results: &Value) -> Result<ImageSignal> {
    if let Some(err) = results.get("error").and_then(Value::as_str) {
        return Err(Error::Backend(format!("Hugging Face error: {}", err)));
    }
    let top = top_prediction(results)
        .ok_or_else(|| Error::Backend("CLIP response has no labels".into()))?;
    let category = Category::from_label(&top.label);

    let text_field = |key: &str, default: &str| {
        results
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    };

    Ok(ImageSignal {
        category,
        confidence: top.score.unwrap_or(0.5),
        objects: results
            .get("objects")
            .and_then(string_list)
            .unwrap_or_else(|| vec!["unknown".to_string()]),
        colors: results
            .get("colors")
            .and_then(string_list)
            .unwrap_or_else(|| vec!["unknown".to_string()]),
        style: text_field("style", "unknown"),
        mood: text_field("mood", "neutral"),
        is_appropriate: true,
        suggested_theme: None,
    }
    .normalized())
}

fn parse_sentiment_response(results: &Value, text: &str) -> Result<TextSignal> {
    if let Some(err) = results.get("error").and_then(Value::as_str) {
        return Err(Error::Backend(format!("Hugging Face error: {}", err)));
    }
    let top = top_prediction(results)
        .ok_or_else(|| Error::Backend("Sentiment response has no labels".into()))?;
    let local = heuristics::analyze_text(text);

    Ok(TextSignal {
        category: local.category,
        confidence: top.score.unwrap_or(0.5),
        sentiment: Sentiment::from_label(&top.label),
        topics: local.topics,
        suggested_tags: local.suggested_tags,
        improvements: local.improvements,
    }
    .normalized())
}
