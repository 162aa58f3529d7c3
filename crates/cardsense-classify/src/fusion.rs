//! Weighted fusion of image and text signals into one recommendation.

use crate::lexicon;
use crate::types::{
    Category, ImageSignal, ImageSummary, RecommendationResult, Suggestions, TextSignal,
    TextSummary,
};

pub const IMAGE_WEIGHT: f64 = 0.6;
pub const TEXT_WEIGHT: f64 = 0.4;

/// Confidence reported when there is no signal at all.
const NO_SIGNAL_CONFIDENCE: f64 = 0.5;

/// Pick the winning category and confidence.
///
/// With both signals the image only wins when its weighted score is strictly
/// greater, so an exact tie goes to the text signal. A single signal passes
/// through unweighted.
pub fn decide(image: Option<&ImageSignal>, text: Option<&TextSignal>) -> (Category, f64) {
    match (image, text) {
        (Some(image), Some(text)) => {
            let image_score = image.confidence * IMAGE_WEIGHT;
            let text_score = text.confidence * TEXT_WEIGHT;
            if image_score > text_score {
                (image.category, image_score)
            } else {
                (text.category, text_score)
            }
        }
        (Some(image), None) => (image.category, image.confidence),
        (None, Some(text)) => (text.category, text.confidence),
        (None, None) => (Category::Business, NO_SIGNAL_CONFIDENCE),
    }
}

/// Human-readable explanation for the UI.
pub fn reasoning(image: Option<&ImageSignal>, text: Option<&TextSignal>) -> String {
    match (image, text) {
        (Some(image), Some(text)) => format!(
            "Based on image content ({}, {}% confidence) and text analysis ({}, {}% confidence)",
            image.category,
            percent(image.confidence),
            text.category,
            percent(text.confidence)
        ),
        (Some(image), None) => format!(
            "Based on image content showing {} with {} style",
            image.objects.join(", "),
            image.style
        ),
        (None, Some(text)) => format!(
            "Based on text content with {} sentiment and topics: {}",
            text.sentiment,
            text.topics.join(", ")
        ),
        (None, None) => "Based on general content analysis".to_string(),
    }
}

/// Canned suggestions for the winning category, enriched from the text signal.
pub fn suggestions(category: Category, text: Option<&TextSignal>) -> Suggestions {
    Suggestions {
        title: Some(lexicon::title_for(category).to_string()),
        description: Some(lexicon::description_for(category).to_string()),
        tags: text.map(|t| t.suggested_tags.clone()).unwrap_or_default(),
        theme: Some(lexicon::theme_for(category).to_string()),
        improvements: text.map(|t| t.improvements.clone()).unwrap_or_default(),
    }
}

pub fn image_summary(image: &ImageSignal, quality: f64) -> ImageSummary {
    ImageSummary {
        objects: image.objects.clone(),
        colors: image.colors.clone(),
        style: image.style.clone(),
        mood: image.mood.clone(),
        quality,
    }
}

pub fn text_summary(text: &TextSignal, readability: f64) -> TextSummary {
    TextSummary {
        sentiment: text.sentiment,
        topics: text.topics.clone(),
        language: "en".to_string(),
        readability,
    }
}

/// Full recommendation from whichever signals were produced.
pub fn fuse(image: Option<&ImageSignal>, text: Option<&TextSignal>) -> RecommendationResult {
    let (category, confidence) = decide(image, text);

    RecommendationResult {
        category,
        confidence,
        reasoning: reasoning(image, text),
        suggestions: suggestions(category, text),
        image_analysis: image.map(|i| image_summary(i, confidence)),
        text_analysis: text.map(|t| text_summary(t, confidence)),
    }
}

fn percent(confidence: f64) -> i64 {
    (confidence * 100.0).round() as i64
}
