//! Deterministic local analysis used when no remote backend answers.
//!
//! The text heuristic counts lexicon keyword hits per category; the image
//! heuristic has no signal to work with and returns a fixed default.

use crate::lexicon::{self, TAG_STOP_WORDS};
use crate::types::{Category, ImageSignal, Sentiment, TextSignal};

/// Lowest confidence the local text heuristic will report.
pub const TEXT_CONFIDENCE_FLOOR: f64 = 0.3;
/// Confidence of the default image signal.
pub const IMAGE_DEFAULT_CONFIDENCE: f64 = 0.5;

const MAX_TOPICS: usize = 5;
const MAX_TAGS: usize = 8;

/// Keyword hit counts, indexed by `Category::index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategoryScores([usize; 5]);

impl CategoryScores {
    pub fn get(&self, category: Category) -> usize {
        self.0[category.index()]
    }

    /// Winning category.
    ///
    /// Reduces pairwise over the fixed category order and keeps the running
    /// winner only when its score is strictly greater, so ties go to the
    /// later category and an all-zero board yields `Art`.
    pub fn winner(&self) -> Category {
        Category::ALL
            .into_iter()
            .reduce(|best, next| if self.get(best) > self.get(next) { best } else { next })
            .unwrap_or(Category::Business)
    }
}

/// Count case-insensitive keyword substring hits for every category.
pub fn score_categories(text: &str) -> CategoryScores {
    let lower = text.to_lowercase();
    let mut scores = [0usize; 5];
    for category in Category::ALL {
        scores[category.index()] = lexicon::keywords_for(category)
            .iter()
            .filter(|kw| lower.contains(*kw))
            .count();
    }
    CategoryScores(scores)
}

/// Words longer than three characters, in order, at most five.
pub fn extract_topics(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter(|w| w.chars().count() > 3)
        .take(MAX_TOPICS)
        .map(String::from)
        .collect()
}

/// Words longer than two characters minus stop words, at most eight.
pub fn extract_tags(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter(|w| w.chars().count() > 2 && !TAG_STOP_WORDS.contains(w))
        .take(MAX_TAGS)
        .map(String::from)
        .collect()
}

/// Canned content tips for short or contact-less card text.
pub fn generate_improvements(text: &str) -> Vec<String> {
    let mut improvements = Vec::new();
    if text.chars().count() < 50 {
        improvements.push("Consider adding more descriptive content".to_string());
    }
    if !text.contains("contact") && !text.contains("email") {
        improvements.push("Add contact information".to_string());
    }
    // Counts single-space separated parts, so runs of spaces inflate it.
    if text.split(' ').count() < 10 {
        improvements.push("Expand description for better engagement".to_string());
    }
    improvements
}

/// Keyword classifier over free text.
pub fn analyze_text(text: &str) -> TextSignal {
    let scores = score_categories(text);
    let category = scores.winner();
    let confidence = (scores.get(category) as f64 / 10.0).clamp(TEXT_CONFIDENCE_FLOOR, 1.0);

    TextSignal {
        category,
        confidence,
        sentiment: Sentiment::Neutral,
        topics: extract_topics(text),
        suggested_tags: extract_tags(text),
        improvements: generate_improvements(text),
    }
}

/// Signal reported when no vision backend could look at the image.
pub fn default_image_signal() -> ImageSignal {
    ImageSignal {
        category: Category::Business,
        confidence: IMAGE_DEFAULT_CONFIDENCE,
        objects: vec!["unknown".to_string()],
        colors: vec!["unknown".to_string()],
        style: "unknown".to_string(),
        mood: "neutral".to_string(),
        is_appropriate: true,
        suggested_theme: Some(lexicon::theme_for(Category::Business).to_string()),
    }
}
