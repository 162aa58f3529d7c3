//! Classification types matching the card builder's API surface.

use serde::{Deserialize, Serialize};

/// Card category. Declaration order is significant for tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Business,
    Social,
    Meme,
    Fan,
    Art,
}

impl Category {
    /// All categories in their fixed order.
    pub const ALL: [Category; 5] = [
        Category::Business,
        Category::Social,
        Category::Meme,
        Category::Fan,
        Category::Art,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Business => "business",
            Category::Social => "social",
            Category::Meme => "meme",
            Category::Fan => "fan",
            Category::Art => "art",
        }
    }

    /// Position in `Category::ALL`.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Map a free-form external label onto a category.
    ///
    /// Matching is case-insensitive and substring based, checked in category
    /// order. Anything unrecognised maps to `Business`.
    pub fn from_label(label: &str) -> Category {
        let label = label.to_lowercase();
        let matches = |needles: &[&str]| needles.iter().any(|n| label.contains(n));

        if matches(&["business", "professional"]) {
            Category::Business
        } else if matches(&["social", "media"]) {
            Category::Social
        } else if matches(&["meme", "funny"]) {
            Category::Meme
        } else if matches(&["fan", "celebrity"]) {
            Category::Fan
        } else if matches(&["art", "painting"]) {
            Category::Art
        } else {
            Category::Business
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall tone of a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Interpret a sentiment model label such as `"positive"` or `"LABEL_2 negative"`.
    pub fn from_label(label: &str) -> Sentiment {
        let label = label.to_lowercase();
        if label.contains("positive") {
            Sentiment::Positive
        } else if label.contains("negative") {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Negative => write!(f, "negative"),
            Sentiment::Neutral => write!(f, "neutral"),
        }
    }
}

/// Content submitted for classification.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisRequest {
    /// Image references (URLs or data URIs). Only the first is analyzed.
    #[serde(default)]
    pub images: Vec<String>,
    pub text: Option<String>,
    pub title: Option<String>,
    /// Free-form hints from the card builder. Accepted but not scored.
    #[serde(rename = "userInput")]
    pub user_input: Option<serde_json::Value>,
}

impl AnalysisRequest {
    /// First non-empty image reference, if any.
    pub fn primary_image(&self) -> Option<&str> {
        self.images
            .first()
            .map(|s| s.as_str())
            .filter(|s| !s.trim().is_empty())
    }

    /// Text and title joined by a space, empty parts dropped.
    pub fn combined_text(&self) -> Option<String> {
        join_text(self.text.as_deref(), self.title.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.primary_image().is_none() && self.combined_text().is_none()
    }
}

/// Join optional text parts with a single space, skipping empty ones.
pub fn join_text(text: Option<&str>, title: Option<&str>) -> Option<String> {
    let parts: Vec<&str> = [text, title]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Normalized output of the image analyzer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageSignal {
    pub category: Category,
    pub confidence: f64,
    pub objects: Vec<String>,
    pub colors: Vec<String>,
    pub style: String,
    pub mood: String,
    #[serde(rename = "isAppropriate")]
    pub is_appropriate: bool,
    #[serde(rename = "suggestedTheme", skip_serializing_if = "Option::is_none")]
    pub suggested_theme: Option<String>,
}

impl ImageSignal {
    /// Clamp confidence and fill in the theme for the detected category.
    pub fn normalized(mut self) -> Self {
        self.confidence = clamp_confidence(self.confidence);
        if self.suggested_theme.is_none() {
            self.suggested_theme = Some(crate::lexicon::theme_for(self.category).to_string());
        }
        self
    }
}

/// Normalized output of the text analyzer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSignal {
    pub category: Category,
    pub confidence: f64,
    pub sentiment: Sentiment,
    pub topics: Vec<String>,
    #[serde(rename = "suggestedTags")]
    pub suggested_tags: Vec<String>,
    pub improvements: Vec<String>,
}

impl TextSignal {
    pub fn normalized(mut self) -> Self {
        self.confidence = clamp_confidence(self.confidence);
        self
    }
}

/// Keep a confidence inside [0, 1]; NaN becomes 0.
pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Suggested card settings derived from the winning category.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Suggestions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    pub improvements: Vec<String>,
}

/// Image signal summary echoed back with a recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageSummary {
    pub objects: Vec<String>,
    pub colors: Vec<String>,
    pub style: String,
    pub mood: String,
    pub quality: f64,
}

/// Text signal summary echoed back with a recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSummary {
    pub sentiment: Sentiment,
    pub topics: Vec<String>,
    pub language: String,
    pub readability: f64,
}

/// Final recommendation returned to the card builder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationResult {
    #[serde(rename = "suggestedCategory")]
    pub category: Category,
    pub confidence: f64,
    pub reasoning: String,
    pub suggestions: Suggestions,
    #[serde(rename = "imageAnalysis", skip_serializing_if = "Option::is_none")]
    pub image_analysis: Option<ImageSummary>,
    #[serde(rename = "textAnalysis", skip_serializing_if = "Option::is_none")]
    pub text_analysis: Option<TextSummary>,
}
