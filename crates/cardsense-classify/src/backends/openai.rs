//! OpenAI chat-completion backends (vision and text).
//!
//! Both ask the model for a JSON object and parse it; a reply that carries no
//! category is treated as a failed call.

use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use cardsense_core::{Error, Result};

use super::{parse_json_reply, post_json, string_list, ImageBackend, TextBackend};
use crate::heuristics;
use crate::types::{Category, ImageSignal, Sentiment, TextSignal};

pub const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

const VISION_PROMPT: &str = "Analyze this image and categorize it as one of: business, social, meme, fan, art. \
Reply with only a JSON object with keys: category (string), confidence (number 0-1), \
objects (array of strings), colors (array of strings), style (string), mood (string), \
appropriate (boolean).";

const TEXT_PROMPT: &str = "Analyze this card text and categorize it as one of: business, social, meme, fan, art. \
Reply with only a JSON object with keys: category (string), confidence (number 0-1), \
sentiment (positive, negative or neutral), topics (array of strings), tags (array of strings).";

/// GPT vision model reading the image URL directly.
pub struct OpenAIVision {
    client: Client,
    api_key: Option<String>,
    model: String,
}

impl OpenAIVision {
    pub fn new(client: Client, api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            api_key,
            model: model.into(),
        }
    }

    async fn describe(&self, image_ref: &str) -> Result<ImageSignal> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Config("OpenAI API key not configured".into()))?;
        let body = json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": VISION_PROMPT },
                    { "type": "image_url", "image_url": { "url": image_ref } },
                ],
            }],
            "max_tokens": 300,
        });

        debug!("Describing image with {}", self.model);
        let response = post_json(&self.client, OPENAI_CHAT_URL, api_key, &body).await?;
        parse_vision_reply(&message_content(&response)?)
    }
}

impl ImageBackend for OpenAIVision {
    fn name(&self) -> &'static str {
        "openai-vision"
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    fn analyze<'a>(&'a self, image_ref: &'a str) -> BoxFuture<'a, Result<ImageSignal>> {
        self.describe(image_ref).boxed()
    }
}

/// GPT text model.
pub struct OpenAIText {
    client: Client,
    api_key: Option<String>,
    model: String,
}

impl OpenAIText {
    pub fn new(client: Client, api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            api_key,
            model: model.into(),
        }
    }

    async fn categorize(&self, text: &str) -> Result<TextSignal> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Config("OpenAI API key not configured".into()))?;
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": TEXT_PROMPT },
                { "role": "user", "content": text },
            ],
            "max_tokens": 200,
        });

        debug!("Categorizing text with {}", self.model);
        let response = post_json(&self.client, OPENAI_CHAT_URL, api_key, &body).await?;
        parse_text_reply(&message_content(&response)?, text)
    }
}

impl TextBackend for OpenAIText {
    fn name(&self) -> &'static str {
        "openai-text"
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    fn analyze<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<TextSignal>> {
        self.categorize(text).boxed()
    }
}

fn message_content(response: &Value) -> Result<String> {
    response["choices"][0]["message"]["content"]
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(String::from)
        .ok_or_else(|| Error::Backend("Completion has no message content".into()))
}

fn reply_category(reply: &Value) -> Result<Category> {
    reply
        .get("category")
        .and_then(Value::as_str)
        .map(Category::from_label)
        .ok_or_else(|| Error::Backend("Reply has no category".into()))
}

fn parse_vision_reply(content: &str) -> Result<ImageSignal> {
    let reply = parse_json_reply(content)?;
    let category = reply_category(&reply)?;
    let text_field = |key: &str, default: &str| {
        reply
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    };

    Ok(ImageSignal {
        category,
        confidence: reply.get("confidence").and_then(Value::as_f64).unwrap_or(0.5),
        objects: reply
            .get("objects")
            .and_then(string_list)
            .unwrap_or_else(|| vec!["unknown".to_string()]),
        colors: reply
            .get("colors")
            .and_then(string_list)
            .unwrap_or_else(|| vec!["unknown".to_string()]),
        style: text_field("style", "unknown"),
        mood: text_field("mood", "neutral"),
        is_appropriate: reply
            .get("appropriate")
            .and_then(Value::as_bool)
            .unwrap_or(true),
        suggested_theme: None,
    }
    .normalized())
}

fn parse_text_reply(content: &str, text: &str) -> Result<TextSignal> {
    let reply = parse_json_reply(content)?;
    let category = reply_category(&reply)?;

    Ok(TextSignal {
        category,
        confidence: reply.get("confidence").and_then(Value::as_f64).unwrap_or(0.5),
        sentiment: reply
            .get("sentiment")
            .and_then(Value::as_str)
            .map(Sentiment::from_label)
            .unwrap_or(Sentiment::Neutral),
        topics: reply
            .get("topics")
            .and_then(string_list)
            .unwrap_or_else(|| heuristics::extract_topics(text)),
        suggested_tags: reply
            .get("tags")
            .and_then(string_list)
            .unwrap_or_else(|| heuristics::extract_tags(text)),
        improvements: heuristics::generate_improvements(text),
    }
    .normalized())
}
