//! Remote analysis backends.
//!
//! Each backend is gated on a credential (`is_available`) and either returns
//! a signal or an error. Errors never escape an analyzer: the analyzer logs
//! them and moves on to the next backend in its chain.

pub mod huggingface;
pub mod openai;

use futures::future::BoxFuture;
use reqwest::Client;
use serde_json::Value;

use cardsense_core::{Error, Result};

use crate::types::{ImageSignal, TextSignal};

pub use huggingface::{HuggingFaceClip, HuggingFaceSentiment};
pub use openai::{OpenAIText, OpenAIVision};

/// A backend that can classify a single image reference.
pub trait ImageBackend: Send + Sync {
    /// Short identifier used in logs and the capability document.
    fn name(&self) -> &'static str;

    /// Whether the required credential is configured.
    fn is_available(&self) -> bool;

    fn analyze<'a>(&'a self, image_ref: &'a str) -> BoxFuture<'a, Result<ImageSignal>>;
}

/// A backend that can classify free text.
pub trait TextBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_available(&self) -> bool;

    fn analyze<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<TextSignal>>;
}

/// POST a JSON body with a bearer token and decode the JSON reply.
pub(crate) async fn post_json(client: &Client, url: &str, token: &str, body: &Value) -> Result<Value> {
    let response = client
        .post(url)
        .header("Authorization", format!("Bearer {}", token))
        .header("Content-Type", "application/json")
        .json(body)
        .send()
        .await
        .map_err(|e| Error::Http(format!("Request to {} failed: {}", url, e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Http(format!("API error {}: {}", status, body)));
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| Error::Backend(format!("Failed to decode response: {}", e)))
}

/// Extract a JSON object from an LLM reply, tolerating markdown fences and
/// surrounding prose.
pub(crate) fn parse_json_reply(text: &str) -> Result<Value> {
    let trimmed = text.trim();
    let unfenced = if trimmed.starts_with("```") {
        trimmed
            .lines()
            .skip(1)
            .take_while(|l| !l.starts_with("```"))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        trimmed.to_string()
    };

    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(&unfenced) {
        return Ok(value);
    }

    // Fall back to the outermost brace pair
    match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(start), Some(end)) if start < end => {
            serde_json::from_str::<Value>(&unfenced[start..=end])
                .ok()
                .filter(Value::is_object)
                .ok_or_else(|| Error::Backend("Reply contains no valid JSON object".into()))
        }
        _ => Err(Error::Backend("Reply contains no JSON object".into())),
    }
}

/// Collect a JSON array of strings, dropping non-string entries.
pub(crate) fn string_list(value: &Value) -> Option<Vec<String>> {
    let list: Vec<String> = value
        .as_array()?
        .iter()
        .filter_map(|v| v.as_str().map(String::from))
        .collect();
    if list.is_empty() {
        None
    } else {
        Some(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let v = parse_json_reply(r#"{"category": "meme"}"#).unwrap();
        assert_eq!(v["category"], "meme");
    }

    #[test]
    fn test_parse_fenced_json() {
        let reply = "```json\n{\"category\": \"art\", \"confidence\": 0.8}\n```";
        let v = parse_json_reply(reply).unwrap();
        assert_eq!(v["category"], "art");
    }

    #[test]
    fn test_parse_json_with_prose() {
        let reply = "Sure! Here is the analysis: {\"category\": \"fan\"} Hope this helps.";
        let v = parse_json_reply(reply).unwrap();
        assert_eq!(v["category"], "fan");
    }

    #[test]
    fn test_parse_rejects_prose() {
        assert!(parse_json_reply("This looks like a business card.").is_err());
        assert!(parse_json_reply("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_string_list() {
        let v = serde_json::json!(["a", 1, "b"]);
        assert_eq!(string_list(&v), Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(string_list(&serde_json::json!([])), None);
        assert_eq!(string_list(&serde_json::json!("a")), None);
    }
}
