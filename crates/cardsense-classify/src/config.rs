//! Backend credential loading and chain resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_CLIP_MODEL: &str = "openai/clip-vit-base-patch32";
pub const DEFAULT_SENTIMENT_MODEL: &str = "cardiffnlp/twitter-roberta-base-sentiment-latest";
pub const DEFAULT_OPENAI_VISION_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_TEXT_MODEL: &str = "gpt-4o-mini";

/// Backend credentials and model choices (optionally stored in ai-config.json).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub huggingface_token: Option<String>,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default = "default_clip_model")]
    pub clip_model: String,
    #[serde(default = "default_sentiment_model")]
    pub sentiment_model: String,
    #[serde(default = "default_openai_vision_model")]
    pub openai_vision_model: String,
    #[serde(default = "default_openai_text_model")]
    pub openai_text_model: String,
}

fn default_clip_model() -> String {
    DEFAULT_CLIP_MODEL.into()
}
fn default_sentiment_model() -> String {
    DEFAULT_SENTIMENT_MODEL.into()
}
fn default_openai_vision_model() -> String {
    DEFAULT_OPENAI_VISION_MODEL.into()
}
fn default_openai_text_model() -> String {
    DEFAULT_OPENAI_TEXT_MODEL.into()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            huggingface_token: None,
            openai_api_key: None,
            clip_model: DEFAULT_CLIP_MODEL.into(),
            sentiment_model: DEFAULT_SENTIMENT_MODEL.into(),
            openai_vision_model: DEFAULT_OPENAI_VISION_MODEL.into(),
            openai_text_model: DEFAULT_OPENAI_TEXT_MODEL.into(),
        }
    }
}

/// Public view of the backend configuration (no secrets).
#[derive(Debug, Clone, Serialize)]
pub struct BackendConfigResponse {
    #[serde(rename = "huggingFaceConfigured")]
    pub huggingface_configured: bool,
    #[serde(rename = "openaiConfigured")]
    pub openai_configured: bool,
    #[serde(rename = "clipModel")]
    pub clip_model: String,
    #[serde(rename = "sentimentModel")]
    pub sentiment_model: String,
    #[serde(rename = "openaiVisionModel")]
    pub openai_vision_model: String,
    #[serde(rename = "openaiTextModel")]
    pub openai_text_model: String,
}

impl BackendConfig {
    /// Load config from file, falling back to env vars and defaults.
    ///
    /// A missing file is normal; an unreadable one is logged and ignored.
    pub fn load(config_path: &Path) -> Self {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// Same as `load`, with an explicit environment source.
    pub fn load_with<F>(config_path: &Path, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: BackendConfig = match std::fs::read_to_string(config_path) {
            Ok(raw) => BackendConfig::parse(&raw).unwrap_or_else(|e| {
                warn!("Ignoring malformed {}: {}", config_path.display(), e);
                BackendConfig::default()
            }),
            Err(_) => {
                debug!("No backend config at {}", config_path.display());
                BackendConfig::default()
            }
        };

        config.huggingface_token = non_empty(config.huggingface_token);
        config.openai_api_key = non_empty(config.openai_api_key);

        // Env vars as fallback for credentials
        if config.huggingface_token.is_none() {
            config.huggingface_token = non_empty(env("HUGGING_FACE_TOKEN"));
        }
        if config.openai_api_key.is_none() {
            config.openai_api_key = non_empty(env("OPENAI_API_KEY"));
        }

        config
    }

    /// Parse the contents of ai-config.json.
    pub fn parse(raw: &str) -> cardsense_core::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn has_huggingface(&self) -> bool {
        self.huggingface_token.is_some()
    }

    pub fn has_openai(&self) -> bool {
        self.openai_api_key.is_some()
    }

    /// Build the public config response (no credentials exposed).
    pub fn to_response(&self) -> BackendConfigResponse {
        BackendConfigResponse {
            huggingface_configured: self.has_huggingface(),
            openai_configured: self.has_openai(),
            clip_model: self.clip_model.clone(),
            sentiment_model: self.sentiment_model.clone(),
            openai_vision_model: self.openai_vision_model.clone(),
            openai_text_model: self.openai_text_model.clone(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = BackendConfig::load_with(&dir.path().join("ai-config.json"), no_env);
        assert!(!config.has_huggingface());
        assert!(!config.has_openai());
        assert_eq!(config.clip_model, DEFAULT_CLIP_MODEL);
    }

    #[test]
    fn test_file_values_take_precedence_over_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ai-config.json");
        std::fs::write(
            &path,
            r#"{"huggingface_token": "hf_file", "openai_text_model": "gpt-4o"}"#,
        )
        .unwrap();

        let config = BackendConfig::load_with(&path, |key| match key {
            "HUGGING_FACE_TOKEN" => Some("hf_env".into()),
            "OPENAI_API_KEY" => Some("sk-env".into()),
            _ => None,
        });
        assert_eq!(config.huggingface_token.as_deref(), Some("hf_file"));
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.openai_text_model, "gpt-4o");
        assert_eq!(config.sentiment_model, DEFAULT_SENTIMENT_MODEL);
    }

    #[test]
    fn test_blank_credentials_are_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ai-config.json");
        std::fs::write(&path, r#"{"openai_api_key": "  "}"#).unwrap();

        let config = BackendConfig::load_with(&path, |key| match key {
            "HUGGING_FACE_TOKEN" => Some(String::new()),
            _ => None,
        });
        assert!(!config.has_openai());
        assert!(!config.has_huggingface());
    }

    #[test]
    fn test_parse_reports_json_error() {
        let err = BackendConfig::parse("{not json").unwrap_err();
        assert!(matches!(err, cardsense_core::Error::Json(_)));
        assert!(err.to_string().starts_with("JSON error"));

        let config = BackendConfig::parse(r#"{"openai_api_key": "sk-file"}"#).unwrap();
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-file"));
        assert_eq!(config.clip_model, DEFAULT_CLIP_MODEL);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ai-config.json");
        std::fs::write(&path, "{not json").unwrap();

        let config = BackendConfig::load_with(&path, |key| {
            (key == "OPENAI_API_KEY").then(|| "sk-test".to_string())
        });
        assert!(config.has_openai());
        assert_eq!(config.openai_vision_model, DEFAULT_OPENAI_VISION_MODEL);
    }

    #[test]
    fn test_response_hides_keys() {
        let config = BackendConfig {
            openai_api_key: Some("sk-secret".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(config.to_response()).unwrap();
        assert_eq!(json["openaiConfigured"], true);
        assert_eq!(json["huggingFaceConfigured"], false);
        assert!(!json.to_string().contains("sk-secret"));
    }
}
