//! Card content classification and recommendation.
//!
//! Suggests one of five card categories for uploaded images and/or text.
//! Each modality runs through an ordered chain of remote backends
//! (Hugging Face, then OpenAI) and ends at a deterministic local heuristic,
//! so an analysis always produces a signal. `RecommendationEngine` fuses the
//! image and text signals into a single `RecommendationResult`.

pub mod analyzer;
pub mod backends;
pub mod config;
pub mod engine;
pub mod fusion;
pub mod heuristics;
pub mod lexicon;
pub mod types;

pub use analyzer::{ImageAnalyzer, TextAnalyzer};
pub use config::BackendConfig;
pub use engine::RecommendationEngine;
pub use types::*;
