//! CardSense Core — shared error type and service configuration.

pub mod config;
pub mod error;

pub use config::CardSenseConfig;
pub use error::{Error, Result};
