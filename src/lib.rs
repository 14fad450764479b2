//! Canvas-Harvest: course data ingestion for a Canvas LMS instance
//!
//! This crate walks the paginated Canvas REST API, fans requests out across
//! courses while isolating per-course failures, and normalizes the HTML-bearing
//! fields of the returned records into plain text and link lists.

pub mod aggregate;
pub mod client;
pub mod config;
pub mod models;
pub mod richtext;

use thiserror::Error;

/// Main error type for Canvas-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Api(#[from] client::ApiError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid Canvas URL: {0}")]
    InvalidUrl(String),
}

/// Errors raised while turning raw records into typed models
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("record is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("record is not a JSON object")]
    NotAnObject,
}

/// Result type alias for Canvas-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use aggregate::{AggregatedRecord, Aggregation, Aggregator, CourseContext, CourseResource};
pub use client::{ApiError, ApiSettings, CanvasClient, PageWalker};
pub use config::Config;
pub use richtext::{extract_links, extract_text, Link};
