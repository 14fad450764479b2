//! Configuration module for Canvas-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files,
//! and turning a validated configuration into the read-only [`ApiSettings`]
//! shared by every request.
//!
//! # Example
//!
//! ```no_run
//! use canvas_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("canvas.toml")).unwrap();
//! println!("Fetching from: {}", config.canvas.base_url);
//! ```
//!
//! [`ApiSettings`]: crate::client::ApiSettings

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CanvasConfig, Config, FetchConfig, UserAgentConfig, DEFAULT_TOKEN_ENV,
};

// Re-export parser functions
pub use parser::{api_settings, load_config, parse_config, resolve_api_token};

pub(crate) use validation::{validate_base_url, validate_token};
