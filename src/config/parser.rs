use crate::client::ApiSettings;
use crate::config::types::Config;
use crate::config::validation::{validate, validate_token};
use crate::ConfigError;
use std::path::Path;
use std::time::Duration;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Resolves the API token: the file value wins, otherwise the environment
/// variable named by `token-env` is read.
pub fn resolve_api_token(config: &Config) -> Result<String, ConfigError> {
    resolve_token_with(config, |name| std::env::var(name).ok())
}

fn resolve_token_with<F>(config: &Config, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let token = match config.canvas.api_token.as_deref() {
        Some(token) if !token.trim().is_empty() => token.trim().to_string(),
        _ => lookup(&config.canvas.token_env)
            .map(|t| t.trim().to_string())
            .ok_or_else(|| {
                ConfigError::Validation(format!(
                    "no api-token in config and ${} is not set",
                    config.canvas.token_env
                ))
            })?,
    };

    validate_token(&token)?;
    Ok(token)
}

/// Builds the runtime API settings from a validated configuration
pub fn api_settings(config: &Config) -> Result<ApiSettings, ConfigError> {
    let token = resolve_api_token(config)?;
    settings_with_token(config, &token)
}

fn settings_with_token(config: &Config, token: &str) -> Result<ApiSettings, ConfigError> {
    Ok(ApiSettings::new(&config.canvas.base_url, token)?
        .with_page_size(config.fetch.page_size)
        .with_timeouts(
            Duration::from_secs(config.fetch.request_timeout_secs),
            Duration::from_secs(config.fetch.connect_timeout_secs),
        )
        .with_user_agent(config.user_agent.header_value()))
}
