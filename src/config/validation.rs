use crate::client::MAX_PAGE_SIZE;
use crate::config::types::{Config, FetchConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
///
/// The API token is checked separately when it is resolved, since it may
/// come from the environment rather than the file.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_base_url(&config.canvas.base_url)?;
    validate_fetch_config(&config.fetch)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates a Canvas base URL and returns it without a trailing slash
///
/// Plain `http` is accepted so a local Canvas instance can be used during
/// development.
pub(crate) fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Validation(
            "base_url must be a non-empty string".to_string(),
        ));
    }

    let url = Url::parse(trimmed)
        .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", trimmed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Canvas URL must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!(
            "'{}' has no host",
            trimmed
        )));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Validates an API token
pub(crate) fn validate_token(token: &str) -> Result<(), ConfigError> {
    if token.trim().is_empty() {
        return Err(ConfigError::Validation(
            "api_token must be a non-empty string".to_string(),
        ));
    }
    Ok(())
}

/// Validates request behavior configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.page_size < 1 || config.page_size > MAX_PAGE_SIZE {
        return Err(ConfigError::Validation(format!(
            "page_size must be between 1 and {}, got {}",
            MAX_PAGE_SIZE, config.page_size
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.announcement_days < 1 {
        return Err(ConfigError::Validation(
            "announcement_days must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.client_name.is_empty() {
        return Err(ConfigError::Validation(
            "client_name cannot be empty".to_string(),
        ));
    }

    if !config
        .client_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "client_name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.client_name
        )));
    }

    Ok(())
}
