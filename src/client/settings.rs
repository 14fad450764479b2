//! Read-only API settings and HTTP client construction

use crate::config::{validate_base_url, validate_token};
use crate::ConfigError;
use reqwest::Client;
use std::fmt;
use std::time::Duration;

/// Page size requested when the caller does not supply one
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Largest page size Canvas honours
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query parameter carrying the page size
pub const PAGE_SIZE_PARAM: &str = "per_page";

/// Connection settings shared by every request
///
/// Built once from configuration and never mutated afterwards; the walker
/// holds it behind an `Arc`.
#[derive(Clone)]
pub struct ApiSettings {
    base_url: String,
    token: String,
    page_size: u32,
    request_timeout: Duration,
    connect_timeout: Duration,
    user_agent: String,
}

impl ApiSettings {
    /// Creates settings for a Canvas instance
    ///
    /// The base URL must be an `http`/`https` URL; a trailing slash is
    /// removed. The token must be non-empty.
    ///
    /// # Example
    ///
    /// ```
    /// use canvas_harvest::client::ApiSettings;
    ///
    /// let settings = ApiSettings::new("https://school.instructure.com/", "token").unwrap();
    /// assert_eq!(settings.base_url(), "https://school.instructure.com");
    /// ```
    pub fn new(base_url: &str, token: &str) -> Result<Self, ConfigError> {
        let base_url = validate_base_url(base_url)?;
        validate_token(token)?;

        Ok(Self {
            base_url,
            token: token.trim().to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        })
    }

    /// Sets the default page size, clamped to `1..=MAX_PAGE_SIZE`
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn with_timeouts(mut self, request: Duration, connect: Duration) -> Self {
        self.request_timeout = request;
        self.connect_timeout = connect;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Joins an API path (e.g. `/api/v1/courses`) onto the base URL
    pub fn endpoint_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiSettings")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("page_size", &self.page_size)
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `settings` - The API settings (user agent and deadlines)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(settings: &ApiSettings) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(settings.user_agent())
        .timeout(settings.request_timeout())
        .connect_timeout(settings.connect_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}
