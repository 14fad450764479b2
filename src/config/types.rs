use serde::Deserialize;
use std::fmt;

/// Environment variable consulted when no token is written in the config file
pub const DEFAULT_TOKEN_ENV: &str = "CANVAS_API_TOKEN";

/// Main configuration structure for Canvas-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// Canvas instance and credential
#[derive(Clone, Deserialize)]
pub struct CanvasConfig {
    /// Canvas instance URL (e.g., "https://school.instructure.com")
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// API access token; when absent the token is read from `token-env`
    #[serde(rename = "api-token", default)]
    pub api_token: Option<String>,

    /// Name of the environment variable holding the API token
    #[serde(rename = "token-env", default = "default_token_env")]
    pub token_env: String,
}

// The token must never end up in logs.
impl fmt::Debug for CanvasConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("token_env", &self.token_env)
            .finish()
    }
}

/// Request behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Records requested per page (`per_page`)
    #[serde(rename = "page-size", default = "default_page_size")]
    pub page_size: u32,

    /// Deadline for a single request, in seconds
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Deadline for establishing a connection, in seconds
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// How far back announcements are fetched, in days
    #[serde(rename = "announcement-days", default = "default_announcement_days")]
    pub announcement_days: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            announcement_days: default_announcement_days(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(rename = "client-name", default = "default_client_name")]
    pub client_name: String,

    #[serde(rename = "client-version", default = "default_client_version")]
    pub client_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            client_name: default_client_name(),
            client_version: default_client_version(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version`
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.client_name, self.client_version)
    }
}

fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

fn default_page_size() -> u32 {
    crate::client::DEFAULT_PAGE_SIZE
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_announcement_days() -> u32 {
    30
}

fn default_client_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_client_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
