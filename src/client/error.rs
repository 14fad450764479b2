//! Typed failures surfaced by the page walker
//!
//! | Condition | Failure |
//! |-----------|---------|
//! | HTTP 401 | `Authentication` |
//! | HTTP 429 | `RateLimited` |
//! | HTTP 403 | `Forbidden` |
//! | Any other non-2xx | `Api` with status and body excerpt |
//! | Timeout / connection / decode error | `Api` without status |

use reqwest::StatusCode;
use thiserror::Error;

/// Longest body excerpt carried in an `Api` failure, in characters
const BODY_EXCERPT_CHARS: usize = 200;

/// Closed set of failures a Canvas request can produce
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Bad or expired credential; identical for every request made with it
    #[error("{0}")]
    Authentication(String),

    /// Remote throttling
    #[error("{0}")]
    RateLimited(String),

    /// The credential lacks permission for this endpoint
    #[error("{0}")]
    Forbidden(String),

    /// Any other non-success status or transport error
    #[error("{message}")]
    Api {
        status: Option<u16>,
        message: String,
    },
}

impl ApiError {
    /// Returns true for the failure that invalidates every remaining request
    pub fn is_authentication(&self) -> bool {
        matches!(self, ApiError::Authentication(_))
    }

    /// HTTP status associated with the failure, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Authentication(_) => Some(401),
            ApiError::RateLimited(_) => Some(429),
            ApiError::Forbidden(_) => Some(403),
            ApiError::Api { status, .. } => *status,
        }
    }

    /// Classifies a transport-level failure (no usable response)
    pub(crate) fn transport(url: &str, err: &reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("Canvas API request timed out: {}", url)
        } else if err.is_connect() {
            format!("Could not connect to Canvas at {}: {}", url, err)
        } else {
            format!("Canvas API request failed: {}", err)
        };

        ApiError::Api {
            status: None,
            message,
        }
    }
}

/// Maps a response status to a typed failure
///
/// Returns `None` for success statuses.
pub fn classify_status(status: StatusCode, body: &str) -> Option<ApiError> {
    if status.is_success() {
        return None;
    }

    let failure = match status {
        StatusCode::UNAUTHORIZED => ApiError::Authentication(
            "Invalid Canvas API token. Please check your token and try again.".to_string(),
        ),
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited(
            "Canvas API rate limit exceeded. Please wait and try again.".to_string(),
        ),
        StatusCode::FORBIDDEN => ApiError::Forbidden(
            "Access forbidden. Check that your API token has the required permissions."
                .to_string(),
        ),
        other => {
            let excerpt = body_excerpt(body);
            let message = if excerpt.is_empty() {
                format!("Canvas API returned HTTP {}", other.as_u16())
            } else {
                format!("Canvas API returned HTTP {}: {}", other.as_u16(), excerpt)
            };
            ApiError::Api {
                status: Some(other.as_u16()),
                message,
            }
        }
    };

    Some(failure)
}

/// Trims a response body to a short single-line excerpt
pub(crate) fn body_excerpt(body: &str) -> String {
    let flat = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= BODY_EXCERPT_CHARS {
        return flat;
    }
    let mut excerpt: String = flat.chars().take(BODY_EXCERPT_CHARS).collect();
    excerpt.push('…');
    excerpt
}
