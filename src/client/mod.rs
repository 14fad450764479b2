//! Canvas REST client
//!
//! This module contains the HTTP side of ingestion, including:
//! - Read-only API settings and HTTP client construction
//! - Endpoint requests with page-size handling
//! - Continuation-link discovery
//! - Response status classification into typed failures
//! - The pagination-following page walker

mod error;
mod pagination;
mod request;
mod settings;
mod walker;

pub use error::{classify_status, ApiError};
pub use pagination::{next_link, parse_next_link};
pub use request::{EndpointRequest, QueryParams};
pub use settings::{
    build_http_client, ApiSettings, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PAGE_SIZE_PARAM,
};
pub use walker::PageWalker;

use crate::aggregate::{list_courses, Aggregation, Aggregator, CourseResource};
use crate::HarvestError;
use chrono::NaiveDate;
use serde_json::Value;

/// Endpoint describing the authenticated user
pub const CURRENT_USER_PATH: &str = "/api/v1/users/self";

/// High-level Canvas client
///
/// Wraps a [`PageWalker`] and exposes the operations the rest of the
/// application uses: a credential check, course listing, and the per-resource
/// aggregations.
#[derive(Debug, Clone)]
pub struct CanvasClient {
    walker: PageWalker,
}

impl CanvasClient {
    /// Creates a client for the given settings
    ///
    /// # Example
    ///
    /// ```no_run
    /// use canvas_harvest::client::{ApiSettings, CanvasClient};
    ///
    /// # async fn run() -> canvas_harvest::Result<()> {
    /// let settings = ApiSettings::new("https://school.instructure.com", "token")?;
    /// let client = CanvasClient::new(settings)?;
    /// let courses = client.list_courses(false).await?;
    /// println!("{} active courses", courses.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(settings: ApiSettings) -> Result<Self, HarvestError> {
        Ok(Self::from_walker(PageWalker::new(settings)?))
    }

    pub fn from_walker(walker: PageWalker) -> Self {
        Self { walker }
    }

    pub fn walker(&self) -> &PageWalker {
        &self.walker
    }

    pub fn aggregator(&self) -> Aggregator<'_> {
        Aggregator::new(&self.walker)
    }

    /// Checks the credential by fetching the current user's profile
    pub async fn verify_credentials(&self) -> Result<Value, ApiError> {
        let request = EndpointRequest::new(CURRENT_USER_PATH);
        self.walker
            .fetch_all(&request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Api {
                status: None,
                message: "Canvas returned no profile for the current user".to_string(),
            })
    }

    /// Lists the user's named courses; see [`list_courses`]
    pub async fn list_courses(&self, include_concluded: bool) -> Result<Vec<Value>, ApiError> {
        list_courses(&self.walker, include_concluded).await
    }

    /// Fetches one resource for a single course, untagged
    pub async fn course_records(
        &self,
        resource: &CourseResource,
        course_id: &str,
    ) -> Result<Vec<Value>, ApiError> {
        self.walker.fetch_all(&resource.request(course_id)).await
    }

    pub async fn all_assignments(
        &self,
        course_ids: Option<&[String]>,
    ) -> Result<Aggregation, ApiError> {
        self.aggregator()
            .collect(&CourseResource::Assignments, course_ids)
            .await
    }

    pub async fn all_announcements(
        &self,
        course_ids: Option<&[String]>,
        since: NaiveDate,
    ) -> Result<Aggregation, ApiError> {
        self.aggregator()
            .collect(&CourseResource::Announcements { since }, course_ids)
            .await
    }

    pub async fn all_modules(&self, course_ids: Option<&[String]>) -> Result<Aggregation, ApiError> {
        self.aggregator()
            .collect(&CourseResource::Modules, course_ids)
            .await
    }
}
