//! Course fan-out with per-course failure isolation
//!
//! Courses are processed strictly one after another; a course's fetch,
//! including all of its pages, completes before the next course starts.
//!
//! | Failure in a course fetch | Action |
//! |---------------------------|--------|
//! | `Authentication` | Abort the whole aggregation, propagate |
//! | `RateLimited` / `Forbidden` / `Api` | Record a diagnostic, continue |

use crate::aggregate::context::{AggregatedRecord, CourseContext};
use crate::aggregate::courses::resolve_courses;
use crate::aggregate::resource::CourseResource;
use crate::client::{ApiError, PageWalker};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;

/// A course whose fetch failed without aborting the aggregation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseDiagnostic {
    pub course_id: String,
    pub course_name: String,
    pub resource: &'static str,
    pub message: String,
}

/// Result of one aggregation call
///
/// Records are ordered by course iteration order, then by arrival order
/// within the course.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub records: Vec<AggregatedRecord>,
    pub diagnostics: Vec<CourseDiagnostic>,
}

impl Aggregation {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Flattens every record into a JSON object with course fields injected
    pub fn into_values(self) -> Vec<Value> {
        self.records
            .into_iter()
            .map(AggregatedRecord::into_value)
            .collect()
    }
}

/// Fans a resource request out across courses
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    walker: &'a PageWalker,
}

impl<'a> Aggregator<'a> {
    pub fn new(walker: &'a PageWalker) -> Self {
        Self { walker }
    }

    /// Fetches one resource for every resolved course
    ///
    /// # Arguments
    ///
    /// * `resource` - Which per-course endpoint to walk
    /// * `course_ids` - Explicit course ids, or `None` for every active course
    ///
    /// # Returns
    ///
    /// * `Ok(Aggregation)` - Tagged records plus one diagnostic per failed course
    /// * `Err(ApiError)` - Course resolution failed, or any course hit an
    ///   authentication failure
    pub async fn collect(
        &self,
        resource: &CourseResource,
        course_ids: Option<&[String]>,
    ) -> Result<Aggregation, ApiError> {
        let courses = resolve_courses(self.walker, course_ids).await?;
        self.collect_for(resource, &courses).await
    }

    /// Fetches one resource for already-resolved courses
    pub async fn collect_for(
        &self,
        resource: &CourseResource,
        courses: &[CourseContext],
    ) -> Result<Aggregation, ApiError> {
        let walker = self.walker;
        self.collect_with(resource.label(), courses, |course| {
            let request = resource.request(&course.id);
            async move { walker.fetch_all(&request).await }
        })
        .await
    }

    /// Runs an arbitrary per-course fetch operation under the isolation policy
    ///
    /// `fetch` is called once per course, in order, and awaited before the
    /// next course is started.
    pub async fn collect_with<F, Fut>(
        &self,
        label: &'static str,
        courses: &[CourseContext],
        mut fetch: F,
    ) -> Result<Aggregation, ApiError>
    where
        F: FnMut(&CourseContext) -> Fut,
        Fut: Future<Output = Result<Vec<Value>, ApiError>>,
    {
        let mut aggregation = Aggregation::default();

        for course in courses {
            match fetch(course).await {
                Ok(records) => {
                    tracing::debug!(
                        "Course {} ({}): {} {} record(s)",
                        course.id,
                        course.name,
                        records.len(),
                        label
                    );
                    aggregation.records.extend(
                        records
                            .into_iter()
                            .map(|payload| AggregatedRecord::new(course.clone(), payload)),
                    );
                }
                Err(err) if err.is_authentication() => {
                    tracing::error!(
                        "Authentication failed while fetching {} for course {}; aborting",
                        label,
                        course.id
                    );
                    return Err(err);
                }
                Err(err) => {
                    tracing::warn!(
                        "Could not fetch {} from course {}: {}",
                        label,
                        course.id,
                        err
                    );
                    aggregation.diagnostics.push(CourseDiagnostic {
                        course_id: course.id.clone(),
                        course_name: course.name.clone(),
                        resource: label,
                        message: err.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Collected {} {} record(s) from {} course(s), {} failed",
            aggregation.records.len(),
            label,
            courses.len(),
            aggregation.diagnostics.len()
        );

        Ok(aggregation)
    }
}
