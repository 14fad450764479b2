use crate::client::EndpointRequest;
use chrono::{Duration, NaiveDate};

/// A per-course resource the aggregator can fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseResource {
    /// `/api/v1/courses/{id}/assignments`
    Assignments,

    /// Announcement discussion topics posted on or after `since`
    Announcements { since: NaiveDate },

    /// Modules with their items and item content details expanded
    Modules,
}

impl CourseResource {
    /// Announcements from the last `days` days, counted back from `today`
    pub fn announcements_within(days: u32, today: NaiveDate) -> Self {
        let since = today
            .checked_sub_signed(Duration::days(i64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        CourseResource::Announcements { since }
    }

    /// Short name used in logs and diagnostics
    pub fn label(&self) -> &'static str {
        match self {
            CourseResource::Assignments => "assignments",
            CourseResource::Announcements { .. } => "announcements",
            CourseResource::Modules => "modules",
        }
    }

    /// The course-scoped endpoint request for this resource
    pub fn request(&self, course_id: &str) -> EndpointRequest {
        match self {
            CourseResource::Assignments => {
                EndpointRequest::new(format!("/api/v1/courses/{}/assignments", course_id))
            }
            CourseResource::Announcements { since } => {
                EndpointRequest::new(format!("/api/v1/courses/{}/discussion_topics", course_id))
                    .param("only_announcements", "true")
                    .param("start_date", since.format("%Y-%m-%d").to_string())
            }
            CourseResource::Modules => {
                EndpointRequest::new(format!("/api/v1/courses/{}/modules", course_id))
                    .param_many("include[]", ["items", "content_details"])
            }
        }
    }
}
