//! Multi-course aggregation
//!
//! This module fans one resource request out across many courses:
//! - Resolving the course-id domain (explicit ids or every active course)
//! - Fetching each course's records through the page walker, one course at a time
//! - Tagging every record with its course context
//! - Isolating per-course failures, except authentication failures which abort

mod aggregator;
mod context;
mod courses;
mod resource;

pub use aggregator::{Aggregation, Aggregator, CourseDiagnostic};
pub use context::{
    AggregatedRecord, CourseContext, COURSE_ID_FIELD, COURSE_NAME_FIELD, UNKNOWN_COURSE_NAME,
};
pub use courses::{list_courses, resolve_courses, COURSES_PATH};
pub use resource::CourseResource;

pub(crate) use context::id_to_string;
