//! Course listing and course-id resolution

use crate::aggregate::context::{id_to_string, CourseContext, UNKNOWN_COURSE_NAME};
use crate::client::{ApiError, EndpointRequest, PageWalker};
use serde_json::Value;
use std::collections::HashMap;

/// Endpoint listing the authenticated user's courses
pub const COURSES_PATH: &str = "/api/v1/courses";

/// Lists the authenticated user's courses
///
/// Only active enrollments are listed unless `include_concluded` is set.
/// Courses without a name (placeholder shells) are dropped.
pub async fn list_courses(
    walker: &PageWalker,
    include_concluded: bool,
) -> Result<Vec<Value>, ApiError> {
    let mut request = EndpointRequest::new(COURSES_PATH);
    if !include_concluded {
        request = request.param("enrollment_state", "active");
    }

    let courses = walker.fetch_all(&request).await?;
    let total = courses.len();
    let named: Vec<Value> = courses.into_iter().filter(has_name).collect();

    if named.len() < total {
        tracing::debug!("Skipped {} unnamed course(s)", total - named.len());
    }

    Ok(named)
}

/// Resolves the course-id domain for an aggregation
///
/// * `None` - every active course, named from the same listing
/// * `Some(ids)` - exactly the given ids in the given order, named from a
///   listing that includes concluded courses; ids missing from that listing
///   are named [`UNKNOWN_COURSE_NAME`]
///
/// An empty explicit list resolves to no courses without any request.
pub async fn resolve_courses(
    walker: &PageWalker,
    course_ids: Option<&[String]>,
) -> Result<Vec<CourseContext>, ApiError> {
    match course_ids {
        None => {
            let courses = list_courses(walker, false).await?;
            Ok(courses.iter().filter_map(context_of).collect())
        }
        Some([]) => Ok(Vec::new()),
        Some(ids) => {
            let listing = list_courses(walker, true).await?;
            Ok(name_explicit_ids(ids, &listing))
        }
    }
}

/// Builds contexts for explicit ids from a course listing
fn name_explicit_ids(ids: &[String], listing: &[Value]) -> Vec<CourseContext> {
    let names: HashMap<String, String> = listing
        .iter()
        .filter_map(context_of)
        .filter(|course| ids.contains(&course.id))
        .map(|course| (course.id, course.name))
        .collect();

    ids.iter()
        .map(|id| {
            let name = names.get(id).map(String::as_str).unwrap_or_else(|| {
                tracing::debug!("Course {} not found in course listing", id);
                UNKNOWN_COURSE_NAME
            });
            CourseContext::new(id.clone(), name)
        })
        .collect()
}

fn has_name(course: &Value) -> bool {
    course
        .get("name")
        .and_then(Value::as_str)
        .is_some_and(|name| !name.trim().is_empty())
}

fn context_of(course: &Value) -> Option<CourseContext> {
    let id = id_to_string(course.get("id")?)?;
    let name = course.get("name").and_then(Value::as_str)?;
    Some(CourseContext::new(id, name))
}
