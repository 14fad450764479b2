use crate::client_for;
use canvas_harvest::aggregate::UNKNOWN_COURSE_NAME;
use canvas_harvest::client::ApiError;
use canvas_harvest::models::{normalize, Announcement, Assignment};
use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_course_listing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/courses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Course One"},
            {"id": 2, "name": "Course Two"}
        ])))
        .mount(server)
        .await;
}

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_rate_limited_course_does_not_stop_others() {
    let server = MockServer::start().await;
    mount_course_listing(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/courses/1/assignments"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Rate Limit Exceeded"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/courses/2/assignments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 10, "name": "Essay"},
            {"id": 11, "name": "Quiz"},
            {"id": 12, "name": "Project"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let aggregation = client_for(&server)
        .all_assignments(Some(ids(&["1", "2"]).as_slice()))
        .await
        .unwrap();

    assert_eq!(aggregation.records.len(), 3);
    assert!(aggregation
        .records
        .iter()
        .all(|r| r.course_id() == "2" && r.course_name() == "Course Two"));
    assert_eq!(aggregation.diagnostics.len(), 1);
    assert_eq!(aggregation.diagnostics[0].course_id, "1");

    let assignments = normalize(&aggregation.records, Assignment::from_record);
    let names: Vec<&str> = assignments.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Essay", "Quiz", "Project"]);
}

#[tokio::test]
async fn test_authentication_failure_aborts_aggregation() {
    let server = MockServer::start().await;
    mount_course_listing(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/courses/1/modules"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/courses/2/modules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .all_modules(Some(ids(&["1", "2"]).as_slice()))
        .await;

    assert!(matches!(result, Err(ApiError::Authentication(_))));
}

#[tokio::test]
async fn test_unlisted_course_gets_placeholder_name() {
    let server = MockServer::start().await;
    mount_course_listing(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/courses/99/assignments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 5}])))
        .mount(&server)
        .await;

    let aggregation = client_for(&server)
        .all_assignments(Some(ids(&["99"]).as_slice()))
        .await
        .unwrap();

    assert_eq!(aggregation.records.len(), 1);
    assert_eq!(aggregation.records[0].course_name(), UNKNOWN_COURSE_NAME);

    let value = aggregation.into_values().remove(0);
    assert_eq!(value["_course_id"], "99");
    assert_eq!(value["_course_name"], "Unknown Course");
}

#[tokio::test]
async fn test_default_scope_is_active_named_courses() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/courses"))
        .and(query_param("enrollment_state", "active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 5, "name": "Biology"},
            {"id": 6, "name": "Chemistry"},
            {"id": 7}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    for id in [5, 6] {
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/courses/{}/assignments", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": id * 100}])))
            .expect(1)
            .mount(&server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/api/v1/courses/7/assignments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let aggregation = client_for(&server).all_assignments(None).await.unwrap();

    let tagged: Vec<(&str, &str)> = aggregation
        .records
        .iter()
        .map(|r| (r.course_id(), r.course_name()))
        .collect();
    assert_eq!(tagged, vec![("5", "Biology"), ("6", "Chemistry")]);
    assert!(aggregation.diagnostics.is_empty());
}

#[tokio::test]
async fn test_empty_course_list_makes_no_requests() {
    let server = MockServer::start().await;

    let no_courses: Vec<String> = Vec::new();
    let aggregation = client_for(&server)
        .all_assignments(Some(no_courses.as_slice()))
        .await
        .unwrap();

    assert!(aggregation.is_empty());
    assert!(aggregation.diagnostics.is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_announcements_request_window() {
    let server = MockServer::start().await;
    mount_course_listing(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/courses/1/discussion_topics"))
        .and(query_param("only_announcements", "true"))
        .and(query_param("start_date", "2026-01-15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 3, "title": "Welcome", "message": "<p>Hello <a href=\"/files/1\">syllabus</a></p>"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let since = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
    let aggregation = client_for(&server)
        .all_announcements(Some(ids(&["1"]).as_slice()), since)
        .await
        .unwrap();

    let announcements = normalize(&aggregation.records, Announcement::from_record);
    assert_eq!(announcements.len(), 1);
    assert_eq!(announcements[0].course_name, "Course One");
    assert_eq!(announcements[0].message_text.as_deref(), Some("Hello syllabus"));
    assert_eq!(announcements[0].embedded_links[0].url, "/files/1");
}
