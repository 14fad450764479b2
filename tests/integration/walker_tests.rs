use crate::{client_for, walker_for};
use canvas_harvest::client::{ApiError, EndpointRequest};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ASSIGNMENTS: &str = "/api/v1/courses/1/assignments";

fn next_header(server: &MockServer, query: &str) -> String {
    format!(
        r#"<{}{}?{}>; rel="next", <{}{}?page=1&per_page=100>; rel="first""#,
        server.uri(),
        ASSIGNMENTS,
        query,
        server.uri(),
        ASSIGNMENTS
    )
}

#[tokio::test]
async fn test_follows_next_links_across_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ASSIGNMENTS))
        .and(query_param("per_page", "100"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Link", next_header(&server, "page=2&per_page=50").as_str())
                .set_body_json(json!([{"id": 1}, {"id": 2}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(ASSIGNMENTS))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "50"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Link", next_header(&server, "page=3&per_page=50").as_str())
                .set_body_json(json!([{"id": 3}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(ASSIGNMENTS))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 4}])))
        .expect(1)
        .mount(&server)
        .await;

    let records = walker_for(&server)
        .fetch_all(&EndpointRequest::new(ASSIGNMENTS))
        .await
        .unwrap();

    let ids: Vec<i64> = records.iter().filter_map(|r| r["id"].as_i64()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_sends_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ASSIGNMENTS))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .expect(1)
        .mount(&server)
        .await;

    let records = walker_for(&server)
        .fetch_all(&EndpointRequest::new(ASSIGNMENTS))
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_caller_params_sent_on_first_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/courses/1/modules"))
        .and(query_param("include[]", "items"))
        .and(query_param("include[]", "content_details"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let request = EndpointRequest::new("/api/v1/courses/1/modules")
        .param_many("include[]", ["items", "content_details"]);
    let records = walker_for(&server).fetch_all(&request).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_unauthorized_first_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ASSIGNMENTS))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .expect(1)
        .mount(&server)
        .await;

    let result = walker_for(&server)
        .fetch_all(&EndpointRequest::new(ASSIGNMENTS))
        .await;
    assert!(matches!(result, Err(ApiError::Authentication(_))));
}

#[tokio::test]
async fn test_failure_on_later_page_discards_earlier_records() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ASSIGNMENTS))
        .and(query_param("per_page", "100"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Link", next_header(&server, "page=2&per_page=50").as_str())
                .set_body_json(json!([{"id": 1}])),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(ASSIGNMENTS))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Rate Limit Exceeded"))
        .expect(1)
        .mount(&server)
        .await;

    let result = walker_for(&server)
        .fetch_all(&EndpointRequest::new(ASSIGNMENTS))
        .await;
    assert!(matches!(result, Err(ApiError::RateLimited(_))));
}

#[tokio::test]
async fn test_status_classification() {
    let cases: [(u16, fn(&ApiError) -> bool); 4] = [
        (429, |e| matches!(e, ApiError::RateLimited(_))),
        (403, |e| matches!(e, ApiError::Forbidden(_))),
        (404, |e| matches!(e, ApiError::Api { status: Some(404), .. })),
        (500, |e| matches!(e, ApiError::Api { status: Some(500), .. })),
    ];

    for (status, expected) in cases {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(ASSIGNMENTS))
            .respond_with(ResponseTemplate::new(status).set_body_string("nope"))
            .expect(1)
            .mount(&server)
            .await;

        let err = walker_for(&server)
            .fetch_all(&EndpointRequest::new(ASSIGNMENTS))
            .await
            .unwrap_err();
        assert!(expected(&err), "HTTP {} classified as {:?}", status, err);
    }
}

#[tokio::test]
async fn test_single_object_body_is_one_record() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/self"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 42, "name": "Test Student"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let profile = client_for(&server).verify_credentials().await.unwrap();
    assert_eq!(profile["name"], "Test Student");
}

#[tokio::test]
async fn test_unreachable_host_is_api_failure() {
    let settings = canvas_harvest::ApiSettings::new("http://127.0.0.1:9", "token").unwrap();
    let walker = canvas_harvest::PageWalker::new(settings).unwrap();

    let err = walker
        .fetch_all(&EndpointRequest::new(ASSIGNMENTS))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Api { status: None, .. }));
}

#[tokio::test]
async fn test_continuation_link_replaces_caller_params() {
    let server = MockServer::start().await;
    let topics = "/api/v1/courses/1/discussion_topics";
    let next = format!(
        r#"<{}{}?page=2&per_page=50>; rel="next""#,
        server.uri(),
        topics
    );

    Mock::given(method("GET"))
        .and(path(topics))
        .and(query_param("only_announcements", "true"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Link", next.as_str())
                .set_body_json(json!([{"id": 1}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(topics))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 2}])))
        .expect(1)
        .mount(&server)
        .await;

    let request = EndpointRequest::new(topics)
        .param("only_announcements", "true")
        .param_many("include[]", ["sections"]);
    let records = walker_for(&server).fetch_all(&request).await.unwrap();
    assert_eq!(records.len(), 2);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);

    let first = requests[0].url.query().unwrap_or_default();
    assert!(first.contains("only_announcements=true"));
    assert!(first.contains("per_page=100"));
    assert_eq!(requests[1].url.query(), Some("page=2&per_page=50"));
}

#[tokio::test]
async fn test_unreadable_unauthorized_body_stays_typed() {
    let server = MockServer::start().await;

    // Declared gzip but not gzip, so reading the body fails.
    Mock::given(method("GET"))
        .and(path(ASSIGNMENTS))
        .respond_with(
            ResponseTemplate::new(401)
                .insert_header("Content-Encoding", "gzip")
                .set_body_bytes(b"definitely not gzip".to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = walker_for(&server)
        .fetch_all(&EndpointRequest::new(ASSIGNMENTS))
        .await;
    assert!(matches!(result, Err(ApiError::Authentication(_))));
}
