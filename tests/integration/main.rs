//! Integration tests against a mock Canvas API
//!
//! These tests use wiremock to stand in for a Canvas instance and exercise
//! pagination, failure classification, and multi-course aggregation
//! end-to-end over HTTP.

mod aggregator_tests;
mod walker_tests;

use canvas_harvest::{ApiSettings, CanvasClient, PageWalker};
use wiremock::MockServer;

/// Token every test client authenticates with
pub const TEST_TOKEN: &str = "test-token";

pub fn settings_for(server: &MockServer) -> ApiSettings {
    ApiSettings::new(&server.uri(), TEST_TOKEN).expect("mock server URI is valid")
}

pub fn walker_for(server: &MockServer) -> PageWalker {
    PageWalker::new(settings_for(server)).expect("HTTP client builds")
}

pub fn client_for(server: &MockServer) -> CanvasClient {
    CanvasClient::new(settings_for(server)).expect("HTTP client builds")
}
