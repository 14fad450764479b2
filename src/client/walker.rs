//! Pagination-following request walker
//!
//! One `fetch_all` call is one logical "fetch everything at this endpoint"
//! operation:
//!
//! 1. GET the endpoint with the caller's parameters plus a page size
//! 2. Classify the response (see [`classify_status`])
//! 3. Append the body's records (a single object counts as one record)
//! 4. Follow the `next` continuation link verbatim until none remains
//!
//! Any failure aborts the whole call; no partial result is returned and
//! nothing is retried.
//!
//! [`classify_status`]: crate::client::classify_status

use crate::client::error::{classify_status, ApiError};
use crate::client::pagination::next_link;
use crate::client::request::EndpointRequest;
use crate::client::settings::{build_http_client, ApiSettings};
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use std::sync::Arc;

/// One decoded page of results
#[derive(Debug)]
struct Page {
    records: Vec<Value>,
    next_url: Option<String>,
}

/// Walks paginated Canvas endpoints
#[derive(Debug, Clone)]
pub struct PageWalker {
    http: Client,
    settings: Arc<ApiSettings>,
}

impl PageWalker {
    /// Creates a walker with its own HTTP client
    pub fn new(settings: ApiSettings) -> Result<Self, reqwest::Error> {
        let http = build_http_client(&settings)?;
        Ok(Self::with_client(http, Arc::new(settings)))
    }

    /// Creates a walker that reuses an existing HTTP client
    pub fn with_client(http: Client, settings: Arc<ApiSettings>) -> Self {
        Self { http, settings }
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    /// Fetches every record at an endpoint, following continuation links
    ///
    /// # Arguments
    ///
    /// * `request` - Endpoint path and query parameters
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Value>)` - All records, in server page order then in-page order
    /// * `Err(ApiError)` - The first failure encountered; earlier pages are discarded
    pub async fn fetch_all(&self, request: &EndpointRequest) -> Result<Vec<Value>, ApiError> {
        let mut params = request.params().clone();
        params.ensure_page_size(self.settings.page_size());

        let url = self.settings.endpoint_url(request.path());
        let mut next = Some((url.clone(), self.http.get(&url).query(&params.to_pairs())));

        let mut records = Vec::new();
        let mut pages = 0usize;

        while let Some((url, builder)) = next.take() {
            let page = self.fetch_page(&url, builder).await?;
            pages += 1;

            tracing::debug!(
                "Fetched page {} of {} ({} records)",
                pages,
                request.path(),
                page.records.len()
            );

            records.extend(page.records);

            // The continuation URL already encodes every query parameter.
            next = page.next_url.map(|next_url| {
                let builder = self.http.get(&next_url);
                (next_url, builder)
            });
        }

        tracing::debug!(
            "Fetched {} records from {} across {} page(s)",
            records.len(),
            request.path(),
            pages
        );

        Ok(records)
    }

    /// Sends one request and decodes one page
    async fn fetch_page(&self, url: &str, builder: RequestBuilder) -> Result<Page, ApiError> {
        let response = builder
            .bearer_auth(self.settings.token())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ApiError::transport(url, &e))?;

        let status = response.status();
        let next_url = next_link(response.headers());

        let body = response
            .text()
            .await
            .map_err(|e| body_read_failure(status, url, &e))?;

        if let Some(failure) = classify_status(status, &body) {
            tracing::debug!("Request to {} failed with HTTP {}", url, status.as_u16());
            return Err(failure);
        }

        Ok(Page {
            records: decode_records(&body, status.as_u16())?,
            next_url,
        })
    }
}

/// Failure for a response whose body could not be read
///
/// The status line already arrived, so a failing status keeps its own
/// classification; only a success status falls back to a transport failure.
fn body_read_failure(status: StatusCode, url: &str, err: &reqwest::Error) -> ApiError {
    classify_status(status, "").unwrap_or_else(|| ApiError::transport(url, err))
}

/// Normalizes a success body into a list of records
///
/// Arrays are taken as-is, a single object becomes a one-element list, and
/// an empty or `null` body yields no records.
fn decode_records(body: &str, status: u16) -> Result<Vec<Value>, ApiError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(body).map_err(|e| ApiError::Api {
        status: Some(status),
        message: format!("Canvas API returned invalid JSON: {}", e),
    })?;

    Ok(match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    })
}
