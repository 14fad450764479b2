//! Endpoint requests and their query parameters

use crate::client::settings::{MAX_PAGE_SIZE, PAGE_SIZE_PARAM};
use std::collections::BTreeMap;

/// Query parameters for an endpoint request
///
/// Keys are unique. A key may carry several values (Canvas array parameters
/// such as `include[]`), which are sent as repeated pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: BTreeMap<String, Vec<String>>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a single-valued parameter, replacing any previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), vec![value.into()]);
    }

    /// Sets a multi-valued parameter, replacing any previous values
    pub fn insert_many<I, V>(&mut self, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.entries
            .insert(key.into(), values.into_iter().map(Into::into).collect());
    }

    /// First value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flattens into the `(key, value)` pairs sent on the wire
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |v| (key.clone(), v.clone())))
            .collect()
    }

    /// Guarantees a page size is present and within the server maximum
    ///
    /// A missing value becomes `default`; a larger or unparsable value is
    /// replaced with the maximum or the default respectively.
    pub(crate) fn ensure_page_size(&mut self, default: u32) {
        let default = default.clamp(1, MAX_PAGE_SIZE);
        let size = match self.get(PAGE_SIZE_PARAM).map(str::parse::<u32>) {
            None | Some(Err(_)) | Some(Ok(0)) => default,
            Some(Ok(requested)) => requested.min(MAX_PAGE_SIZE),
        };
        self.insert(PAGE_SIZE_PARAM, size.to_string());
    }
}

/// One logical "fetch everything at this endpoint" request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRequest {
    path: String,
    params: QueryParams,
}

impl EndpointRequest {
    /// Creates a request for an API path such as `/api/v1/courses`
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: QueryParams::new(),
        }
    }

    /// Adds a single-valued query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key, value);
        self
    }

    /// Adds a multi-valued query parameter
    pub fn param_many<I, V>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.params.insert_many(key, values);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }
}
