//! Continuation-link discovery from `Link` response headers
//!
//! Canvas advertises pagination as
//! `<https://…?page=2&per_page=10>; rel="next", <https://…?page=1>; rel="first"`.
//! Only the `next` relation matters; its URL is followed verbatim.

use reqwest::header::{HeaderMap, LINK};

/// Finds the `next` continuation URL across all `Link` header values
pub fn next_link(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(parse_next_link)
}

/// Extracts the `next` relation URL from one `Link` header value
///
/// # Example
///
/// ```
/// use canvas_harvest::client::parse_next_link;
///
/// let header = r#"<https://x.test/api/v1/courses?page=2>; rel="next", <https://x.test/api/v1/courses?page=1>; rel="first""#;
/// assert_eq!(
///     parse_next_link(header),
///     Some("https://x.test/api/v1/courses?page=2".to_string())
/// );
/// ```
pub fn parse_next_link(value: &str) -> Option<String> {
    value.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();

        if !parts.any(is_next_relation) {
            return None;
        }

        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    })
}

/// Matches `rel="next"`, `rel=next`, and space-separated relation lists
fn is_next_relation(param: &str) -> bool {
    let Some((name, value)) = param.split_once('=') else {
        return false;
    };
    name.trim().eq_ignore_ascii_case("rel")
        && value
            .trim()
            .trim_matches('"')
            .split_whitespace()
            .any(|rel| rel.eq_ignore_ascii_case("next"))
}
