//! Cache headers for rendered pages.
//!
//! There is no server-side page cache. Pages carry a strong ETag and a
//! `Cache-Control` that lets a CDN in front hold CMS-backed pages for the
//! revalidation window and serve them stale while it refetches.

use std::time::Duration;

use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE, ETAG, IF_NONE_MATCH};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use sha2::{Digest, Sha256};

/// Static pages change only on redeploy
const STATIC_MAX_AGE: Duration = Duration::from_secs(86_400);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Built from site.toml only
    Static,
    /// Built from CMS data; shared caches may keep it this long
    Cms(Duration),
    /// Never cached (errors, form responses)
    NoStore,
}

impl Freshness {
    pub fn cache_control(self) -> String {
        match self {
            Freshness::Static => format!(
                "public, max-age=0, s-maxage={}",
                STATIC_MAX_AGE.as_secs()
            ),
            Freshness::Cms(window) => format!(
                "public, max-age=0, s-maxage={}, stale-while-revalidate={}",
                window.as_secs(),
                window.as_secs()
            ),
            Freshness::NoStore => "no-store".to_string(),
        }
    }
}

pub fn etag(body: &[u8]) -> String {
    let digest = Sha256::digest(body);
    let hex: String = digest[..16].iter().map(|b| format!("{:02x}", b)).collect();
    format!("\"{}\"", hex)
}

fn matches_etag(request: &HeaderMap, tag: &str) -> bool {
    request
        .get_all(IF_NONE_MATCH)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|v| v.trim().trim_start_matches("W/"))
        .any(|v| v == "*" || v == tag)
}

/// Respond with a body, its cache headers, and 304 when the client already
/// holds the same representation. Only 200 responses are validated.
pub fn cached(
    request: &HeaderMap,
    status: StatusCode,
    content_type: &'static str,
    body: String,
    freshness: Freshness,
) -> Response {
    let cache_control = HeaderValue::from_str(&freshness.cache_control())
        .unwrap_or_else(|_| HeaderValue::from_static("no-store"));

    if status != StatusCode::OK || freshness == Freshness::NoStore {
        return (
            status,
            [
                (CONTENT_TYPE, HeaderValue::from_static(content_type)),
                (CACHE_CONTROL, cache_control),
            ],
            body,
        )
            .into_response();
    }

    let tag = etag(body.as_bytes());
    let etag_value = HeaderValue::from_str(&tag).unwrap_or_else(|_| HeaderValue::from_static("\"\""));

    if matches_etag(request, &tag) {
        return (
            StatusCode::NOT_MODIFIED,
            [(ETAG, etag_value), (CACHE_CONTROL, cache_control)],
        )
            .into_response();
    }

    (
        status,
        [
            (CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (ETAG, etag_value),
            (CACHE_CONTROL, cache_control),
        ],
        body,
    )
        .into_response()
}

pub const HTML: &str = "text/html; charset=utf-8";
pub const XML: &str = "application/xml; charset=utf-8";
pub const TEXT: &str = "text/plain; charset=utf-8";

pub fn html(request: &HeaderMap, status: StatusCode, body: String, freshness: Freshness) -> Response {
    cached(request, status, HTML, body, freshness)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cms_pages_allow_stale_while_revalidate() {
        let value = Freshness::Cms(Duration::from_secs(600)).cache_control();
        assert_eq!(
            value,
            "public, max-age=0, s-maxage=600, stale-while-revalidate=600"
        );
        assert_eq!(Freshness::NoStore.cache_control(), "no-store");
    }

    #[test]
    fn test_etag_is_stable_and_quoted() {
        let a = etag(b"hello");
        assert_eq!(a, etag(b"hello"));
        assert_ne!(a, etag(b"hello!"));
        assert!(a.starts_with('"') && a.ends_with('"'));
        assert_eq!(a.len(), 34);
    }

    #[test]
    fn test_if_none_match_returns_not_modified() {
        let body = "<p>page</p>".to_string();
        let mut headers = HeaderMap::new();
        headers.insert(
            IF_NONE_MATCH,
            HeaderValue::from_str(&format!("\"other\", W/{}", etag(body.as_bytes()))).unwrap(),
        );

        let response = html(&headers, StatusCode::OK, body, Freshness::Static);
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    }

    #[test]
    fn test_error_pages_carry_no_etag() {
        let response = html(
            &HeaderMap::new(),
            StatusCode::NOT_FOUND,
            "missing".to_string(),
            Freshness::Static,
        );
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(ETAG).is_none());
    }
}
