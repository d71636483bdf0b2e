//! Inbound and outbound request descriptions.
//!
//! # Responsibilities
//! - Capture what the server received (method, path, query, headers, body)
//! - Derive the upstream request: target URL, filtered headers, optional body
//!
//! # Design Decisions
//! - Path and query are appended to the base URL as received, no re-escaping
//! - GET and HEAD never carry a body; other methods carry one only if non-empty

use axum::http::{HeaderMap, Method, Uri};
use bytes::Bytes;

use crate::forward::headers::HeaderFilter;

/// A request as received from the caller, with its body fully buffered.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl InboundRequest {
    /// Assemble from the pieces of a received request.
    pub fn new(method: Method, uri: &Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            headers,
            body,
        }
    }
}

/// The request sent to the upstream origin.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl OutboundRequest {
    /// Derive the upstream request from an inbound one.
    pub fn from_inbound(inbound: &InboundRequest, base_url: &str, filter: &HeaderFilter) -> Self {
        let body = carries_body(&inbound.method, &inbound.body).then(|| inbound.body.clone());

        Self {
            method: inbound.method.clone(),
            url: target_url(base_url, &inbound.path, inbound.query.as_deref()),
            headers: filter.filter_request(&inbound.headers),
            body,
        }
    }

    /// Names of the forwarded headers, for logging. Values are omitted
    /// since they include credentials.
    pub fn header_names(&self) -> Vec<&str> {
        self.headers.keys().map(|name| name.as_str()).collect()
    }
}

/// Whether the upstream request carries the inbound body.
pub fn carries_body(method: &Method, body: &Bytes) -> bool {
    *method != Method::GET && *method != Method::HEAD && !body.is_empty()
}

/// `base_url` + `path` + `?query`. A trailing `/` on the base is dropped so
/// the inbound path's leading `/` is not doubled.
pub fn target_url(base_url: &str, path: &str, query: Option<&str>) -> String {
    let base = base_url.trim_end_matches('/');
    match query {
        Some(query) => format!("{}{}?{}", base, path, query),
        None => format!("{}{}", base, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeaderPolicy;
    use axum::http::HeaderValue;

    fn inbound(method: Method, uri: &str, body: &'static str) -> InboundRequest {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer t"));
        headers.insert("x-custom", HeaderValue::from_static("z"));
        InboundRequest::new(method, &uri.parse().unwrap(), headers, Bytes::from_static(body.as_bytes()))
    }

    fn outbound(req: &InboundRequest) -> OutboundRequest {
        let filter = HeaderFilter::new(&HeaderPolicy::default());
        OutboundRequest::from_inbound(req, "https://api.example.com", &filter)
    }

    #[test]
    fn get_and_head_never_carry_a_body() {
        for method in [Method::GET, Method::HEAD] {
            let out = outbound(&inbound(method, "/items", r#"{"a":1}"#));
            assert!(out.body.is_none());
        }
    }

    #[test]
    fn other_methods_carry_the_exact_body() {
        for method in [Method::POST, Method::PUT, Method::PATCH, Method::DELETE, Method::OPTIONS] {
            let out = outbound(&inbound(method, "/items", r#"{"a":1}"#));
            assert_eq!(out.body.as_deref(), Some(&br#"{"a":1}"#[..]));
        }
    }

    #[test]
    fn empty_body_is_omitted() {
        let out = outbound(&inbound(Method::POST, "/items", ""));
        assert!(out.body.is_none());
    }

    #[test]
    fn custom_methods_follow_the_body_rule() {
        let method = Method::from_bytes(b"PROPFIND").unwrap();
        let out = outbound(&inbound(method.clone(), "/dav", "<x/>"));
        assert_eq!(out.method, method);
        assert!(out.body.is_some());
    }

    #[test]
    fn url_keeps_path_and_raw_query() {
        let out = outbound(&inbound(Method::GET, "/v1/items%2Fraw?page=2&q=a%20b", ""));
        assert_eq!(out.url, "https://api.example.com/v1/items%2Fraw?page=2&q=a%20b");
    }

    #[test]
    fn url_without_query() {
        assert_eq!(target_url("https://h/", "/x", None), "https://h/x");
        assert_eq!(target_url("https://h/api", "/x", Some("a=1")), "https://h/api/x?a=1");
    }

    #[test]
    fn headers_are_filtered_and_named_for_logging() {
        let out = outbound(&inbound(Method::GET, "/", ""));
        assert_eq!(out.header_names(), vec!["authorization"]);
    }
}
