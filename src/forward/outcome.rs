//! Upstream outcomes and their mapping to caller responses.
//!
//! # Design Decisions
//! - Upstream error statuses are passed through with their body, unwrapped
//! - Transport failures become a fixed 500; the cause is logged, never sent
//! - Response headers go through [`filter_response`] in both success and
//!   upstream-error cases

use std::time::Duration;

use axum::{
    body::Body,
    http::{uri::InvalidUri, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;

use crate::forward::headers::filter_response;

/// Body returned to the caller when no upstream response was obtained.
pub const TRANSPORT_FAILURE_BODY: &str = "Upstream request failed";

/// A response obtained from the upstream with a non-error status.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Why no usable upstream response was obtained.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid upstream URI {uri:?}: {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: InvalidUri,
    },

    #[error("failed to build upstream request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("upstream request failed: {0}")]
    Client(#[from] hyper_util::client::legacy::Error),

    #[error("failed to read upstream body: {0}")]
    Body(#[from] hyper::Error),

    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout(_))
    }

    pub fn is_connect(&self) -> bool {
        matches!(self, TransportError::Client(e) if e.is_connect())
    }
}

/// Why forwarding did not produce a successful upstream response.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    /// The upstream answered with a 4xx or 5xx status.
    #[error("upstream responded with {status}")]
    Upstream {
        status: StatusCode,
        headers: HeaderMap,
        body: Bytes,
    },

    /// No usable upstream response: connect failure, timeout, reset, DNS.
    #[error("transport failure: {cause}")]
    Transport {
        #[source]
        cause: TransportError,
    },
}

impl ForwardError {
    /// Status the caller will see.
    pub fn status(&self) -> StatusCode {
        match self {
            ForwardError::Upstream { status, .. } => *status,
            ForwardError::Transport { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TransportError> for ForwardError {
    fn from(cause: TransportError) -> Self {
        ForwardError::Transport { cause }
    }
}

/// Result of one forwarded request.
pub type Outcome = Result<UpstreamResponse, ForwardError>;

impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> Response {
        passthrough(self.status, &self.headers, self.body)
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        match self {
            ForwardError::Upstream {
                status,
                headers,
                body,
            } => passthrough(status, &headers, body),
            ForwardError::Transport { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, TRANSPORT_FAILURE_BODY).into_response()
            }
        }
    }
}

fn passthrough(status: StatusCode, headers: &HeaderMap, body: Bytes) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    *response.headers_mut() = filter_response(headers);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderValue};
    use http_body_util::BodyExt;

    async fn body_bytes(response: Response) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    #[tokio::test]
    async fn success_copies_status_body_and_content_type() {
        let outcome: Outcome = Ok(UpstreamResponse {
            status: StatusCode::OK,
            headers: json_headers(),
            body: Bytes::from_static(br#"{"a":1}"#),
        });

        let response = outcome.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(body_bytes(response).await, &br#"{"a":1}"#[..]);
    }

    #[tokio::test]
    async fn upstream_error_passes_through_unwrapped() {
        let outcome: Outcome = Err(ForwardError::Upstream {
            status: StatusCode::NOT_FOUND,
            headers: json_headers(),
            body: Bytes::from_static(br#"{"error":"not found"}"#),
        });

        let response = outcome.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_bytes(response).await, &br#"{"error":"not found"}"#[..]);
    }

    #[tokio::test]
    async fn stripped_headers_never_reach_the_caller() {
        let mut headers = json_headers();
        headers.insert(header::CONTENT_ENCODING, HeaderValue::from_static("identity"));
        headers.insert(header::CONNECTION, HeaderValue::from_static("close"));

        for outcome in [
            Ok(UpstreamResponse {
                status: StatusCode::CREATED,
                headers: headers.clone(),
                body: Bytes::new(),
            }),
            Err(ForwardError::Upstream {
                status: StatusCode::BAD_GATEWAY,
                headers: headers.clone(),
                body: Bytes::new(),
            }),
        ] {
            let response: Response = outcome.into_response();
            assert!(response.headers().get(header::CONTENT_ENCODING).is_none());
            assert!(response.headers().get(header::CONNECTION).is_none());
            assert!(response.headers().get(header::CONTENT_TYPE).is_some());
        }
    }

    #[tokio::test]
    async fn transport_failure_is_generic_500() {
        let err = ForwardError::from(TransportError::Timeout(Duration::from_secs(30)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_bytes(response).await, TRANSPORT_FAILURE_BODY.as_bytes());
    }
}
