//! The forwarding path: inbound request → upstream → caller response.
//!
//! # Design Decisions
//! - The upstream URI is parsed from the joined string and sent as-is; no
//!   dot-segment resolution or re-escaping happens between caller and upstream
//! - One deadline covers connect, send and reading the whole response body

use std::time::{Duration, Instant};

use axum::{
    http::{Request, Uri},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::{TimeoutConfig, UpstreamConfig};
use crate::forward::headers::HeaderFilter;
use crate::forward::outcome::{ForwardError, Outcome, TransportError, UpstreamResponse};
use crate::forward::request::{InboundRequest, OutboundRequest};

type HttpsClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Relays requests to the single configured upstream origin.
#[derive(Clone)]
pub struct Forwarder {
    client: HttpsClient,
    base_url: String,
    filter: HeaderFilter,
    upstream_timeout: Duration,
}

impl Forwarder {
    /// Create a forwarder with its own pooled HTTP/HTTPS client.
    pub fn new(upstream: &UpstreamConfig, timeouts: &TimeoutConfig) -> Self {
        let mut http = HttpConnector::new();
        http.enforce_http(false);
        http.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));

        let https = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .wrap_connector(http);

        let client = Client::builder(TokioExecutor::new()).build(https);

        Self {
            client,
            base_url: upstream.base_url.clone(),
            filter: HeaderFilter::new(&upstream.headers),
            upstream_timeout: Duration::from_secs(timeouts.upstream_secs),
        }
    }

    /// Derive the upstream request for an inbound one.
    pub fn outbound(&self, inbound: &InboundRequest) -> OutboundRequest {
        OutboundRequest::from_inbound(inbound, &self.base_url, &self.filter)
    }

    /// Forward one request and map the outcome to the caller's response.
    pub async fn forward(&self, inbound: InboundRequest, request_id: &str) -> Response {
        let start = Instant::now();
        let outbound = self.outbound(&inbound);
        let url = outbound.url.clone();

        tracing::info!(
            request_id = %request_id,
            method = %outbound.method,
            url = %url,
            headers = ?outbound.header_names(),
            body_len = outbound.body.as_ref().map_or(0, |b| b.len()),
            "Dispatching upstream request"
        );

        let outcome = self.dispatch(outbound).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &outcome {
            Ok(response) => {
                tracing::info!(
                    request_id = %request_id,
                    url = %url,
                    status = response.status.as_u16(),
                    body_len = response.body.len(),
                    elapsed_ms,
                    "Upstream responded"
                );
            }
            Err(ForwardError::Upstream { status, body, .. }) => {
                tracing::warn!(
                    request_id = %request_id,
                    url = %url,
                    status = status.as_u16(),
                    body = %String::from_utf8_lossy(body),
                    elapsed_ms,
                    "Upstream returned an error status"
                );
            }
            Err(ForwardError::Transport { cause }) => {
                tracing::error!(
                    request_id = %request_id,
                    url = %url,
                    error = %cause,
                    timeout = cause.is_timeout(),
                    connect = cause.is_connect(),
                    elapsed_ms,
                    "Upstream request failed"
                );
            }
        }

        outcome.into_response()
    }

    /// Send the request and buffer the upstream response.
    ///
    /// 4xx and 5xx statuses are reported as [`ForwardError::Upstream`].
    pub async fn dispatch(&self, outbound: OutboundRequest) -> Outcome {
        let exchange = self.exchange(outbound);
        let (status, headers, body) = tokio::time::timeout(self.upstream_timeout, exchange)
            .await
            .map_err(|_| TransportError::Timeout(self.upstream_timeout))??;

        if status.is_client_error() || status.is_server_error() {
            return Err(ForwardError::Upstream {
                status,
                headers,
                body,
            });
        }

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }

    async fn exchange(
        &self,
        outbound: OutboundRequest,
    ) -> Result<(axum::http::StatusCode, axum::http::HeaderMap, Bytes), TransportError> {
        let uri: Uri = outbound
            .url
            .parse()
            .map_err(|source| TransportError::InvalidUri {
                uri: outbound.url.clone(),
                source,
            })?;

        let mut request = Request::builder()
            .method(outbound.method)
            .uri(uri)
            .body(Full::new(outbound.body.unwrap_or_default()))?;
        *request.headers_mut() = outbound.headers;

        let response = self.client.request(request).await?;
        let (parts, body) = response.into_parts();
        let body = body.collect().await?.to_bytes();

        Ok((parts.status, parts.headers, body))
    }
}
