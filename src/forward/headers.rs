//! Header filtering in both directions.
//!
//! Inbound → upstream goes through the configured [`HeaderPolicy`].
//! Upstream → caller drops the framing headers the server recomputes.

use axum::http::{header, HeaderMap, HeaderName};

use crate::config::HeaderPolicy;

/// Headers describing message framing. The outbound transport and the
/// inbound server each compute their own values for these.
const FRAMING_HEADERS: [HeaderName; 3] = [
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
    header::CONNECTION,
];

/// Nothing on the relay decodes compressed bodies, and `content-encoding`
/// is stripped on the way back, so the caller's encoding preferences never
/// reach the upstream.
const NEVER_FORWARDED: HeaderName = header::ACCEPT_ENCODING;

/// Upstream response headers never copied back to the caller.
const STRIPPED_RESPONSE_HEADERS: [HeaderName; 3] = [
    header::CONTENT_ENCODING,
    header::TRANSFER_ENCODING,
    header::CONNECTION,
];

/// A [`HeaderPolicy`] with its names pre-parsed for per-request matching.
#[derive(Debug, Clone)]
pub struct HeaderFilter {
    mode: Mode,
    names: Vec<HeaderName>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Allow,
    Deny,
}

impl HeaderFilter {
    /// Build a filter from configuration. Names that are not valid header
    /// names are skipped; validation rejects them before this point.
    pub fn new(policy: &HeaderPolicy) -> Self {
        let mode = match policy {
            HeaderPolicy::Allow(_) => Mode::Allow,
            HeaderPolicy::Deny(_) => Mode::Deny,
        };
        // HeaderName::from_bytes lowercases, so matching is case-insensitive.
        let names = policy
            .names()
            .iter()
            .filter_map(|name| HeaderName::from_bytes(name.as_bytes()).ok())
            .collect();

        Self { mode, names }
    }

    /// Whether a header with this name is forwarded upstream.
    pub fn permits(&self, name: &HeaderName) -> bool {
        if *name == NEVER_FORWARDED {
            return false;
        }
        let listed = self.names.contains(name);
        match self.mode {
            Mode::Allow => listed,
            Mode::Deny => !listed && !FRAMING_HEADERS.contains(name),
        }
    }

    /// Build the outbound header set. Every value of a permitted name is
    /// kept, in inbound order.
    pub fn filter_request(&self, inbound: &HeaderMap) -> HeaderMap {
        let mut outbound = HeaderMap::new();
        for (name, value) in inbound {
            if self.permits(name) {
                outbound.append(name.clone(), value.clone());
            }
        }
        outbound
    }
}

/// Copy upstream response headers, dropping `content-encoding`,
/// `transfer-encoding` and `connection`.
pub fn filter_response(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in upstream {
        if !STRIPPED_RESPONSE_HEADERS.contains(name) {
            headers.append(name.clone(), value.clone());
        }
    }
    headers
}
