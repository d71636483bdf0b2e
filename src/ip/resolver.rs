//! Public IP lookup with a last-known-value cache.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use serde::Deserialize;

use crate::config::IpResolverConfig;

/// Why a lookup produced no address.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("IP service request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("IP service returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("IP service returned an unrecognized body: {0:?}")]
    Malformed(String),
}

#[derive(Deserialize)]
struct EchoBody {
    ip: String,
}

/// Queries an IP echo service for the relay's public address.
///
/// The last successful answer is kept in process memory. It is only ever
/// overwritten by a later success; failures leave it as it was.
pub struct IpResolver {
    client: reqwest::Client,
    service_url: String,
    cached: ArcSwapOption<String>,
}

impl IpResolver {
    /// Create a resolver whose lookups are bounded by `timeout_secs`.
    pub fn new(config: &IpResolverConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            service_url: config.service_url.clone(),
            cached: ArcSwapOption::empty(),
        })
    }

    /// Look up the public IP once. `None` on any failure.
    pub async fn resolve_public_ip(&self) -> Option<String> {
        match self.lookup().await {
            Ok(ip) => {
                let ip = ip.to_string();
                self.cached.store(Some(Arc::new(ip.clone())));
                tracing::debug!(ip = %ip, "Public IP resolved");
                Some(ip)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    service = %self.service_url,
                    last_known = ?self.cached_ip(),
                    "Public IP lookup failed"
                );
                None
            }
        }
    }

    /// Last successfully resolved address, if any.
    pub fn cached_ip(&self) -> Option<String> {
        self.cached.load_full().map(|ip| ip.as_str().to_string())
    }

    async fn lookup(&self) -> Result<IpAddr, ResolveError> {
        let response = self.client.get(&self.service_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::Status(status));
        }
        let body = response.text().await?;
        parse_ip(&body)
    }
}

/// Accepts `{"ip": "..."}` or a bare address as plain text.
pub fn parse_ip(body: &str) -> Result<IpAddr, ResolveError> {
    let candidate = match serde_json::from_str::<EchoBody>(body) {
        Ok(echo) => echo.ip,
        Err(_) => body.trim().to_string(),
    };

    candidate
        .trim()
        .parse()
        .map_err(|_| ResolveError::Malformed(truncate(body)))
}

fn truncate(body: &str) -> String {
    body.chars().take(64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_body() {
        let ip = parse_ip(r#"{"ip":"203.0.113.7"}"#).unwrap();
        assert_eq!(ip.to_string(), "203.0.113.7");
    }

    #[test]
    fn parses_plain_text_body() {
        let ip = parse_ip("2001:db8::1\n").unwrap();
        assert_eq!(ip.to_string(), "2001:db8::1");
    }

    #[test]
    fn rejects_malformed_bodies() {
        for body in ["", "<html>rate limited</html>", r#"{"ip":"not-an-ip"}"#, r#"{"addr":"1.2.3.4"}"#] {
            assert!(matches!(parse_ip(body), Err(ResolveError::Malformed(_))), "{body}");
        }
    }

    #[tokio::test]
    async fn failure_leaves_cache_empty() {
        let config = IpResolverConfig {
            service_url: "http://127.0.0.1:1/".into(),
            timeout_secs: 1,
            ..IpResolverConfig::default()
        };
        let resolver = IpResolver::new(&config).unwrap();

        assert_eq!(resolver.resolve_public_ip().await, None);
        assert_eq!(resolver.cached_ip(), None);
    }
}
