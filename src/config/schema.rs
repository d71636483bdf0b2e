//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// The single upstream origin all traffic is forwarded to.
    pub upstream: UpstreamConfig,

    /// Public IP lookup settings.
    pub ip_resolver: IpResolverConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port to listen on.
    pub port: u16,
}

impl ListenerConfig {
    /// Address string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
        }
    }
}

/// Upstream origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Origin the inbound path and query are appended to.
    pub base_url: String,

    /// Which inbound headers are forwarded.
    pub headers: HeaderPolicy,

    /// Largest inbound body buffered for forwarding.
    pub max_body_bytes: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://partner-acc-2.alphabet.com".to_string(),
            headers: HeaderPolicy::default(),
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Inbound header forwarding policy.
///
/// In TOML:
///
/// ```toml
/// [upstream.headers]
/// policy = "allow"
/// names = ["authorization", "accept"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "policy", content = "names", rename_all = "lowercase")]
pub enum HeaderPolicy {
    /// Forward only the listed headers.
    Allow(Vec<String>),
    /// Forward everything except the listed headers.
    Deny(Vec<String>),
}

impl HeaderPolicy {
    /// The less restrictive policy that only strips `host`.
    pub fn deny_host() -> Self {
        HeaderPolicy::Deny(vec!["host".to_string()])
    }

    /// Configured header names, regardless of policy kind.
    pub fn names(&self) -> &[String] {
        match self {
            HeaderPolicy::Allow(names) | HeaderPolicy::Deny(names) => names,
        }
    }
}

impl Default for HeaderPolicy {
    fn default() -> Self {
        HeaderPolicy::Allow(vec!["authorization".to_string(), "accept".to_string()])
    }
}

/// Public IP lookup configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IpResolverConfig {
    /// Path of the GET endpoint reporting the relay's public IP.
    pub endpoint_path: String,

    /// IP echo service queried on each lookup.
    pub service_url: String,

    /// Bound on a single lookup, in seconds.
    pub timeout_secs: u64,
}

impl Default for IpResolverConfig {
    fn default() -> Self {
        Self {
            endpoint_path: "/ip-info".to_string(),
            service_url: "https://api.ipify.org?format=json".to_string(),
            timeout_secs: 5,
        }
    }
}

/// Timeout configuration for the forwarding path.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Deadline for one upstream round trip in seconds.
    pub upstream_secs: u64,

    /// Total inbound request deadline in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 30,
            request_secs: 60,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Filter directives used when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Console log format.
    pub log_format: LogFormat,

    /// Directory for rolling log files. Console only when unset.
    pub log_dir: Option<String>,

    /// File name prefix inside `log_dir`.
    pub log_file_name: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "upstream_relay=info,tower_http=info".to_string(),
            log_format: LogFormat::Pretty,
            log_dir: None,
            log_file_name: "relay.log".to_string(),
        }
    }
}
