//! Single-upstream HTTP relay library.

pub mod config;
pub mod error;
pub mod forward;
pub mod http;
pub mod ip;
pub mod lifecycle;
pub mod observability;

pub use config::schema::ProxyConfig;
pub use error::ProxyError;
pub use forward::Forwarder;
pub use http::HttpServer;
pub use ip::IpResolver;
pub use lifecycle::Shutdown;
