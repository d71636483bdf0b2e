//! Public IP reporting.
//!
//! # Data Flow
//! ```text
//! GET <endpoint_path>
//!     → handler.rs (one lookup per request, JSON response)
//!     → resolver.rs (IP echo service call, cache update on success)
//! ```
//!
//! # Design Decisions
//! - Every request performs a fresh lookup; the cache is not a fast path
//! - Cache is owned by the resolver and read through an accessor
//! - Concurrent lookups race to overwrite the cache; last writer wins

pub mod handler;
pub mod resolver;

pub use handler::ip_info;
pub use resolver::{parse_ip, IpResolver, ResolveError};
