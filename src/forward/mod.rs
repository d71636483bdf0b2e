//! Request forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest (method, path, query, headers, buffered body)
//!     → request.rs (target URL, body rule)
//!     → headers.rs (request header policy)
//!     → forwarder.rs (dispatch via hyper client, buffer response)
//!     → outcome.rs (Outcome → caller response, response header filter)
//! ```
//!
//! # Design Decisions
//! - One upstream origin; no routing, retries or circuit breaking
//! - Payloads pass through unmodified in both directions
//! - No shared mutable state on this path

pub mod forwarder;
pub mod headers;
pub mod outcome;
pub mod request;

pub use forwarder::Forwarder;
pub use headers::{filter_response, HeaderFilter};
pub use outcome::{ForwardError, Outcome, TransportError, UpstreamResponse, TRANSPORT_FAILURE_BODY};
pub use request::{carries_body, target_url, InboundRequest, OutboundRequest};
