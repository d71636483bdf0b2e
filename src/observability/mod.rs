//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!     → per-request spans carrying the request ID
//!
//! logging.rs routes them to:
//!     → stdout (pretty or JSON)
//!     → rolling log file (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a request
//! - Header values are never logged, only names

pub mod logging;

pub use logging::{init_logging, LoggingError};
