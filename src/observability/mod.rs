//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing (build events: mount, register, abort)
//! http::server (request spans via TraceLayer, request ids)
//!     → logging.rs (tracing subscriber, env filter)
//!     → stdout
//! ```
//!
//! # Design Decisions
//! - Structured fields, not formatted strings
//! - Request ID flows through request extensions and response headers

pub mod logging;

pub use logging::init_logging;
