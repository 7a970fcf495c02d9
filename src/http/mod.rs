//! Serving a built route tree.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (timeout, body limit, trace span)
//!     → axum::Router built from the route tree
//!         → request.rs (optional request-id middleware, any tier)
//!         → group / route middleware → handler
//! ```

pub mod request;
pub mod server;

pub use request::{request_id, RequestId, RequestIdExt, X_REQUEST_ID};
pub use server::HttpServer;
