//! Request correlation.
//!
//! # Responsibilities
//! - Assign every request an `x-request-id` (UUID v4) unless the client sent one
//! - Expose the id to handlers through request extensions
//! - Echo the id on the response
//!
//! # Design Decisions
//! - Provided as a `Middleware` so it can sit in any tier of a route tree
//! - Incoming ids are kept only if they are valid header values

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
};
use uuid::Uuid;

use crate::routing::Middleware;

/// Header carrying the request id.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Request id stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Access the request id from a request.
pub trait RequestIdExt {
    fn request_id(&self) -> Option<&str>;
}

impl<B> RequestIdExt for axum::http::Request<B> {
    fn request_id(&self) -> Option<&str> {
        self.extensions().get::<RequestId>().map(|id| id.0.as_str())
    }
}

/// Middleware that tags requests and responses with an id.
pub fn request_id() -> Middleware {
    Middleware::from_fn(|mut req: Request, next: Next| async move {
        let id = req
            .headers()
            .get(&X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let header = HeaderValue::from_str(&id).ok();
        if let Some(value) = &header {
            req.headers_mut().insert(X_REQUEST_ID, value.clone());
        }
        req.extensions_mut().insert(RequestId(id));

        let mut response = next.run(req).await;
        if let Some(value) = header {
            response.headers_mut().insert(X_REQUEST_ID, value);
        }
        response
    })
}
