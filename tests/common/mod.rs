//! Shared utilities for integration tests.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{Method, StatusCode},
    middleware::Next,
    response::IntoResponse,
    Router,
};
use route_tree::{Middleware, Route};
use tower::ServiceExt;

/// Names of the middlewares a request passed through, in order.
#[derive(Debug, Clone, Default)]
pub struct Trail(pub Vec<&'static str>);

/// Middleware that appends `name` to the request's trail.
pub fn mark(name: &'static str) -> Middleware {
    Middleware::from_fn(move |mut req: Request, next: Next| {
        match req.extensions_mut().get_mut::<Trail>() {
            Some(trail) => trail.0.push(name),
            None => {
                req.extensions_mut().insert(Trail(vec![name]));
            }
        }
        next.run(req)
    })
}

/// Route whose handler answers with the trail joined by commas.
pub fn trail_route(path: &str) -> Route {
    Route::at(path, |req: Request| async move {
        req.extensions()
            .get::<Trail>()
            .map(|t| t.0.join(","))
            .unwrap_or_default()
    })
}

/// Route answering with a fixed body.
pub fn text_route(path: &str, body: &'static str) -> Route {
    Route::at(path, move || async move { body })
}

/// Middleware that answers 400 to every DELETE.
pub fn reject_delete() -> Middleware {
    Middleware::from_fn(|req: Request, next: Next| async move {
        if req.method() == Method::DELETE {
            return (StatusCode::BAD_REQUEST, "DELETE not allowed").into_response();
        }
        next.run(req).await
    })
}

/// Drive one request through `router` without a socket.
pub async fn send(router: &Router, method: Method, path: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}
