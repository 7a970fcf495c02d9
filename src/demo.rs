//! The route tree served by the `route-tree` binary.
//!
//! A small users API that exercises every tier: a global request id, a
//! persistent API version header, a group-level bearer check on `/admin`,
//! a route-level content-type check, REST groups and a pre hook.

use axum::{
    extract::{Path, Request},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::engine::Engine;
use crate::http::{request_id, RequestIdExt};
use crate::routing::{Middleware, RestGroup, Route, RouteGroup};

pub const API_VERSION: &str = "1";
pub const ADMIN_TOKEN: &str = "Bearer route-tree-admin";

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: u32,
    pub name: &'static str,
}

const USERS: [User; 2] = [
    User { id: 1, name: "ada" },
    User { id: 2, name: "grace" },
];

/// The demo application.
pub fn app() -> Engine {
    Engine::new().middleware(request_id()).group(
        RouteGroup::new("")
            .route(Method::GET, Route::new(index))
            .child(
                RouteGroup::new("/api")
                    .persistent(api_version())
                    .child(
                        RestGroup::new("/users")
                            .get(Route::new(list_users))
                            .post(Route::new(create_user).with_middleware(require_json())),
                    )
                    .child(
                        RestGroup::new("/users/{id}")
                            .get(Route::new(get_user))
                            .delete(Route::new(delete_user)),
                    )
                    .child(
                        RouteGroup::new("/admin")
                            .middleware(require_admin())
                            .pre(|scope| {
                                tracing::info!(path = %scope.path(), "Mounting admin routes");
                                Ok(())
                            })
                            .route(Method::GET, Route::at("/status", admin_status)),
                    ),
            ),
    )
}

async fn index() -> &'static str {
    "route-tree"
}

async fn list_users() -> Json<Vec<User>> {
    Json(USERS.to_vec())
}

async fn get_user(Path(id): Path<u32>) -> Response {
    match USERS.iter().find(|u| u.id == id) {
        Some(user) => Json(user.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, "No such user").into_response(),
    }
}

async fn create_user(Json(body): Json<serde_json::Value>) -> impl IntoResponse {
    (StatusCode::CREATED, Json(body))
}

async fn delete_user(Path(id): Path<u32>) -> StatusCode {
    if USERS.iter().any(|u| u.id == id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn admin_status(req: Request) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "status": "operational",
        "request_id": req.request_id(),
    }))
}

/// Tags every response with `x-api-version`.
fn api_version() -> Middleware {
    Middleware::from_fn(|req: Request, next: Next| async move {
        let mut response = next.run(req).await;
        response
            .headers_mut()
            .insert("x-api-version", HeaderValue::from_static(API_VERSION));
        response
    })
}

/// Rejects requests without the admin bearer token.
fn require_admin() -> Middleware {
    Middleware::from_fn(|req: Request, next: Next| async move {
        let authorized = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .is_some_and(|v| v == ADMIN_TOKEN);

        if authorized {
            next.run(req).await
        } else {
            tracing::warn!(path = %req.uri().path(), "Admin request rejected");
            StatusCode::UNAUTHORIZED.into_response()
        }
    })
}

/// Rejects bodies that are not declared as JSON.
fn require_json() -> Middleware {
    Middleware::from_fn(|req: Request, next: Next| async move {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|h| h.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"));

        if is_json {
            next.run(req).await
        } else {
            StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response()
        }
    })
}
