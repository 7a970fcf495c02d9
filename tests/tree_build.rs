//! Building route trees and driving the resulting routers.

use axum::http::{Method, StatusCode};
use route_tree::{
    build, Apply, BuildError, Endpoint, Engine, RestGroup, Route, RouteGroup, RouteRegistry,
};

mod common;
use common::{mark, reject_delete, send, text_route, trail_route};

#[tokio::test]
async fn test_every_method_reaches_handler() {
    let group = RouteGroup::new("/test")
        .route(Method::GET, text_route("", "GET"))
        .route(Method::POST, text_route("", "POST"))
        .route(Method::PATCH, text_route("", "PATCH"))
        .route(Method::DELETE, text_route("", "DELETE"));

    let router = build(&group).unwrap();

    for method in [Method::GET, Method::POST, Method::PATCH, Method::DELETE] {
        let (status, body) = send(&router, method.clone(), "/test").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, method.as_str());
    }
    let (status, _) = send(&router, Method::PUT, "/test").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_nested_group_path() {
    let group = RouteGroup::new("/test")
        .child(RouteGroup::new("/nested").route(Method::GET, text_route("", "nested")));

    let router = build(&group).unwrap();

    let (status, body) = send(&router, Method::GET, "/test/nested").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "nested");
    let (status, _) = send(&router, Method::GET, "/test").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_handler_keeps_earlier_siblings() {
    let group = RouteGroup::new("")
        .route(Method::GET, text_route("/a", "a"))
        .route(
            Method::GET,
            Route {
                path: "/b".into(),
                ..Route::default()
            },
        )
        .route(Method::GET, text_route("/c", "c"));

    let mut registry = RouteRegistry::new();
    let err = group.apply_to(&mut registry).unwrap_err();

    match &err {
        BuildError::MissingHandler { path, .. } => assert_eq!(path, "/b"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("/b"));
    assert_eq!(registry.endpoints(), &[Endpoint::new(Method::GET, "/a")]);

    // The partial router is still usable, though callers must not serve it.
    let router = registry.into_router();
    assert_eq!(send(&router, Method::GET, "/a").await.0, StatusCode::OK);
    assert_eq!(send(&router, Method::GET, "/c").await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_build_returns_no_router_on_error() {
    let group = RouteGroup::new("").route(Method::GET, Route::default());
    assert!(matches!(build(&group), Err(BuildError::MissingHandler { .. })));
}

#[tokio::test]
async fn test_middleware_tiers_run_in_order() {
    let group = RouteGroup::new("/ordered")
        .persistent(mark("P1"))
        .persistent(mark("P2"))
        .middleware(mark("G"))
        .route(Method::GET, trail_route("").with_middleware(mark("R")));

    let router = build(&group).unwrap();

    let (status, body) = send(&router, Method::GET, "/ordered").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "P1,P2,G,R");
}

#[tokio::test]
async fn test_child_inherits_only_persistent_tier() {
    let group = RouteGroup::new("/parent")
        .persistent(mark("P"))
        .middleware(mark("G"))
        .route(Method::GET, trail_route(""))
        .child(
            RouteGroup::new("/child")
                .persistent(mark("CP"))
                .route(Method::GET, trail_route(""))
                .child(RouteGroup::new("/grandchild").route(Method::GET, trail_route(""))),
        );

    let router = build(&group).unwrap();

    assert_eq!(send(&router, Method::GET, "/parent").await.1, "P,G");
    assert_eq!(send(&router, Method::GET, "/parent/child").await.1, "P,CP");
    assert_eq!(
        send(&router, Method::GET, "/parent/child/grandchild").await.1,
        "P,CP"
    );
}

#[tokio::test]
async fn test_pre_hook_can_bind_persistent_middleware() {
    let group = RouteGroup::new("/hooked")
        .pre(|scope| {
            scope.layer([mark("HOOK")]);
            Ok(())
        })
        .route(Method::GET, trail_route(""))
        .child(RouteGroup::new("/child").route(Method::GET, trail_route("")));

    let router = build(&group).unwrap();

    assert_eq!(send(&router, Method::GET, "/hooked").await.1, "HOOK");
    assert_eq!(send(&router, Method::GET, "/hooked/child").await.1, "HOOK");
}

#[tokio::test]
async fn test_nested_pre_hook_failure() {
    let group = RouteGroup::new("")
        .route(Method::GET, text_route("/kept", "kept"))
        .child(
            RouteGroup::new("/broken")
                .pre(|_| Err("error".into()))
                .route(Method::GET, text_route("", "never")),
        );

    let mut registry = RouteRegistry::new();
    let err = group.apply_to(&mut registry).unwrap_err();

    assert_eq!(err.to_string(), "pre hook failed for group \"/broken\": error");
    assert_eq!(registry.endpoints(), &[Endpoint::new(Method::GET, "/kept")]);
}

#[tokio::test]
async fn test_rest_group_get_only() {
    let rest = RestGroup::new("").get(text_route("/test", "rest"));

    let router = build(&rest).unwrap();

    let (status, body) = send(&router, Method::GET, "/test").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "rest");
    assert_eq!(
        send(&router, Method::POST, "/test").await.0,
        StatusCode::METHOD_NOT_ALLOWED
    );
}

#[tokio::test]
async fn test_rest_slots_override_embedded_routes() {
    let mut rest = RestGroup::new("/items").get(text_route("", "slot"));
    rest.group
        .routes
        .insert(Method::GET, vec![text_route("", "embedded")]);
    rest.group
        .routes
        .insert(Method::POST, vec![text_route("", "embedded")]);

    let mut registry = RouteRegistry::new();
    rest.apply_to(&mut registry).unwrap();
    assert_eq!(registry.endpoints(), &[Endpoint::new(Method::GET, "/items")]);

    let router = registry.into_router();
    assert_eq!(send(&router, Method::GET, "/items").await.1, "slot");
}

#[tokio::test]
async fn test_rest_rebuild_is_idempotent() {
    let rest = RestGroup::new("/users")
        .get(text_route("", "list"))
        .post(text_route("", "create"))
        .delete(text_route("/{id}", "gone"))
        .with_middleware(mark("G"));

    let mut first = RouteRegistry::new();
    rest.apply_to(&mut first).unwrap();
    let mut second = RouteRegistry::new();
    rest.apply_to(&mut second).unwrap();

    assert_eq!(first.endpoints(), second.endpoints());
    assert_eq!(
        first.endpoints(),
        &[
            Endpoint::new(Method::GET, "/users"),
            Endpoint::new(Method::POST, "/users"),
            Endpoint::new(Method::DELETE, "/users/{id}"),
        ]
    );
}

#[tokio::test]
async fn test_rest_group_mixed_with_generic_children() {
    let group = RouteGroup::new("/api").persistent(mark("API")).child(
        RestGroup::new("/users")
            .get(trail_route(""))
            .with_child(RouteGroup::new("/{id}").route(Method::GET, trail_route(""))),
    );

    let router = build(&group).unwrap();

    assert_eq!(send(&router, Method::GET, "/api/users").await.1, "API");
    assert_eq!(send(&router, Method::GET, "/api/users/7").await.1, "API");
}

#[tokio::test]
async fn test_engine_end_to_end() {
    let engine = Engine::new()
        .middleware(reject_delete())
        .group(RouteGroup::new("").route(Method::GET, text_route("", "GET")))
        .group(
            RouteGroup::new("/test")
                .route(Method::POST, text_route("", "POST"))
                .child(RouteGroup::new("").route(Method::PATCH, text_route("/patch", "PATCH"))),
        );

    let router = engine.build().unwrap();

    assert_eq!(send(&router, Method::GET, "/").await, (StatusCode::OK, "GET".into()));
    assert_eq!(send(&router, Method::POST, "/test").await, (StatusCode::OK, "POST".into()));
    assert_eq!(
        send(&router, Method::PATCH, "/test/patch").await,
        (StatusCode::OK, "PATCH".into())
    );

    let (status, body) = send(&router, Method::DELETE, "/test/patch").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "DELETE not allowed");
}

#[tokio::test]
async fn test_engine_middleware_runs_before_tree() {
    let engine = Engine::new()
        .middleware(mark("E1"))
        .middleware(mark("E2"))
        .group(
            RouteGroup::new("/t")
                .persistent(mark("P"))
                .route(Method::GET, trail_route("")),
        );

    let router = engine.build().unwrap();

    assert_eq!(send(&router, Method::GET, "/t").await.1, "E1,E2,P");
}

#[tokio::test]
async fn test_duplicate_route_across_groups() {
    let group = RouteGroup::new("")
        .child(RouteGroup::new("/a").route(Method::GET, text_route("/x", "one")))
        .child(RouteGroup::new("").route(Method::GET, text_route("/a/x", "two")));

    let err = build(&group).unwrap_err();
    assert!(matches!(
        err,
        BuildError::DuplicateRoute { ref path, .. } if path == "/a/x"
    ));
}

#[tokio::test]
async fn test_legacy_capture_syntax_rejected() {
    let group = RouteGroup::new("/users").route(Method::GET, text_route("/:id", "x"));

    assert!(matches!(build(&group), Err(BuildError::InvalidPath { .. })));
}

#[tokio::test]
async fn test_undeclared_method_skips_route_chains() {
    let group = RouteGroup::new("/shared")
        .persistent(mark("P"))
        .middleware(mark("G"))
        .route(Method::GET, trail_route("").with_middleware(mark("GET")))
        .route(Method::POST, trail_route("").with_middleware(reject_delete()));

    let router = build(&group).unwrap();

    assert_eq!(send(&router, Method::GET, "/shared").await.1, "P,G,GET");
    assert_eq!(send(&router, Method::POST, "/shared").await.1, "P,G");

    // DELETE is not declared here, so no chain runs and the guard never answers.
    let (status, body) = send(&router, Method::DELETE, "/shared").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_conflicting_captures_rejected() {
    let group = RouteGroup::new("/users")
        .route(Method::GET, text_route("/{id}", "by id"))
        .route(Method::POST, text_route("/{name}", "by name"));

    let mut registry = RouteRegistry::new();
    let err = group.apply_to(&mut registry).unwrap_err();

    assert!(matches!(
        err,
        BuildError::ConflictingRoute { ref path, .. } if path == "/users/{name}"
    ));
    assert_eq!(registry.endpoints(), &[Endpoint::new(Method::GET, "/users/{id}")]);
    assert!(matches!(build(&group), Err(BuildError::ConflictingRoute { .. })));
}
