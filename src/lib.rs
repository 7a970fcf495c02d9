//! Declarative route trees for axum.
//!
//! Describe an application as nested route groups, each with a path prefix,
//! persistent / group / route middleware tiers, method-keyed routes, hooks
//! and children, then build it once into an `axum::Router`.

pub mod config;
pub mod demo;
pub mod engine;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::ServerConfig;
pub use engine::{build, Engine, EngineHook};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{
    Apply, BuildError, Endpoint, Middleware, RestGroup, Route, RouteGroup, RouteRegistry, Scope,
};
