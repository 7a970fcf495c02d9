//! Declarative route trees.
//!
//! # Data Flow
//! ```text
//! Caller assembles the tree (at startup):
//!     RouteGroup / RestGroup
//!         ├── base_path, middleware tiers, hooks
//!         ├── routes: Method → [Route]
//!         └── children: [Box<dyn Apply>]
//!
//! Build:
//!     RouteRegistry::new()         (empty axum::Router)
//!     → root Scope ("/")
//!     → group.rs (mount, pre hook, own routes, children, post hook)
//!     → route.rs (missing-handler check, chain assembly)
//!     → scope.rs (join path, prepend persistent middleware, register)
//!     → axum::Router, or the first BuildError
//! ```
//!
//! # Middleware order
//! For one matched route, middleware runs as:
//! persistent (outermost group first) → group → route → handler.
//! Persistent middleware is inherited by child groups; group middleware is
//! not.
//!
//! # Design Decisions
//! - Trees are built once and only borrowed by the traversal
//! - No validation at construction; misconfiguration surfaces at build time
//! - First failure wins, nothing is rolled back
//! - Methods register in a fixed order so builds are reproducible

pub mod error;
pub mod group;
pub mod middleware;
pub mod rest;
pub mod route;
pub mod scope;

pub use error::{BuildError, HookError, HookStage};
pub use group::{Apply, Hook, RouteGroup};
pub use middleware::Middleware;
pub use rest::RestGroup;
pub use route::{BoxedHandler, Route};
pub use scope::{Endpoint, RouteRegistry, Scope};
