//! Mount points on the underlying axum router.
//!
//! # Responsibilities
//! - Own the `axum::Router` being populated during a build
//! - Derive child scopes by joining path segments
//! - Carry scope-wide (persistent) middleware down to everything registered
//!   through a scope or its descendants, including later registrations
//! - Register `(method, path, chain)` tuples and record them for inspection
//!
//! # Design Decisions
//! - axum's `Router::layer` only wraps routes that already exist, so
//!   persistent middleware is tracked on the scope and prepended to each
//!   chain at registration time instead
//! - Conditions axum would panic on (duplicate method+path, unsupported
//!   method, legacy `:param` syntax, conflicting captures) are reported as
//!   `BuildError`s. Conflicts are found by inserting each new path into a
//!   `matchit` tree of its own before axum sees it
//! - A scope borrows the registry mutably; build exclusivity is a borrow
//!   rule, not a lock

use std::fmt;

use axum::{
    http::Method,
    routing::{MethodFilter, MethodRouter},
    Router,
};
use serde::{Serialize, Serializer};

use crate::routing::error::BuildError;
use crate::routing::middleware::{layer_chain, Middleware};
use crate::routing::route::BoxedHandler;

/// One registered `(method, path)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    #[serde(serialize_with = "serialize_method")]
    pub method: Method,
    pub path: String,
}

impl Endpoint {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<7} {}", self.method.as_str(), self.path)
    }
}

fn serialize_method<S: Serializer>(method: &Method, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(method.as_str())
}

/// The router under construction plus its endpoint table.
#[derive(Default)]
pub struct RouteRegistry {
    router: Router,
    /// Every distinct path, mirroring axum's route tree.
    paths: matchit::Router<()>,
    endpoints: Vec<Endpoint>,
}

impl RouteRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level scope: empty prefix, no persistent middleware.
    pub fn root(&mut self) -> Scope<'_> {
        Scope {
            registry: self,
            prefix: "/".to_string(),
            layers: Vec::new(),
        }
    }

    /// Registered endpoints, in registration order.
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn contains(&self, method: &Method, path: &str) -> bool {
        self.endpoints
            .iter()
            .any(|e| &e.method == method && e.path == path)
    }

    /// Hand over the populated router.
    pub fn into_router(self) -> Router {
        self.router
    }

    fn register(
        &mut self,
        method: Method,
        path: String,
        route: MethodRouter,
    ) -> Result<(), BuildError> {
        if self.contains(&method, &path) {
            return Err(BuildError::DuplicateRoute { method, path });
        }

        if !self.endpoints.iter().any(|e| e.path == path) {
            self.paths
                .insert(path.as_str(), ())
                .map_err(|source| BuildError::ConflictingRoute {
                    path: path.clone(),
                    source,
                })?;
        }

        // Routes on an existing path are merged by axum.
        self.router = std::mem::take(&mut self.router).route(&path, route);
        self.endpoints.push(Endpoint::new(method, path));
        Ok(())
    }
}

impl fmt::Debug for RouteRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteRegistry")
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

/// A mount point: a path prefix plus the middleware bound to it.
pub struct Scope<'r> {
    registry: &'r mut RouteRegistry,
    prefix: String,
    layers: Vec<Middleware>,
}

impl<'r> Scope<'r> {
    /// Full path of this mount point.
    pub fn path(&self) -> &str {
        &self.prefix
    }

    /// Number of persistent middlewares bound here, ancestors included.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn registry(&self) -> &RouteRegistry {
        &*self.registry
    }

    /// Derive a child scope under `segment`. The child starts with this
    /// scope's persistent middleware.
    pub fn group(&mut self, segment: &str) -> Scope<'_> {
        Scope {
            prefix: join_paths(&self.prefix, segment),
            layers: self.layers.clone(),
            registry: &mut *self.registry,
        }
    }

    /// Bind middleware to this scope. Applies to every route registered
    /// afterwards through this scope or any scope derived from it.
    pub fn layer<I>(&mut self, middlewares: I)
    where
        I: IntoIterator<Item = Middleware>,
    {
        self.layers.extend(middlewares);
    }

    /// Register `handler` for `method` at `path` relative to this scope.
    /// `chain` runs after the scope's persistent middleware, in order.
    pub fn handle(
        &mut self,
        method: Method,
        path: &str,
        chain: &[Middleware],
        handler: &BoxedHandler,
    ) -> Result<(), BuildError> {
        let full_path = join_paths(&self.prefix, path);
        validate_path(&full_path)?;

        let filter = MethodFilter::try_from(method.clone())
            .map_err(|_| BuildError::UnsupportedMethod(method.clone()))?;

        let mut layers = Vec::with_capacity(self.layers.len() + chain.len());
        layers.extend(self.layers.iter().cloned());
        layers.extend(chain.iter().cloned());

        let route = layer_chain(handler.method_router(filter), &layers);

        tracing::debug!(
            method = %method,
            path = %full_path,
            chain_len = layers.len(),
            "Registering route"
        );

        self.registry.register(method, full_path, route)
    }
}

impl fmt::Debug for Scope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("prefix", &self.prefix)
            .field("layers", &self.layers.len())
            .finish_non_exhaustive()
    }
}

/// Join a relative segment onto an absolute path.
///
/// Empty segments are dropped, so `""`, `"/"` and `"//"` add nothing. A
/// trailing slash on `relative` is kept.
pub fn join_paths(absolute: &str, relative: &str) -> String {
    if relative.is_empty() {
        return if absolute.is_empty() {
            "/".to_string()
        } else {
            absolute.to_string()
        };
    }

    let mut joined = String::with_capacity(absolute.len() + relative.len() + 1);
    for segment in absolute
        .split('/')
        .chain(relative.split('/'))
        .filter(|s| !s.is_empty())
    {
        joined.push('/');
        joined.push_str(segment);
    }

    if relative.ends_with('/') || joined.is_empty() {
        joined.push('/');
    }
    joined
}

fn validate_path(path: &str) -> Result<(), BuildError> {
    let invalid = |reason| BuildError::InvalidPath {
        path: path.to_string(),
        reason,
    };

    let segments: Vec<&str> = path.split('/').collect();
    for (i, segment) in segments.iter().enumerate() {
        if segment.starts_with(':') {
            return Err(invalid("captures are written `{name}`, not `:name`"));
        }
        if segment.starts_with('*') {
            return Err(invalid("wildcards are written `{*name}`, not `*name`"));
        }
        if segment.starts_with("{*") && i + 1 != segments.len() {
            return Err(invalid("a wildcard capture must be the last segment"));
        }
    }
    Ok(())
}
