//! Leaf routes.

use std::fmt;
use std::sync::Arc;

use axum::{
    handler::Handler,
    http::Method,
    routing::{on, MethodFilter, MethodRouter},
};

use crate::routing::error::BuildError;
use crate::routing::middleware::Middleware;
use crate::routing::scope::Scope;

type MakeRoute = dyn Fn(MethodFilter) -> MethodRouter + Send + Sync;

/// Any axum handler, with its extractor signature erased.
#[derive(Clone)]
pub struct BoxedHandler {
    make: Arc<MakeRoute>,
}

impl BoxedHandler {
    pub fn new<H, T>(handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        Self {
            make: Arc::new(move |filter: MethodFilter| -> MethodRouter {
                on(filter, handler.clone())
            }),
        }
    }

    pub(crate) fn method_router(&self, filter: MethodFilter) -> MethodRouter {
        (self.make)(filter)
    }
}

impl fmt::Debug for BoxedHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxedHandler").finish_non_exhaustive()
    }
}

/// One endpoint: a handler at a path relative to its group, with its own
/// middleware.
///
/// A route without a handler can be declared; it is rejected when the tree
/// is applied.
#[derive(Debug, Clone, Default)]
pub struct Route {
    /// Path relative to the owning group's mount point. Empty registers at
    /// the group's own path.
    pub path: String,
    pub handler: Option<BoxedHandler>,
    /// Run after every group-level middleware, right before the handler.
    pub middlewares: Vec<Middleware>,
}

impl Route {
    /// Route at the group's own path.
    pub fn new<H, T>(handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        Self {
            handler: Some(BoxedHandler::new(handler)),
            ..Self::default()
        }
    }

    /// Route at `path` relative to the group.
    pub fn at<H, T>(path: impl Into<String>, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        Self {
            path: path.into(),
            ..Self::new(handler)
        }
    }

    pub fn with_middleware(mut self, middleware: Middleware) -> Self {
        self.middlewares.push(middleware);
        self
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Register this route on `scope` under `method`.
    ///
    /// The chain is `inherited`, then this route's middlewares, then the
    /// handler. The scope's persistent middleware runs ahead of all of it.
    pub fn apply(
        &self,
        scope: &mut Scope<'_>,
        method: &Method,
        inherited: &[Middleware],
    ) -> Result<(), BuildError> {
        let Some(handler) = &self.handler else {
            return Err(BuildError::MissingHandler {
                method: method.clone(),
                path: self.path.clone(),
                scope: scope.path().to_string(),
            });
        };

        let mut chain = Vec::with_capacity(inherited.len() + self.middlewares.len());
        chain.extend(inherited.iter().cloned());
        chain.extend(self.middlewares.iter().cloned());

        scope.handle(method.clone(), &self.path, &chain, handler)
    }
}
