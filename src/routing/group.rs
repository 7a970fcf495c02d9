//! Route groups and the apply traversal.
//!
//! # Apply order
//! ```text
//! parent scope
//!     → mount: join base_path, bind persistent middlewares
//!     → pre hook
//!     → own routes (canonical method order, list order within a method)
//!     → children (list order, each mounted under this scope)
//!     → post hook
//!     → mounted scope returned
//! ```
//!
//! The first error at any step stops the node and is returned as-is through
//! every ancestor. Registrations made before the error stay in place.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::http::Method;

use crate::routing::error::{BuildError, HookError, HookStage};
use crate::routing::middleware::Middleware;
use crate::routing::route::Route;
use crate::routing::scope::{RouteRegistry, Scope};

/// Anything that can be mounted under a scope.
pub trait Apply: Send + Sync {
    /// Mount under `parent` and register everything this node owns.
    /// Returns the scope the node was mounted at.
    fn apply<'s>(&self, parent: &'s mut Scope<'_>) -> Result<Scope<'s>, BuildError>;

    /// Mount at the root of `registry`.
    fn apply_to(&self, registry: &mut RouteRegistry) -> Result<(), BuildError> {
        self.apply(&mut registry.root()).map(|_| ())
    }
}

type HookFn = dyn Fn(&mut Scope<'_>) -> Result<(), HookError> + Send + Sync;

/// Callback run against a group's mounted scope before or after its
/// registration step.
#[derive(Clone)]
pub struct Hook(Arc<HookFn>);

impl Hook {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Scope<'_>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    fn run(&self, scope: &mut Scope<'_>) -> Result<(), HookError> {
        (self.0)(scope)
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook").finish_non_exhaustive()
    }
}

/// A subtree: a path prefix, three middleware tiers, routes keyed by method,
/// hooks and nested groups.
#[derive(Default)]
pub struct RouteGroup {
    /// Joined onto the parent's mount point. Empty adds no segment.
    pub base_path: String,
    /// Applied to this group's own routes only, after persistent middlewares.
    pub middlewares: Vec<Middleware>,
    /// Bound to this group's scope and inherited by all descendants.
    pub persistent_middlewares: Vec<Middleware>,
    pub routes: HashMap<Method, Vec<Route>>,
    pub pre_hook: Option<Hook>,
    pub post_hook: Option<Hook>,
    pub children: Vec<Box<dyn Apply>>,
}

impl RouteGroup {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            ..Self::default()
        }
    }

    pub fn route(mut self, method: Method, route: Route) -> Self {
        self.routes.entry(method).or_default().push(route);
        self
    }

    pub fn middleware(mut self, middleware: Middleware) -> Self {
        self.middlewares.push(middleware);
        self
    }

    pub fn persistent(mut self, middleware: Middleware) -> Self {
        self.persistent_middlewares.push(middleware);
        self
    }

    pub fn pre<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Scope<'_>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.pre_hook = Some(Hook::new(f));
        self
    }

    pub fn post<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Scope<'_>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.post_hook = Some(Hook::new(f));
        self
    }

    pub fn child(mut self, child: impl Apply + 'static) -> Self {
        self.children.push(Box::new(child));
        self
    }

    /// Apply this group with `routes` standing in for its own route map.
    pub(crate) fn apply_with<'s>(
        &self,
        parent: &'s mut Scope<'_>,
        routes: &HashMap<Method, Vec<Route>>,
    ) -> Result<Scope<'s>, BuildError> {
        let mut scope = parent.group(&self.base_path);
        scope.layer(self.persistent_middlewares.iter().cloned());

        tracing::debug!(
            path = %scope.path(),
            persistent = self.persistent_middlewares.len(),
            "Mounting route group"
        );

        if let Some(hook) = &self.pre_hook {
            hook.run(&mut scope)
                .map_err(|e| BuildError::hook(HookStage::Pre, scope.path(), e))?;
        }

        for method in ordered_methods(routes) {
            for route in &routes[method] {
                route.apply(&mut scope, method, &self.middlewares)?;
            }
        }

        for child in &self.children {
            child.apply(&mut scope)?;
        }

        if let Some(hook) = &self.post_hook {
            hook.run(&mut scope)
                .map_err(|e| BuildError::hook(HookStage::Post, scope.path(), e))?;
        }

        Ok(scope)
    }
}

impl fmt::Debug for RouteGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteGroup")
            .field("base_path", &self.base_path)
            .field("middlewares", &self.middlewares.len())
            .field("persistent_middlewares", &self.persistent_middlewares.len())
            .field("routes", &self.routes)
            .field("children", &self.children.len())
            .finish_non_exhaustive()
    }
}

impl Apply for RouteGroup {
    fn apply<'s>(&self, parent: &'s mut Scope<'_>) -> Result<Scope<'s>, BuildError> {
        self.apply_with(parent, &self.routes)
    }
}

/// Registration order for the methods present in `routes`: GET, POST, PUT,
/// PATCH, DELETE, then any other method by name.
pub fn ordered_methods(routes: &HashMap<Method, Vec<Route>>) -> Vec<&Method> {
    let mut methods: Vec<&Method> = routes.keys().collect();
    methods.sort_by(|a, b| {
        method_rank(a)
            .cmp(&method_rank(b))
            .then_with(|| a.as_str().cmp(b.as_str()))
    });
    methods
}

fn method_rank(method: &Method) -> u8 {
    match *method {
        Method::GET => 0,
        Method::POST => 1,
        Method::PUT => 2,
        Method::PATCH => 3,
        Method::DELETE => 4,
        _ => 5,
    }
}
