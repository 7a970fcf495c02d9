//! REST-style groups: one named slot per method instead of a route map.

use std::collections::HashMap;

use axum::http::Method;

use crate::routing::error::BuildError;
use crate::routing::group::{Apply, RouteGroup};
use crate::routing::middleware::Middleware;
use crate::routing::route::Route;
use crate::routing::scope::Scope;

/// A route group with `get`, `post`, `put`, `patch` and `delete` slots.
///
/// When applied, the slots holding a handler are the group's routes; the
/// embedded group's own `routes` map is ignored.
#[derive(Debug, Default)]
pub struct RestGroup {
    pub get: Option<Route>,
    pub post: Option<Route>,
    pub put: Option<Route>,
    pub patch: Option<Route>,
    pub delete: Option<Route>,
    /// Base path, middleware tiers, hooks and children.
    pub group: RouteGroup,
}

impl RestGroup {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            group: RouteGroup::new(base_path),
            ..Self::default()
        }
    }

    pub fn get(mut self, route: Route) -> Self {
        self.get = Some(route);
        self
    }

    pub fn post(mut self, route: Route) -> Self {
        self.post = Some(route);
        self
    }

    pub fn put(mut self, route: Route) -> Self {
        self.put = Some(route);
        self
    }

    pub fn patch(mut self, route: Route) -> Self {
        self.patch = Some(route);
        self
    }

    pub fn delete(mut self, route: Route) -> Self {
        self.delete = Some(route);
        self
    }

    pub fn with_middleware(mut self, middleware: Middleware) -> Self {
        self.group.middlewares.push(middleware);
        self
    }

    pub fn with_persistent(mut self, middleware: Middleware) -> Self {
        self.group.persistent_middlewares.push(middleware);
        self
    }

    pub fn with_child(mut self, child: impl Apply + 'static) -> Self {
        self.group.children.push(Box::new(child));
        self
    }

    /// Replace the embedded group, keeping the slots.
    pub fn with_group(mut self, group: RouteGroup) -> Self {
        self.group = group;
        self
    }

    /// The route map the slots expand to.
    pub fn routes(&self) -> HashMap<Method, Vec<Route>> {
        [
            (Method::GET, &self.get),
            (Method::POST, &self.post),
            (Method::PUT, &self.put),
            (Method::PATCH, &self.patch),
            (Method::DELETE, &self.delete),
        ]
        .into_iter()
        .filter_map(|(method, slot)| match slot {
            Some(route) if route.has_handler() => Some((method, vec![route.clone()])),
            _ => None,
        })
        .collect()
    }
}

impl Apply for RestGroup {
    fn apply<'s>(&self, parent: &'s mut Scope<'_>) -> Result<Scope<'s>, BuildError> {
        let routes = self.routes();
        self.group.apply_with(parent, &routes)
    }
}
