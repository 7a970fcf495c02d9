//! Top-level build entry points.
//!
//! # Responsibilities
//! - Create the one fresh registry a build populates
//! - Apply the tree (or the engine's groups) to its root scope
//! - Hand back a ready-to-serve `axum::Router`, or the first error
//!
//! # Design Decisions
//! - No router is returned on failure; a partially built one is dropped
//! - Engine-wide middleware is layered onto the finished router so it also
//!   answers for unmatched paths and methods

use std::fmt;
use std::sync::Arc;

use axum::Router;

use crate::routing::{Apply, BuildError, HookError, HookStage, Middleware, RouteRegistry};

const ENGINE: &str = "<engine>";

/// Build `root` onto a fresh router mounted at `/`.
pub fn build(root: &dyn Apply) -> Result<Router, BuildError> {
    let mut registry = RouteRegistry::new();
    if let Err(e) = root.apply(&mut registry.root()) {
        tracing::warn!(error = %e, "Route build aborted");
        return Err(e);
    }

    tracing::debug!(routes = registry.endpoints().len(), "Route build complete");
    Ok(registry.into_router())
}

type EngineHookFn = dyn Fn() -> Result<(), HookError> + Send + Sync;

/// Hook run once before or after a whole engine build.
#[derive(Clone)]
pub struct EngineHook(Arc<EngineHookFn>);

impl EngineHook {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> Result<(), HookError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    fn run(&self) -> Result<(), HookError> {
        (self.0)()
    }
}

impl fmt::Debug for EngineHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineHook").finish_non_exhaustive()
    }
}

/// An application: global middleware plus a list of top-level groups.
#[derive(Default)]
pub struct Engine {
    /// Wraps the whole router, including 404 and 405 responses. Runs before
    /// any group middleware.
    pub middlewares: Vec<Middleware>,
    /// Applied in order to the root scope.
    pub groups: Vec<Box<dyn Apply>>,
    pub pre: Option<EngineHook>,
    pub post: Option<EngineHook>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn middleware(mut self, middleware: Middleware) -> Self {
        self.middlewares.push(middleware);
        self
    }

    pub fn group(mut self, group: impl Apply + 'static) -> Self {
        self.groups.push(Box::new(group));
        self
    }

    pub fn pre<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.pre = Some(EngineHook::new(f));
        self
    }

    pub fn post<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.post = Some(EngineHook::new(f));
        self
    }

    /// Apply every group to a fresh registry without finishing the router.
    ///
    /// On error the registry is dropped with whatever it already held.
    pub fn registry(&self) -> Result<RouteRegistry, BuildError> {
        if let Some(hook) = &self.pre {
            hook.run()
                .map_err(|e| BuildError::hook(HookStage::Pre, ENGINE, e))?;
        }

        let mut registry = RouteRegistry::new();
        {
            let mut root = registry.root();
            for group in &self.groups {
                group.apply(&mut root)?;
            }
        }

        if let Some(hook) = &self.post {
            hook.run()
                .map_err(|e| BuildError::hook(HookStage::Post, ENGINE, e))?;
        }

        Ok(registry)
    }

    /// Build the router.
    pub fn build(&self) -> Result<Router, BuildError> {
        let registry = match self.registry() {
            Ok(registry) => registry,
            Err(e) => {
                tracing::warn!(error = %e, "Engine build aborted");
                return Err(e);
            }
        };

        for endpoint in registry.endpoints() {
            tracing::debug!(route = %endpoint, "Route ready");
        }
        tracing::info!(
            routes = registry.endpoints().len(),
            global_middlewares = self.middlewares.len(),
            "Engine build complete"
        );

        let router = registry.into_router();
        // Outermost layer is added last; keep declaration order at runtime.
        Ok(self
            .middlewares
            .iter()
            .rev()
            .fold(router, |router, mw| mw.wrap_router(router)))
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("middlewares", &self.middlewares.len())
            .field("groups", &self.groups.len())
            .field("pre", &self.pre.is_some())
            .field("post", &self.post.is_some())
            .finish()
    }
}
