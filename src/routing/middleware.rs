//! Type-erased middleware.
//!
//! A `Middleware` has the same shape as a function passed to
//! `axum::middleware::from_fn`: it receives the request and the rest of the
//! chain, and may answer on its own instead of calling `next.run(req)`.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::Request,
    middleware::{from_fn, FromFnLayer, Next},
    response::{IntoResponse, Response},
    routing::MethodRouter,
    Router,
};
use futures_util::future::BoxFuture;

type MiddlewareFn = dyn Fn(Request, Next) -> BoxFuture<'static, Response> + Send + Sync;

/// One request-processing step in a handler chain.
#[derive(Clone)]
pub struct Middleware {
    inner: Arc<MiddlewareFn>,
}

impl Middleware {
    /// Wrap an async function of `(Request, Next)`.
    pub fn from_fn<F, Fut, Out>(f: F) -> Self
    where
        F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Out> + Send + 'static,
        Out: IntoResponse + 'static,
    {
        Self {
            inner: Arc::new(move |req: Request, next: Next| -> BoxFuture<'static, Response> {
                let fut = f(req, next);
                Box::pin(async move { fut.await.into_response() })
            }),
        }
    }

    /// Run this step, handing the request on through `next`.
    pub async fn call(&self, req: Request, next: Next) -> Response {
        (self.inner)(req, next).await
    }

    /// `from_fn` layer running this step.
    fn layer(
        &self,
    ) -> FromFnLayer<impl Fn(Request, Next) -> BoxFuture<'static, Response> + Clone, (), (Request,)>
    {
        let mw = self.clone();
        from_fn(move |req: Request, next: Next| -> BoxFuture<'static, Response> {
            let mw = mw.clone();
            Box::pin(async move { mw.call(req, next).await })
        })
    }

    /// Wrap a method router so this step runs before its handlers. The 405
    /// fallback is left unwrapped.
    pub(crate) fn wrap(&self, router: MethodRouter) -> MethodRouter {
        router.route_layer(self.layer())
    }

    /// Wrap a whole router, fallbacks included.
    pub(crate) fn wrap_router(&self, router: Router) -> Router {
        router.layer(self.layer())
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware").finish_non_exhaustive()
    }
}

/// Layer `chain` onto `router` so that `chain[0]` runs first.
pub(crate) fn layer_chain(router: MethodRouter, chain: &[Middleware]) -> MethodRouter {
    // The last layer added is the outermost, so add in reverse.
    chain.iter().rev().fold(router, |router, mw| mw.wrap(router))
}
