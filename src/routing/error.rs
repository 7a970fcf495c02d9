//! Build-time errors.
//!
//! Every failure aborts the traversal at the node where it happened and is
//! returned unchanged through all ancestors. Nothing registered before the
//! failure is rolled back, so a router that produced an error must be
//! discarded.

use std::fmt;

use axum::http::Method;
use thiserror::Error;

/// Error signalled by a caller-supplied hook.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Which side of a registration step a hook ran on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    Pre,
    Post,
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookStage::Pre => write!(f, "pre"),
            HookStage::Post => write!(f, "post"),
        }
    }
}

/// Error returned by a failed build.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A declared route has no handler.
    #[error("handler is missing for route {path:?} ({method} under {scope:?})")]
    MissingHandler {
        method: Method,
        path: String,
        scope: String,
    },

    /// A pre or post hook returned an error.
    #[error("{stage} hook failed for group {group:?}: {source}")]
    Hook {
        stage: HookStage,
        group: String,
        #[source]
        source: HookError,
    },

    /// The same method and full path were registered twice.
    #[error("route {method} {path} is already registered")]
    DuplicateRoute { method: Method, path: String },

    /// The method has no axum `MethodFilter` equivalent.
    #[error("method {0} cannot be routed")]
    UnsupportedMethod(Method),

    /// The full path would be rejected by the router.
    #[error("invalid route path {path:?}: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    /// The full path overlaps a path already registered, e.g. two captures
    /// with different names at the same position.
    #[error("route path {path:?} conflicts with an existing route: {source}")]
    ConflictingRoute {
        path: String,
        #[source]
        source: matchit::InsertError,
    },
}

impl BuildError {
    pub(crate) fn hook(stage: HookStage, group: &str, source: HookError) -> Self {
        BuildError::Hook {
            stage,
            group: group.to_string(),
            source,
        }
    }
}
