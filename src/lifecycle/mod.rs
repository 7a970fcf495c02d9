//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Load config → Init logging → Build route tree → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Trigger or Ctrl+C → Stop accepting → Drain in-flight requests → Exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: a route build error stops startup before binding
//! - The listener is bound last (traffic only when ready)

pub mod shutdown;

pub use shutdown::Shutdown;
