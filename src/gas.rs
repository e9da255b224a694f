//! The gas (middleware) abstraction.
//!
//! A gas is one link in the handler chain: it receives the *next* handler
//! and returns a new handler that may do work before and after invoking it —
//! or never invoke it at all and terminate the chain with its own response.
//!
//! Gases registered on a [`Router`](crate::Router) are composed right-to-left
//! when the router is finalised: the first registered gas is the outermost
//! link, the route handler the innermost. The same chain wraps the router's
//! 404 fallback, so gases see every request the server accepts — a CORS
//! preflight for a route with no `OPTIONS` registration included.
//! Composition happens once, at startup — the per-request cost of a chained
//! route is one extra Arc clone and one extra vtable call per gas.
//!
//! # Writing a gas
//!
//! Any closure from `BoxedHandler` to `BoxedHandler` is a gas. Built-in
//! gases such as [`cors`](crate::gases::cors) are constructed from a
//! configuration value and capture it immutably; there is no global
//! configuration state anywhere in the chain.

use std::sync::Arc;

use crate::handler::BoxedHandler;

/// One link in the handler chain.
///
/// Implemented automatically for any `Fn(BoxedHandler) -> BoxedHandler`
/// closure, which is how built-in gases are written.
pub trait Gas: Send + Sync + 'static {
    /// Wraps `next`, returning the combined handler.
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler;
}

impl<F> Gas for F
where
    F: Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static,
{
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        (self)(next)
    }
}

/// Type-erased gas as stored by the router.
pub(crate) type BoxedGas = Arc<dyn Gas>;
