//! Radix-tree request router and gas chain assembly.
//!
//! One tree per HTTP method, O(path-length) lookup via [`matchit`]. Routes
//! and gases are collected during registration; when the server starts, the
//! gas chain is composed right-to-left around every handler exactly once.
//! Nothing is wrapped, allocated, or locked on the per-request path.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::gas::{BoxedGas, Gas};
use crate::handler::{self, BoxFuture, BoxedHandler, Handler};
use crate::method::Method;
use crate::response::Response;

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Each registration call returns `self` so calls chain naturally.
///
/// ```rust,no_run
/// # use breeze::{Method, Request, Response, Router, gases};
/// # async fn get_user(_: Request) -> Response { Response::text("") }
/// # async fn create_user(_: Request) -> Response { Response::text("") }
/// Router::new()
///     .gas(gases::cors::cors())
///     .get("/users/{id}", get_user)
///     .post("/users",     create_user);
/// ```
pub struct Router {
    gases: Vec<BoxedGas>,
    routes: Vec<(Method, String, BoxedHandler)>,
}

impl Router {
    pub fn new() -> Self {
        Self { gases: Vec::new(), routes: Vec::new() }
    }

    /// Registers a gas. Gases apply to every route on this router — and to
    /// the 404 fallback for unmatched requests, so a CORS preflight for a
    /// `POST`-only route is still answered — in registration order: the
    /// first registered gas sees the request first and the response last.
    pub fn gas(mut self, gas: impl Gas) -> Self {
        self.gases.push(Arc::new(gas));
        self
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax — `req.param("name")` retrieves them.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes.push((method, path.to_owned(), handler.into_boxed_handler()));
        self
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Delete, path, handler)
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, path, handler)
    }

    pub fn options(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Options, path, handler)
    }

    pub fn patch(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Patch, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Post, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Put, path, handler)
    }

    /// Composes the gas chain around every registered handler and builds
    /// the per-method radix trees. Called once, by the server, at startup.
    ///
    /// The chain is also composed around a `404 Not Found` fallback, which
    /// answers every request no registered route matches. Gases therefore
    /// see *every* request — in particular a browser preflight
    /// (`OPTIONS /users` ahead of a `POST`) for a route that only exists
    /// under `POST` still reaches the CORS gas instead of a bare 404.
    ///
    /// # Panics
    ///
    /// Panics on an invalid or conflicting route pattern — a registration
    /// bug, surfaced before the server accepts a single connection.
    pub(crate) fn finish(self) -> RouteTable {
        let mut trees: HashMap<Method, MatchitRouter<BoxedHandler>> = HashMap::new();

        for (method, path, handler) in self.routes {
            // Right-to-left: the last registered gas wraps the handler
            // first, leaving the first registered gas outermost.
            let chained = self
                .gases
                .iter()
                .rev()
                .fold(handler, |next, gas| gas.wrap(next));

            trees
                .entry(method)
                .or_default()
                .insert(&path, chained)
                .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        }

        let not_found = handler::from_fn(|_req| {
            Box::pin(async { Response::status(http::StatusCode::NOT_FOUND) }) as BoxFuture
        });
        let fallback = self
            .gases
            .iter()
            .rev()
            .fold(not_found, |next, gas| gas.wrap(next));

        RouteTable { trees, fallback }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

// ── RouteTable ────────────────────────────────────────────────────────────────

/// The finalised, immutable routing table the server dispatches against.
pub(crate) struct RouteTable {
    trees: HashMap<Method, MatchitRouter<BoxedHandler>>,
    /// Gas-wrapped `404 Not Found` handler for requests no route matches.
    fallback: BoxedHandler,
}

impl RouteTable {
    /// Resolves a request to its gas-wrapped handler. Never misses: an
    /// unmatched method/path pair resolves to the fallback, so the gas
    /// chain runs for every request the server accepts.
    pub(crate) fn route(
        &self,
        method: Method,
        path: &str,
    ) -> (BoxedHandler, HashMap<String, String>) {
        let matched = self.trees.get(&method).and_then(|tree| tree.at(path).ok());
        match matched {
            Some(matched) => {
                let handler = Arc::clone(matched.value);
                let params = matched.params.iter()
                    .map(|(k, v)| (k.to_owned(), v.to_owned()))
                    .collect();
                (handler, params)
            }
            None => (Arc::clone(&self.fallback), HashMap::new()),
        }
    }
}
