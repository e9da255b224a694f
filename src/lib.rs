//! # breeze
//!
//! A thin HTTP framework over hyper with a **gas** (middleware) chain.
//! Nothing more. Nothing less.
//!
//! ## The contract
//!
//! hyper owns the wire: connection handling, HTTP/1.1 and HTTP/2, header
//! parsing. The fronting proxy owns deployment concerns: TLS termination,
//! rate limiting, body-size limits, slow clients. What's left for breeze is
//! the part that changes between applications:
//!
//! - Radix-tree routing — O(path-length) lookup via [`matchit`]
//! - A gas chain — each gas wraps the next handler and may answer early
//! - Built-in CORS — [`gases::cors`], preflight and simple requests
//! - Graceful shutdown — SIGTERM / Ctrl-C, drains in-flight requests
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use breeze::{Request, Response, Router, Server, StatusCode, gases};
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = Router::new()
//!         .gas(gases::cors::cors())
//!         .get("/users/{id}", get_user)
//!         .post("/users",     create_user);
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//!
//! async fn get_user(req: Request) -> Response {
//!     let id = req.param("id").unwrap_or("unknown");
//!     // breeze sends bytes — it doesn't care how you build them:
//!     //   serde_json::to_vec(&user).unwrap()
//!     //   format!(r#"{{"id":"{id}"}}"#).into_bytes()
//!     # let bytes: Vec<u8> = vec![];
//!     Response::json(bytes)
//! }
//!
//! async fn create_user(req: Request) -> Response {
//!     if req.body().is_empty() {
//!         return Response::status(StatusCode::BAD_REQUEST);
//!     }
//!     # let bytes: Vec<u8> = vec![];
//!     Response::builder()
//!         .status(StatusCode::CREATED)
//!         .header("location", "/users/99")
//!         .json(bytes)
//! }
//! ```

mod error;
mod gas;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;

pub mod gases;
pub mod health;

pub use error::Error;
pub use gas::Gas;
pub use handler::Handler;
pub use method::Method;
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;

/// Re-exported from the [`http`] crate — used for `Response::status` and
/// available as a bare handler return value.
pub use http::StatusCode;
