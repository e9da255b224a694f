//! Built-in gases.
//!
//! Each gas is constructed from an explicit, immutable configuration value
//! and registered on the router with [`Router::gas`](crate::Router::gas):
//!
//! ```rust,no_run
//! use breeze::{Router, gases};
//!
//! let app = Router::new().gas(gases::cors::cors());
//! ```

pub mod cors;
