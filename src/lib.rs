//! # pathrouter
//!
//! **pathrouter** is a minimal HTTP request router: routes are registered per
//! method as path templates with `:name` placeholders, and each request is
//! dispatched to the first registered route whose template matches its path.
//!
//! ## Architecture
//!
//! - **[`router`]** - Template compilation, path matching and the per-method route table
//! - **[`dispatcher`]** - First-match selection, binding injection, middleware → handler
//! - **[`middleware`]** - The middleware capability plus tracing and metrics middleware
//! - **[`server`]** - Request/response types and the [`AppService`] boundary
//! - **[`error`]** - Registration errors
//! - **[`logging`]** / **[`runtime_config`]** - Environment-driven setup
//!
//! ## Matching Rules
//!
//! Templates and paths are split on `/` with empty segments kept:
//!
//! - A path matches when it has the same number of segments as the template
//!   and every literal segment is equal (case-sensitive, no decoding)
//! - `:name` segments match anything, including the empty string
//! - Registration order is priority; there is no specificity ranking
//! - Each method may have one default route, used only when nothing matched
//!
//! ## Quick Start
//!
//! ```rust
//! use pathrouter::{AppService, RouteTable};
//! use serde_json::json;
//!
//! let mut table = RouteTable::new();
//! table
//!     .get("/:task", |req, res| {
//!         let task = req.value("task").unwrap_or_default().to_string();
//!         res.send(task);
//!     })?
//!     .post("/create", |_req, res| {
//!         res.json(&json!({ "message": "Create Task" }));
//!     })?;
//!
//! let app = AppService::from_table(table);
//! let res = app.handle_raw("GET", "/write-docs", |req| req);
//! assert_eq!(res.body_str(), "write-docs");
//!
//! let res = app.handle_raw("PUT", "/write-docs", |req| req);
//! assert_eq!(res.body_str(), r#"{"error":"no found"}"#);
//! # Ok::<(), pathrouter::ConfigError>(())
//! ```
//!
//! ## Concurrency
//!
//! Tables are built single-threaded and then shared. [`RouteTable`],
//! [`Dispatcher`] and [`AppService`] are `Send + Sync`; match results are
//! returned by value, so concurrent requests never observe each other's
//! bindings.

pub mod dispatcher;
pub mod error;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod router;
pub mod runtime_config;
pub mod server;

pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use error::ConfigError;
pub use middleware::Middleware;
pub use router::{PathPattern, RouteBindings, RouteMethod, RouteTable};
pub use server::{AppService, Request, Response};
