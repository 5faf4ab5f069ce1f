//! # Router Module
//!
//! Path template compilation, matching, and the per-method route table.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Compiling templates like `/users/:id/posts` into fixed-arity patterns
//! - Matching concrete request paths and extracting `:name` bindings
//! - Keeping registered routes in per-method registration order
//! - Holding one optional default (fallback) route per method
//!
//! ## Architecture
//!
//! 1. **Compilation**: at registration, a template is split on `/` (empty
//!    segments kept) into literal and variable segments.
//!
//! 2. **Matching**: a request path matches when it has the same number of
//!    segments and every literal position is equal. Bindings are returned by
//!    value, never stored on the pattern, so a built table can be matched from
//!    many threads at once.
//!
//! There is no specificity ranking. `/a/:b` registered before `/a/fixed`
//! also captures `/a/fixed`.
//!
//! ## Example
//!
//! ```rust
//! use pathrouter::router::{match_path, PathPattern};
//!
//! let pattern = PathPattern::compile("/users/:id/posts/:post").unwrap();
//! let bindings = match_path(&pattern, "/users/7/posts/hello").unwrap();
//! assert_eq!(bindings.get("id"), Some("7"));
//! assert_eq!(bindings.get("post"), Some("hello"));
//! ```

mod matcher;
mod method;
mod pattern;
mod table;

pub use matcher::{match_path, ParamVec, RouteBindings, MAX_INLINE_PARAMS};
pub use method::RouteMethod;
pub use pattern::{PathPattern, Segment};
pub use table::{DefaultRoute, Handler, MiddlewareRef, RouteEntry, RouteTable};
