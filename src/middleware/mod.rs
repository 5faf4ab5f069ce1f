//! # Middleware Module
//!
//! A middleware is a per-route capability that runs before the route's
//! handler with the same `(Request, Response)` arguments.
//!
//! ## Contract
//!
//! - At most one middleware per route, supplied at registration time
//! - It runs after path bindings are written into the request
//! - It may finish the response to short-circuit; the handler still runs but
//!   its writes to a finished response are ignored
//! - Panics are not caught
//!
//! Any `Fn(&mut Request, &mut Response) + Send + Sync` closure is a
//! middleware. [`TracingMiddleware`] and [`MetricsMiddleware`] are ready-made
//! implementations.

mod core;
mod metrics;
mod tracing;

pub use self::core::{from_fn, Middleware};
pub use metrics::MetricsMiddleware;
pub use self::tracing::TracingMiddleware;
