//! # Dispatcher Module
//!
//! Turns a `(method, path)` pair into exactly one middleware → handler run
//! against a shared [`RouteTable`](crate::router::RouteTable).
//!
//! ## Request Flow
//!
//! 1. The method name is resolved exactly (`"get"` is not `GET`)
//! 2. The method's entries are scanned in registration order; the first
//!    pattern that matches wins
//! 3. Every binding of the winning match is written into the request's value
//!    store
//! 4. With no match, the method's default entry is used if one exists
//! 5. The entry's middleware runs, then its handler
//!
//! When nothing is selected the dispatcher returns
//! [`DispatchOutcome::NotFound`] and writes nothing; rendering a not-found
//! response is left to the caller (see [`AppService`](crate::server::AppService)).
//!
//! ## Error Handling
//!
//! Panics raised by handlers or middleware are not caught; they unwind
//! through [`Dispatcher::dispatch`] to the caller.
//!
//! ## Example
//!
//! ```rust
//! use pathrouter::dispatcher::{DispatchOutcome, Dispatcher};
//! use pathrouter::router::RouteTable;
//! use pathrouter::server::{Request, Response};
//!
//! let mut table = RouteTable::new();
//! table
//!     .get("/hello/:name", |req, res| {
//!         let name = req.value("name").unwrap_or_default().to_string();
//!         res.send(format!("hello {name}"));
//!     })
//!     .unwrap();
//!
//! let dispatcher = Dispatcher::new(table);
//! let mut req = Request::new("GET", "/hello/world");
//! let mut res = Response::new();
//! assert_eq!(dispatcher.handle(&mut req, &mut res), DispatchOutcome::Handled);
//! assert_eq!(res.body_str(), "hello world");
//! ```

mod core;

pub use crate::router::Handler;
pub use self::core::{DispatchOutcome, Dispatcher, RouteMatch};
