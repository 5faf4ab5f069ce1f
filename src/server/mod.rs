//! # Server Module
//!
//! Request and response types handed to middleware and handlers, and the
//! [`AppService`] boundary that turns a raw method/URI pair into a finished
//! [`Response`].
//!
//! Nothing here reads a socket. Whatever transport sits in front of the
//! service builds a [`Request`] (headers, cookies, body params, remote
//! address) and writes the returned [`Response`] back out.

pub mod request;
pub mod response;
pub mod service;

pub use request::{parse_cookies, parse_query_params, CookieDirective, Request};
pub use response::{status_reason, Response};
pub use service::{AppService, NOT_FOUND_ERROR};
