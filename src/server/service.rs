use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::dispatcher::{DispatchOutcome, Dispatcher};
use crate::ids::REQUEST_ID_HEADER;
use crate::router::RouteTable;

use super::{Request, Response};

/// Error message written when no route handles a request
pub const NOT_FOUND_ERROR: &str = "no found";

/// Application boundary around a [`Dispatcher`]
///
/// Produces a complete [`Response`] for every request. When the dispatcher
/// reports [`DispatchOutcome::NotFound`] the body is
/// `{"error":"no found"}` with the status left at 200.
#[derive(Debug, Clone)]
pub struct AppService {
    dispatcher: Arc<Dispatcher>,
}

impl AppService {
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Build a service directly over a route table
    #[must_use]
    pub fn from_table(table: RouteTable) -> Self {
        Self::new(Dispatcher::new(table))
    }

    /// Share an existing dispatcher
    #[must_use]
    pub fn from_shared(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Dispatch `req` and return the response it produced
    ///
    /// The response carries an `X-Request-Id` header with the request's id.
    #[must_use]
    pub fn handle(&self, mut req: Request) -> Response {
        let mut res = Response::new();
        res.set_header(REQUEST_ID_HEADER, req.request_id().to_string());

        match self.dispatcher.handle(&mut req, &mut res) {
            DispatchOutcome::Handled => {
                debug!(
                    request_id = %req.request_id(),
                    status = res.status_code(),
                    "Request handled"
                );
            }
            DispatchOutcome::NotFound => {
                warn!(
                    request_id = %req.request_id(),
                    method = %req.method(),
                    path = %req.path(),
                    "Responding with not-found payload"
                );
                res.json(&json!({ "error": NOT_FOUND_ERROR }));
            }
        }
        res
    }

    /// Handle a raw method and URI as received from a transport
    ///
    /// Anything after a `?` is dropped from the method name, and the URI's
    /// query string is kept out of the routed path. `build` may enrich the
    /// request (headers, cookies, body) before dispatch.
    #[must_use]
    pub fn handle_raw<F>(&self, method: &str, uri: &str, build: F) -> Response
    where
        F: FnOnce(Request) -> Request,
    {
        let method = method.split('?').next().unwrap_or_default();
        self.handle(build(Request::new(method, uri)))
    }
}
