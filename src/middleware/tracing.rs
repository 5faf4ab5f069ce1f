use tracing::info_span;

use super::Middleware;
use crate::server::{Request, Response};

/// Emits one `request` span event per invocation with the request identity
/// and the bound path values
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn invoke(&self, req: &mut Request, _res: &mut Response) {
        let span = info_span!(
            "request",
            request_id = %req.request_id(),
            method = %req.method(),
            path = %req.path(),
        );
        let _guard = span.enter();
        tracing::info!(values = ?req.values(), "Middleware entered");
    }
}
