use std::sync::Arc;

use crate::server::{Request, Response};

/// Capability run before a route's handler
pub trait Middleware: Send + Sync {
    fn invoke(&self, req: &mut Request, res: &mut Response);
}

impl<F> Middleware for F
where
    F: Fn(&mut Request, &mut Response) + Send + Sync,
{
    fn invoke(&self, req: &mut Request, res: &mut Response) {
        self(req, res)
    }
}

/// Wrap a closure as a shareable middleware reference
///
/// ```
/// use pathrouter::middleware;
///
/// let deny = middleware::from_fn(|_req, res| res.status(403).send("denied"));
/// # let _ = deny;
/// ```
pub fn from_fn<F>(f: F) -> Arc<dyn Middleware>
where
    F: Fn(&mut Request, &mut Response) + Send + Sync + 'static,
{
    Arc::new(f)
}
