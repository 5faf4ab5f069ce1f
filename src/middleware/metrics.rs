use std::sync::atomic::{AtomicUsize, Ordering};

use super::Middleware;
use crate::router::RouteMethod;
use crate::server::{Request, Response};

/// Middleware counting the requests that reach it
///
/// All counters use atomic operations, so one instance can be shared by many
/// routes and many concurrent dispatches.
pub struct MetricsMiddleware {
    request_count: AtomicUsize,
    per_method: [AtomicUsize; RouteMethod::COUNT],
    /// Requests whose response was already finished on arrival
    finished_on_arrival: AtomicUsize,
}

impl Default for MetricsMiddleware {
    fn default() -> Self {
        Self {
            request_count: AtomicUsize::new(0),
            per_method: std::array::from_fn(|_| AtomicUsize::new(0)),
            finished_on_arrival: AtomicUsize::new(0),
        }
    }
}

impl MetricsMiddleware {
    /// Create a new metrics middleware with all counters initialized to zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of requests seen
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Requests seen for one method
    #[must_use]
    pub fn method_count(&self, method: RouteMethod) -> usize {
        self.per_method[method.index()].load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn finished_on_arrival(&self) -> usize {
        self.finished_on_arrival.load(Ordering::Relaxed)
    }
}

impl Middleware for MetricsMiddleware {
    fn invoke(&self, req: &mut Request, res: &mut Response) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        if let Some(method) = RouteMethod::from_wire(req.method()) {
            self.per_method[method.index()].fetch_add(1, Ordering::Relaxed);
        }
        if res.is_finished() {
            self.finished_on_arrival.fetch_add(1, Ordering::Relaxed);
        }
    }
}
