use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::router::{match_path, Handler, MiddlewareRef, RouteBindings, RouteMethod, RouteTable};
use crate::runtime_config::RuntimeConfig;
use crate::server::{Request, Response};

/// Result of a dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A route (or the method's default) was selected and run
    Handled,
    /// Unknown method, or no entry matched and the method has no default
    NotFound,
}

impl DispatchOutcome {
    #[must_use]
    pub fn is_handled(self) -> bool {
        self == DispatchOutcome::Handled
    }
}

/// The route selected for one `(method, path)` pair
///
/// Borrowed from the table; bindings are owned and belong to this match only.
#[derive(Clone)]
pub struct RouteMatch<'a> {
    pub method: RouteMethod,
    /// Template of the matched entry; `None` when the default was selected
    pub template: Option<&'a str>,
    pub bindings: RouteBindings,
    pub handler: &'a Handler,
    pub middleware: Option<&'a MiddlewareRef>,
}

impl RouteMatch<'_> {
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.template.is_none()
    }
}

impl std::fmt::Debug for RouteMatch<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteMatch")
            .field("method", &self.method)
            .field("template", &self.template)
            .field("bindings", &self.bindings)
            .field("middleware", &self.middleware.is_some())
            .finish_non_exhaustive()
    }
}

/// Selects and runs routes from a shared, immutable [`RouteTable`]
///
/// `Dispatcher` is `Send + Sync`; wrap it in an `Arc` and dispatch from as
/// many threads as needed. Nothing is written to the table while matching.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    table: Arc<RouteTable>,
    config: RuntimeConfig,
}

impl Dispatcher {
    /// Create a dispatcher over `table` with the default [`RuntimeConfig`]
    ///
    /// Use [`with_config`](Self::with_config) to apply e.g.
    /// [`RuntimeConfig::from_env`].
    #[must_use]
    pub fn new(table: RouteTable) -> Self {
        Self::from_shared(Arc::new(table))
    }

    /// Create a dispatcher over an already shared table
    #[must_use]
    pub fn from_shared(table: Arc<RouteTable>) -> Self {
        Self {
            table,
            config: RuntimeConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Select the route for `method` and `path` without running it
    ///
    /// `method` must be an exact wire name. Returns `None` for an unknown
    /// method, or when no entry matches and the method has no default.
    #[must_use]
    pub fn route(&self, method: &str, path: &str) -> Option<RouteMatch<'_>> {
        debug!(method = %method, path = %path, "Route match attempt");

        let Some(route_method) = RouteMethod::from_wire(method) else {
            warn!(method = %method, path = %path, "Unroutable method");
            return None;
        };

        let match_start = Instant::now();
        let entries = self.table.lookup(route_method);
        let found = entries.iter().enumerate().find_map(|(position, entry)| {
            match_path(entry.pattern(), path).map(|bindings| (position, entry, bindings))
        });
        let match_duration = match_start.elapsed();

        if let Some((position, entry, bindings)) = found {
            let template = entry.pattern().raw();
            if match_duration > self.config.slow_match_threshold {
                warn!(
                    method = %route_method,
                    path = %path,
                    route_pattern = %template,
                    position,
                    candidates = entries.len(),
                    path_params = ?bindings,
                    duration_us = match_duration.as_micros(),
                    "Slow route matching detected"
                );
            } else {
                info!(
                    method = %route_method,
                    path = %path,
                    route_pattern = %template,
                    position,
                    path_params = ?bindings,
                    duration_us = match_duration.as_micros(),
                    "Route matched"
                );
            }
            return Some(RouteMatch {
                method: route_method,
                template: Some(template),
                bindings,
                handler: entry.handler(),
                middleware: entry.middleware(),
            });
        }

        if let Some(default) = self.table.default_for(route_method) {
            info!(
                method = %route_method,
                path = %path,
                candidates = entries.len(),
                duration_us = match_duration.as_micros(),
                "Default route selected"
            );
            return Some(RouteMatch {
                method: route_method,
                template: None,
                bindings: RouteBindings::new(),
                handler: default.handler(),
                middleware: default.middleware(),
            });
        }

        warn!(
            method = %route_method,
            path = %path,
            candidates = entries.len(),
            duration_us = match_duration.as_micros(),
            "No route matched"
        );
        None
    }

    /// Route `method`/`path` and run the selected middleware and handler
    ///
    /// Bindings are written into `req` before the middleware runs. The
    /// response is never inspected: a middleware that finishes `res` leaves
    /// the handler's writes without effect.
    pub fn dispatch(
        &self,
        method: &str,
        path: &str,
        req: &mut Request,
        res: &mut Response,
    ) -> DispatchOutcome {
        let Some(selected) = self.route(method, path) else {
            return DispatchOutcome::NotFound;
        };

        for (name, value) in selected.bindings {
            req.set_value(&*name, value);
        }
        if let Some(middleware) = selected.middleware {
            middleware.invoke(req, res);
        }
        (selected.handler)(req, res);

        debug!(
            method = %selected.method,
            path = %path,
            status = res.status_code(),
            finished = res.is_finished(),
            "Dispatch complete"
        );
        DispatchOutcome::Handled
    }

    /// Dispatch using the request's own method and path
    pub fn handle(&self, req: &mut Request, res: &mut Response) -> DispatchOutcome {
        let method = req.method().to_string();
        let path = req.path().to_string();
        self.dispatch(&method, &path, req, res)
    }
}
