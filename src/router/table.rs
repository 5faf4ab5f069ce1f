//! Per-method route registry.
//!
//! Entries are kept in registration order per method, and that order is the
//! match priority: the first entry whose pattern matches wins. Each method may
//! also carry one default entry, selected only when none of its ordered
//! entries match.

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use super::method::RouteMethod;
use super::pattern::PathPattern;
use crate::error::ConfigError;
use crate::middleware::Middleware;
use crate::server::{Request, Response};

/// Route handler capability
pub type Handler = Arc<dyn Fn(&mut Request, &mut Response) + Send + Sync>;

/// Shared middleware reference stored on an entry
pub type MiddlewareRef = Arc<dyn Middleware>;

/// One registered route
///
/// Cloning copies the compiled pattern and shares the handler and middleware.
#[derive(Clone)]
pub struct RouteEntry {
    method: RouteMethod,
    pattern: PathPattern,
    handler: Handler,
    middleware: Option<MiddlewareRef>,
}

impl RouteEntry {
    #[must_use]
    pub fn method(&self) -> RouteMethod {
        self.method
    }

    #[must_use]
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    #[must_use]
    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    #[must_use]
    pub fn middleware(&self) -> Option<&MiddlewareRef> {
        self.middleware.as_ref()
    }
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("method", &self.method)
            .field("pattern", &self.pattern.raw())
            .field("middleware", &self.middleware.is_some())
            .finish_non_exhaustive()
    }
}

/// Method-wide fallback, selected only when no ordered entry matched
///
/// A default has no pattern of its own: once selected it always applies to
/// the current request and binds nothing.
#[derive(Clone)]
pub struct DefaultRoute {
    method: RouteMethod,
    handler: Handler,
    middleware: Option<MiddlewareRef>,
}

impl DefaultRoute {
    #[must_use]
    pub fn method(&self) -> RouteMethod {
        self.method
    }

    #[must_use]
    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    #[must_use]
    pub fn middleware(&self) -> Option<&MiddlewareRef> {
        self.middleware.as_ref()
    }
}

impl fmt::Debug for DefaultRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultRoute")
            .field("method", &self.method)
            .field("middleware", &self.middleware.is_some())
            .finish_non_exhaustive()
    }
}

/// Ordered route registry keyed by method
///
/// Every routable method always has an entry list, possibly empty. Build the
/// table up front, then share it (usually behind an `Arc`) for concurrent
/// dispatch; nothing in it changes while matching.
///
/// # Example
///
/// ```
/// use pathrouter::router::RouteTable;
///
/// let mut table = RouteTable::new();
/// table
///     .get("/tasks/:id", |req, res| {
///         let id = req.value("id").unwrap_or_default().to_string();
///         res.send(id);
///     })
///     .unwrap();
/// assert_eq!(table.len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct RouteTable {
    routes: [Vec<RouteEntry>; RouteMethod::COUNT],
    defaults: [Option<DefaultRoute>; RouteMethod::COUNT],
}

macro_rules! method_shorthands {
    ($(($name:ident, $with:ident, $method:expr)),* $(,)?) => {
        $(
            #[doc = concat!("Register `template` for ", stringify!($name), " requests")]
            pub fn $name<H>(&mut self, template: &str, handler: H) -> Result<&mut Self, ConfigError>
            where
                H: Fn(&mut Request, &mut Response) + Send + Sync + 'static,
            {
                self.register_method($method, template, handler, None)?;
                Ok(self)
            }

            #[doc = concat!("Register `template` for ", stringify!($name), " requests, behind `middleware`")]
            pub fn $with<H>(
                &mut self,
                template: &str,
                handler: H,
                middleware: MiddlewareRef,
            ) -> Result<&mut Self, ConfigError>
            where
                H: Fn(&mut Request, &mut Response) + Send + Sync + 'static,
            {
                self.register_method($method, template, handler, Some(middleware))?;
                Ok(self)
            }
        )*
    };
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `template` under the method named `method`
    ///
    /// The name is matched case-insensitively against the routable methods.
    /// The entry is appended after every entry already registered for that
    /// method.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownMethod`] or [`ConfigError::DuplicateVariable`].
    /// On error nothing is added.
    pub fn register<H>(
        &mut self,
        method: &str,
        template: &str,
        handler: H,
        middleware: Option<MiddlewareRef>,
    ) -> Result<&RouteEntry, ConfigError>
    where
        H: Fn(&mut Request, &mut Response) + Send + Sync + 'static,
    {
        let method = RouteMethod::parse(method).inspect_err(|e| {
            warn!(method = %method, template = %template, error = %e, "Route rejected");
        })?;
        self.register_method(method, template, handler, middleware)
    }

    /// Typed form of [`register`](Self::register)
    pub fn register_method<H>(
        &mut self,
        method: RouteMethod,
        template: &str,
        handler: H,
        middleware: Option<MiddlewareRef>,
    ) -> Result<&RouteEntry, ConfigError>
    where
        H: Fn(&mut Request, &mut Response) + Send + Sync + 'static,
    {
        self.insert(method, template, Arc::new(handler), middleware)
    }

    /// Register an already shared handler
    pub fn register_handler(
        &mut self,
        method: RouteMethod,
        template: &str,
        handler: Handler,
        middleware: Option<MiddlewareRef>,
    ) -> Result<&RouteEntry, ConfigError> {
        self.insert(method, template, handler, middleware)
    }

    fn insert(
        &mut self,
        method: RouteMethod,
        template: &str,
        handler: Handler,
        middleware: Option<MiddlewareRef>,
    ) -> Result<&RouteEntry, ConfigError> {
        let pattern = PathPattern::compile(template).inspect_err(|e| {
            warn!(method = %method, template = %template, error = %e, "Route rejected");
        })?;

        let list = &mut self.routes[method.index()];
        list.push(RouteEntry {
            method,
            pattern,
            handler,
            middleware,
        });
        info!(
            method = %method,
            template = %template,
            position = list.len() - 1,
            "Route registered"
        );
        Ok(&list[list.len() - 1])
    }

    /// Register `template` once for every routable method
    ///
    /// The template is compiled once; if it is rejected no method receives
    /// an entry.
    pub fn register_for_all_methods<H>(
        &mut self,
        template: &str,
        handler: H,
        middleware: Option<MiddlewareRef>,
    ) -> Result<&mut Self, ConfigError>
    where
        H: Fn(&mut Request, &mut Response) + Send + Sync + 'static,
    {
        let pattern = PathPattern::compile(template).inspect_err(|e| {
            warn!(template = %template, error = %e, "Route rejected for all methods");
        })?;
        let handler: Handler = Arc::new(handler);

        for method in RouteMethod::ALL {
            self.routes[method.index()].push(RouteEntry {
                method,
                pattern: pattern.clone(),
                handler: Arc::clone(&handler),
                middleware: middleware.clone(),
            });
        }
        info!(template = %template, methods = RouteMethod::COUNT, "Route registered for all methods");
        Ok(self)
    }

    /// Set the fallback for `method`
    ///
    /// A later call for the same method replaces the earlier default.
    pub fn register_default<H>(
        &mut self,
        method: &str,
        handler: H,
        middleware: Option<MiddlewareRef>,
    ) -> Result<&mut Self, ConfigError>
    where
        H: Fn(&mut Request, &mut Response) + Send + Sync + 'static,
    {
        let method = RouteMethod::parse(method).inspect_err(|e| {
            warn!(method = %method, error = %e, "Default route rejected");
        })?;
        let replaced = self.defaults[method.index()]
            .replace(DefaultRoute {
                method,
                handler: Arc::new(handler),
                middleware,
            })
            .is_some();
        info!(method = %method, replaced, "Default route registered");
        Ok(self)
    }

    /// Append copies of `other`'s entries after this table's entries
    ///
    /// Per method, `other`'s order is preserved. `other` is not modified and
    /// its defaults are not copied.
    pub fn merge(&mut self, other: &RouteTable) -> &mut Self {
        let mut merged = 0;
        for method in RouteMethod::ALL {
            let incoming = &other.routes[method.index()];
            merged += incoming.len();
            self.routes[method.index()].extend(incoming.iter().cloned());
        }
        info!(merged, total = self.len(), "Route table merged");
        self
    }

    /// Merge each table in turn
    pub fn merge_all<'a, I>(&mut self, others: I) -> &mut Self
    where
        I: IntoIterator<Item = &'a RouteTable>,
    {
        for other in others {
            self.merge(other);
        }
        self
    }

    /// Ordered entries for `method`
    #[must_use]
    pub fn lookup(&self, method: RouteMethod) -> &[RouteEntry] {
        &self.routes[method.index()]
    }

    #[must_use]
    pub fn default_for(&self, method: RouteMethod) -> Option<&DefaultRoute> {
        self.defaults[method.index()].as_ref()
    }

    /// Total number of ordered entries across all methods
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.iter().all(Vec::is_empty)
    }

    /// All ordered entries, method by method in [`RouteMethod::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.routes.iter().flatten()
    }

    /// Print all registered routes to stdout
    pub fn dump_routes(&self) {
        println!("[routes] count={}", self.len());
        for entry in self.iter() {
            println!(
                "[route] {} {}{}",
                entry.method,
                entry.pattern.raw(),
                if entry.middleware.is_some() { " +middleware" } else { "" }
            );
        }
        for default in self.defaults.iter().flatten() {
            println!("[default] {}", default.method);
        }
    }

    method_shorthands!(
        (get, get_with, RouteMethod::Get),
        (post, post_with, RouteMethod::Post),
        (put, put_with, RouteMethod::Put),
        (patch, patch_with, RouteMethod::Patch),
        (delete, delete_with, RouteMethod::Delete),
        (copy, copy_with, RouteMethod::Copy),
        (head, head_with, RouteMethod::Head),
        (options, options_with, RouteMethod::Options),
        (link, link_with, RouteMethod::Link),
        (unlink, unlink_with, RouteMethod::Unlink),
        (purge, purge_with, RouteMethod::Purge),
        (lock, lock_with, RouteMethod::Lock),
        (unlock, unlock_with, RouteMethod::Unlock),
        (propfind, propfind_with, RouteMethod::Propfind),
        (view, view_with, RouteMethod::View),
    );
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("routes", &self.iter().collect::<Vec<_>>())
            .field(
                "defaults",
                &self.defaults.iter().flatten().collect::<Vec<_>>(),
            )
            .finish()
    }
}
