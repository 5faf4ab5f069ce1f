use thiserror::Error;

/// Route registration error
///
/// Returned by the [`RouteTable`](crate::router::RouteTable) registration
/// methods. A route that fails registration is never added; the rest of the
/// table is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The method name is not one of the fifteen routable methods
    #[error("unknown route method '{method}'")]
    UnknownMethod {
        /// The rejected method name, as given by the caller
        method: String,
    },
    /// A template declares the same `:name` variable more than once
    #[error("variable '{name}' declared more than once in route template '{template}'")]
    DuplicateVariable {
        /// The repeated variable name
        name: String,
        /// The offending template
        template: String,
    },
}
