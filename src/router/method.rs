use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// The closed set of routable HTTP methods
///
/// Route tables always carry one (possibly empty) entry list per variant.
/// Any other method name is unroutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouteMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Copy,
    Head,
    Options,
    Link,
    Unlink,
    Purge,
    Lock,
    Unlock,
    Propfind,
    View,
}

impl RouteMethod {
    /// Number of routable methods
    pub const COUNT: usize = 15;

    /// Every routable method, in table order
    pub const ALL: [RouteMethod; Self::COUNT] = [
        RouteMethod::Get,
        RouteMethod::Post,
        RouteMethod::Put,
        RouteMethod::Patch,
        RouteMethod::Delete,
        RouteMethod::Copy,
        RouteMethod::Head,
        RouteMethod::Options,
        RouteMethod::Link,
        RouteMethod::Unlink,
        RouteMethod::Purge,
        RouteMethod::Lock,
        RouteMethod::Unlock,
        RouteMethod::Propfind,
        RouteMethod::View,
    ];

    /// Wire name of the method
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RouteMethod::Get => "GET",
            RouteMethod::Post => "POST",
            RouteMethod::Put => "PUT",
            RouteMethod::Patch => "PATCH",
            RouteMethod::Delete => "DELETE",
            RouteMethod::Copy => "COPY",
            RouteMethod::Head => "HEAD",
            RouteMethod::Options => "OPTIONS",
            RouteMethod::Link => "LINK",
            RouteMethod::Unlink => "UNLINK",
            RouteMethod::Purge => "PURGE",
            RouteMethod::Lock => "LOCK",
            RouteMethod::Unlock => "UNLOCK",
            RouteMethod::Propfind => "PROPFIND",
            RouteMethod::View => "VIEW",
        }
    }

    /// Position of the method in [`RouteMethod::ALL`]
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// Exact, case-sensitive lookup used on the dispatch path
    ///
    /// `"get"` is not `GET` here; methods are case-sensitive on the wire.
    #[must_use]
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }

    /// Case-insensitive lookup used at registration time
    ///
    /// The name is uppercased before comparison, so `"propfind"` and
    /// `"PropFind"` both register under `PROPFIND`.
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        let upper = name.to_ascii_uppercase();
        Self::from_wire(&upper).ok_or_else(|| ConfigError::UnknownMethod {
            method: name.to_string(),
        })
    }
}

impl fmt::Display for RouteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&http::Method> for RouteMethod {
    type Error = ConfigError;

    fn try_from(method: &http::Method) -> Result<Self, Self::Error> {
        Self::from_wire(method.as_str()).ok_or_else(|| ConfigError::UnknownMethod {
            method: method.as_str().to_string(),
        })
    }
}
