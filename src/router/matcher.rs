//! Matching a concrete request path against a compiled pattern.
//!
//! The result of a match is a fresh [`RouteBindings`] value owned by the
//! caller. Nothing is written back into the pattern.

use std::collections::HashMap;
use std::sync::Arc;

use smallvec::SmallVec;

use super::pattern::{PathPattern, Segment};

/// Maximum number of bindings kept inline before spilling to the heap.
/// Templates rarely declare more than a handful of variables.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Inline storage for (variable name, captured value) pairs.
///
/// Names are `Arc<str>` shared with the compiled pattern; values are copied
/// out of the request path.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Values captured by one successful match, in template order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteBindings {
    params: ParamVec,
}

impl RouteBindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a bound value by variable name
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| &**k == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (&**k, v.as_str()))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[(Arc<str>, String)] {
        &self.params
    }

    /// Convert to a HashMap
    /// Note: This allocates - use get() on the dispatch path instead
    #[must_use]
    pub fn to_map(&self) -> HashMap<String, String> {
        self.params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

impl IntoIterator for RouteBindings {
    type Item = (Arc<str>, String);
    type IntoIter = smallvec::IntoIter<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.into_iter()
    }
}

/// Match `path` against `pattern`
///
/// Returns the captured bindings when
/// - `path` splits into exactly `pattern.segment_count()` segments, and
/// - every literal segment of the pattern equals the request segment at the
///   same position (case-sensitive, no decoding).
///
/// Variable positions accept any value, including the empty string.
///
/// # Example
///
/// ```
/// use pathrouter::router::{match_path, PathPattern};
///
/// let pattern = PathPattern::compile("/a/:b").unwrap();
/// let bindings = match_path(&pattern, "/a/hello").unwrap();
/// assert_eq!(bindings.get("b"), Some("hello"));
/// assert!(match_path(&pattern, "/a/hello/extra").is_none());
/// ```
#[must_use]
pub fn match_path(pattern: &PathPattern, path: &str) -> Option<RouteBindings> {
    let segments = pattern.segments();
    let mut params = ParamVec::new();
    let mut count = 0;

    for (i, part) in path.split('/').enumerate() {
        match segments.get(i)? {
            Segment::Literal(lit) => {
                if lit != part {
                    return None;
                }
            }
            Segment::Variable(name) => params.push((Arc::clone(name), part.to_string())),
        }
        count += 1;
    }

    if count != segments.len() {
        return None;
    }
    Some(RouteBindings { params })
}
