//! Path template compilation.
//!
//! A template is split on `/` with empty segments kept, so `/a/:b` compiles to
//! three segments (`""`, `"a"`, `:b`). Matching compares by segment count and
//! position only; nothing is normalized.

use std::fmt;
use std::sync::Arc;

use crate::error::ConfigError;

/// One `/`-delimited position of a compiled template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the request segment exactly
    Literal(String),
    /// Captures whatever the request carries at this position
    Variable(Arc<str>),
}

/// A compiled route template
///
/// Immutable after [`PathPattern::compile`]. Bindings produced by matching are
/// returned to the caller and never stored here, so one pattern can be matched
/// from any number of threads at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
    /// Declared variables in template order: (name, segment index)
    variables: Vec<(Arc<str>, usize)>,
}

impl PathPattern {
    /// Compile a template such as `/users/:id/posts`
    ///
    /// Any non-empty segment starting with `:` declares a variable named by
    /// the rest of the segment.
    ///
    /// # Errors
    ///
    /// [`ConfigError::DuplicateVariable`] when a name is declared twice.
    ///
    /// # Example
    ///
    /// ```
    /// use pathrouter::router::PathPattern;
    ///
    /// let pattern = PathPattern::compile("/a/:b").unwrap();
    /// assert_eq!(pattern.segment_count(), 3);
    /// assert_eq!(pattern.variable_index("b"), Some(2));
    /// ```
    pub fn compile(template: &str) -> Result<Self, ConfigError> {
        let mut segments = Vec::with_capacity(template.matches('/').count() + 1);
        let mut variables: Vec<(Arc<str>, usize)> = Vec::new();

        for (index, segment) in template.split('/').enumerate() {
            match segment.strip_prefix(':') {
                Some(name) => {
                    if variables.iter().any(|(existing, _)| &**existing == name) {
                        return Err(ConfigError::DuplicateVariable {
                            name: name.to_string(),
                            template: template.to_string(),
                        });
                    }
                    let name: Arc<str> = Arc::from(name);
                    variables.push((Arc::clone(&name), index));
                    segments.push(Segment::Variable(name));
                }
                None => segments.push(Segment::Literal(segment.to_string())),
            }
        }

        Ok(Self {
            raw: template.to_string(),
            segments,
            variables,
        })
    }

    /// The template this pattern was compiled from
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Number of `/`-delimited segments, including the empty leading one
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Declared variables as (name, segment index), in template order
    #[must_use]
    pub fn variables(&self) -> &[(Arc<str>, usize)] {
        &self.variables
    }

    #[must_use]
    pub fn has_variables(&self) -> bool {
        !self.variables.is_empty()
    }

    #[must_use]
    pub fn variable_index(&self, name: &str) -> Option<usize> {
        self.variables
            .iter()
            .find(|(n, _)| &**n == name)
            .map(|(_, i)| *i)
    }

    /// Allocation-free match predicate
    ///
    /// Same rules as [`match_path`](super::match_path) without collecting
    /// bindings.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let mut count = 0;
        for (i, part) in path.split('/').enumerate() {
            match self.segments.get(i) {
                Some(Segment::Literal(lit)) if lit != part => return false,
                Some(_) => {}
                None => return false,
            }
            count += 1;
        }
        count == self.segments.len()
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
