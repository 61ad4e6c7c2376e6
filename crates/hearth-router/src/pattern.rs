//! Route pattern compilation and matching.

use thiserror::Error;

use crate::captures::Captures;

/// Errors raised while compiling a route pattern.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// A `:` placeholder segment has no name.
    #[error("empty placeholder name in pattern: {pattern}")]
    EmptyPlaceholder {
        /// The offending pattern.
        pattern: String,
    },

    /// A `*` wildcard segment has no name.
    #[error("empty wildcard name in pattern: {pattern}")]
    EmptyWildcard {
        /// The offending pattern.
        pattern: String,
    },

    /// A wildcard appears before the final segment.
    #[error("wildcard must be the last segment in pattern: {pattern}")]
    WildcardNotLast {
        /// The offending pattern.
        pattern: String,
    },
}

/// One compiled segment of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Static path segment, matched by string equality.
    Literal(String),
    /// Named placeholder capturing exactly one path segment.
    Placeholder(String),
    /// Trailing wildcard capturing the remainder of the path.
    Wildcard(String),
}

/// A compiled route pattern.
///
/// Compiled once at registration time, then matched against request paths.
/// Matching is a pure function of the pattern and the path.
///
/// # Example
///
/// ```rust
/// use hearth_router::UriPattern;
///
/// let pattern = UriPattern::parse("/files/*path").unwrap();
/// assert!(pattern.matches("/files/img/logo.png").is_some());
/// assert!(pattern.matches("/docs/readme").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct UriPattern {
    raw: String,
    segments: Vec<Segment>,
    capture_count: usize,
}

impl UriPattern {
    /// Compiles a pattern string.
    ///
    /// Empty segments are filtered, so trailing slashes are normalized
    /// (`/users/` compiles the same as `/users`).
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] for unnamed placeholders or wildcards,
    /// or a wildcard in a non-final position.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let parts: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();

        let mut segments = Vec::with_capacity(parts.len());
        let mut capture_count = 0;

        for (i, part) in parts.iter().enumerate() {
            if let Some(name) = part.strip_prefix(':') {
                if name.is_empty() {
                    return Err(PatternError::EmptyPlaceholder {
                        pattern: pattern.to_string(),
                    });
                }
                capture_count += 1;
                segments.push(Segment::Placeholder(name.to_string()));
            } else if let Some(name) = part.strip_prefix('*') {
                if name.is_empty() {
                    return Err(PatternError::EmptyWildcard {
                        pattern: pattern.to_string(),
                    });
                }
                if i + 1 != parts.len() {
                    return Err(PatternError::WildcardNotLast {
                        pattern: pattern.to_string(),
                    });
                }
                capture_count += 1;
                segments.push(Segment::Wildcard(name.to_string()));
            } else {
                segments.push(Segment::Literal((*part).to_string()));
            }
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
            capture_count,
        })
    }

    /// Returns the original pattern string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the number of values a successful match captures.
    #[must_use]
    pub fn capture_count(&self) -> usize {
        self.capture_count
    }

    /// Returns true if the pattern ends in a wildcard segment.
    #[must_use]
    pub fn has_wildcard(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Wildcard(_)))
    }

    /// Matches a request path against the pattern.
    ///
    /// Returns the captured values in pattern order, or `None` if the path
    /// does not match. A wildcard consumes at least one segment, so
    /// `/files/*path` does not match `/files`.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<Captures> {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut captures = Captures::with_capacity(self.capture_count);

        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Literal(literal) => {
                    if parts.get(i) != Some(&literal.as_str()) {
                        return None;
                    }
                }
                Segment::Placeholder(name) => {
                    let value = parts.get(i)?;
                    captures.push(name.clone(), (*value).to_string());
                }
                Segment::Wildcard(name) => {
                    if i >= parts.len() {
                        return None;
                    }
                    captures.push(name.clone(), parts[i..].join("/"));
                    return Some(captures);
                }
            }
        }

        if parts.len() != self.segments.len() {
            return None;
        }

        Some(captures)
    }
}
