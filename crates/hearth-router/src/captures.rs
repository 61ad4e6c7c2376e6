//! Captured path variables from a pattern match.
//!
//! Names and values are kept as two parallel columns in match order. Both
//! columns are small vectors, so the common one-to-three capture case
//! needs no heap allocation for the containers, and handing the values to
//! an arity-checked handler is a plain column move.

use smallvec::SmallVec;

/// Maximum number of captures stored inline (stack allocated).
const INLINE_CAPTURES: usize = 4;

type Column = SmallVec<[String; INLINE_CAPTURES]>;

/// Ordered path variables captured by a successful pattern match.
///
/// Values appear in pattern order, left to right, and can be read either
/// positionally via [`values`](Captures::values) or by placeholder name via
/// [`get`](Captures::get).
///
/// # Example
///
/// ```rust
/// use hearth_router::Captures;
///
/// let mut captures = Captures::new();
/// captures.push("id", "42");
/// captures.push("action", "edit");
///
/// assert_eq!(captures.get("id"), Some("42"));
/// assert_eq!(captures.values().collect::<Vec<_>>(), vec!["42", "edit"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Captures {
    names: Column,
    values: Column,
}

impl Captures {
    /// Creates an empty capture set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a capture set with the given capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            names: SmallVec::with_capacity(capacity),
            values: SmallVec::with_capacity(capacity),
        }
    }

    /// Appends a captured value.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.names.push(name.into());
        self.values.push(value.into());
    }

    /// Returns the value captured under `name`.
    ///
    /// Should a pattern repeat a placeholder name, the first occurrence
    /// wins; positional access sees every value either way.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        let position = self.names.iter().position(|n| n == name)?;
        self.values.get(position).map(String::as_str)
    }

    /// Returns the captured values in pattern order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    /// Consumes the captures, returning the values in pattern order.
    #[must_use]
    pub fn into_values(self) -> Vec<String> {
        self.values.into_vec()
    }

    /// Returns true if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the number of captured values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns an iterator over (name, value) pairs in match order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }
}

impl FromIterator<(String, String)> for Captures {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut captures = Self::new();
        for (name, value) in iter {
            captures.push(name, value);
        }
        captures
    }
}
