//! URI pattern matching for the Hearth embedded server.
//!
//! This crate compiles route patterns into matchers and matches request
//! paths against them, extracting path variables along the way.
//!
//! # Pattern syntax
//!
//! - Literal segments match exactly (`/users/list`)
//! - `:name` captures exactly one path segment (`/users/:id`)
//! - A trailing `*name` wildcard captures the remainder of the path as a
//!   single value (`/files/*path`)
//!
//! # Example
//!
//! ```rust
//! use hearth_router::UriPattern;
//!
//! let pattern = UriPattern::parse("/users/:id/:action").unwrap();
//!
//! let captures = pattern.matches("/users/42/edit").unwrap();
//! assert_eq!(captures.get("id"), Some("42"));
//! assert_eq!(captures.get("action"), Some("edit"));
//!
//! // Captures are also positional, in pattern order.
//! let values: Vec<&str> = captures.values().collect();
//! assert_eq!(values, vec!["42", "edit"]);
//!
//! assert!(pattern.matches("/users/42").is_none());
//! ```
//!
//! Matching is purely structural: segment counts must line up (unless a
//! wildcard is present) and literal segments must compare equal. Captured
//! values are plain strings; interpreting them is the handler's job.

mod captures;
mod pattern;

pub use captures::Captures;
pub use pattern::{PatternError, Segment, UriPattern};
