//! # Hearth Core
//!
//! Core routing types for the Hearth embedded server.
//!
//! This crate provides the decision logic that picks and invokes a handler
//! for one request:
//!
//! - [`Exchange`] - a parsed request plus its response slot
//! - [`Handler`] - an arity-tagged callable over captured path variables
//! - [`Route`] - handler, resource, and static route variants
//! - [`RouteCollection`] - the ordered, first-match-wins dispatcher
//! - [`Resource`] / [`RouteDescriptor`] - declarative multi-route registration
//! - [`ContentResolver`] - the interface to the static-content subsystem
//!
//! The network transport is an external collaborator: it parses raw HTTP
//! into an [`Exchange`], calls [`RouteCollection::apply`], and writes the
//! response (or a 404 when `apply` returns false) back to the wire.

#![forbid(unsafe_code)]

mod collection;
mod error;
mod exchange;
mod handler;
mod resource;
mod route;

pub use collection::RouteCollection;
pub use error::{HandlerError, RouteError};
pub use exchange::{responses, Exchange, HttpResponse, ResponseBody};
pub use handler::{Handler, HandlerResult};
pub use resource::{Resource, RouteDescriptor};
pub use route::{ContentResolver, Route, RouteOutcome};
