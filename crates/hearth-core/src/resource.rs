//! Declarative resource registration.
//!
//! A [`Resource`] contributes a table of route descriptors, one per
//! operation it exposes. This is the registration-time equivalent of
//! annotation scanning: instead of runtime metadata inspection, the
//! resource type itself enumerates its (pattern, handler) pairs.

use crate::exchange::Exchange;
use crate::handler::{Handler, HandlerResult};

/// One declared route of a [`Resource`]: a pattern plus its handler.
#[derive(Debug)]
pub struct RouteDescriptor {
    pattern: String,
    handler: Handler,
}

impl RouteDescriptor {
    /// Creates a descriptor from a pattern and a prepared handler.
    #[must_use]
    pub fn new(pattern: impl Into<String>, handler: Handler) -> Self {
        Self {
            pattern: pattern.into(),
            handler,
        }
    }

    /// Descriptor for a zero-variable GET operation.
    pub fn get<F>(pattern: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut Exchange) -> HandlerResult + Send + Sync + 'static,
    {
        Self::new(pattern, Handler::zero(f))
    }

    /// Descriptor for a one-variable GET operation.
    pub fn get1<F>(pattern: impl Into<String>, f: F) -> Self
    where
        F: Fn(&str, &mut Exchange) -> HandlerResult + Send + Sync + 'static,
    {
        Self::new(pattern, Handler::one(f))
    }

    /// Descriptor for a two-variable GET operation.
    pub fn get2<F>(pattern: impl Into<String>, f: F) -> Self
    where
        F: Fn(&str, &str, &mut Exchange) -> HandlerResult + Send + Sync + 'static,
    {
        Self::new(pattern, Handler::two(f))
    }

    /// Descriptor for a three-variable GET operation.
    pub fn get3<F>(pattern: impl Into<String>, f: F) -> Self
    where
        F: Fn(&str, &str, &str, &mut Exchange) -> HandlerResult + Send + Sync + 'static,
    {
        Self::new(pattern, Handler::three(f))
    }

    /// Returns the declared pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Splits the descriptor into its pattern and handler.
    #[must_use]
    pub fn into_parts(self) -> (String, Handler) {
        (self.pattern, self.handler)
    }
}

/// An application object contributing one route per declared operation.
///
/// The descriptor order returned by [`routes`](Resource::routes) is the
/// discovery order: descriptors are registered in exactly that order, and
/// when patterns overlap, the earlier descriptor matches first.
///
/// # Example
///
/// ```rust
/// use hearth_core::{responses, Resource, RouteDescriptor};
///
/// struct UserResource;
///
/// impl Resource for UserResource {
///     fn routes(&self) -> Vec<RouteDescriptor> {
///         vec![
///             RouteDescriptor::get("/users", |_exchange| {
///                 Ok(responses::text("all users"))
///             }),
///             RouteDescriptor::get1("/users/:id", |id, _exchange| {
///                 Ok(responses::text(format!("user {id}")))
///             }),
///         ]
///     }
/// }
/// ```
pub trait Resource {
    /// Enumerates this resource's routes, in discovery order.
    fn routes(&self) -> Vec<RouteDescriptor>;
}
