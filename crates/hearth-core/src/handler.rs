//! Arity-tagged request handlers.
//!
//! A [`Handler`] is a single callable over an ordered slice of captured
//! path variables, tagged with the number of captures it expects. The
//! typed constructors ([`Handler::zero`] through [`Handler::three`]) adapt
//! closures of fixed arity into that shape, so a route stores one uniform
//! type regardless of how many variables its pattern captures.

use std::fmt;

use crate::error::HandlerError;
use crate::exchange::{Exchange, HttpResponse};

/// Result of a handler invocation.
pub type HandlerResult = Result<HttpResponse, HandlerError>;

type Callable = dyn Fn(&[String], &mut Exchange) -> HandlerResult + Send + Sync;

/// A request handler expecting a fixed number of captured path variables.
///
/// The arity is fixed at construction. Captured values are passed
/// positionally, in pattern order.
///
/// # Example
///
/// ```rust
/// use hearth_core::{responses, Handler};
///
/// let handler = Handler::one(|id, _exchange| {
///     Ok(responses::text(format!("user {id}")))
/// });
/// assert_eq!(handler.arity(), 1);
/// ```
pub struct Handler {
    arity: usize,
    callable: Box<Callable>,
}

impl Handler {
    /// A handler taking no path variables.
    pub fn zero<F>(f: F) -> Self
    where
        F: Fn(&mut Exchange) -> HandlerResult + Send + Sync + 'static,
    {
        Self {
            arity: 0,
            callable: Box::new(move |_captures, exchange| f(exchange)),
        }
    }

    /// A handler taking one path variable.
    pub fn one<F>(f: F) -> Self
    where
        F: Fn(&str, &mut Exchange) -> HandlerResult + Send + Sync + 'static,
    {
        Self {
            arity: 1,
            callable: Box::new(move |captures, exchange| f(&captures[0], exchange)),
        }
    }

    /// A handler taking two path variables.
    pub fn two<F>(f: F) -> Self
    where
        F: Fn(&str, &str, &mut Exchange) -> HandlerResult + Send + Sync + 'static,
    {
        Self {
            arity: 2,
            callable: Box::new(move |captures, exchange| {
                f(&captures[0], &captures[1], exchange)
            }),
        }
    }

    /// A handler taking three path variables.
    pub fn three<F>(f: F) -> Self
    where
        F: Fn(&str, &str, &str, &mut Exchange) -> HandlerResult + Send + Sync + 'static,
    {
        Self {
            arity: 3,
            callable: Box::new(move |captures, exchange| {
                f(&captures[0], &captures[1], &captures[2], exchange)
            }),
        }
    }

    /// Returns the number of captured values this handler expects.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Invokes the handler with captured values in pattern order.
    ///
    /// Callers must pass exactly [`arity`](Handler::arity) values; routes
    /// enforce this before invoking.
    pub fn invoke(&self, captures: &[String], exchange: &mut Exchange) -> HandlerResult {
        debug_assert_eq!(captures.len(), self.arity);
        (self.callable)(captures, exchange)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").field("arity", &self.arity).finish()
    }
}
