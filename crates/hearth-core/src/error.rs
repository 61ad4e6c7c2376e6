//! Routing error types.

use thiserror::Error;

/// Errors raised while registering routes.
#[derive(Debug, Error)]
pub enum RouteError {
    /// A route pattern failed to compile.
    #[error("invalid route pattern: {0}")]
    Pattern(#[from] hearth_router::PatternError),
}

/// A failure raised by a matched route's callable while producing a
/// response.
///
/// Handler failures are per-request: the dispatcher reports them to the
/// transport layer as a server-error response for that single request and
/// keeps the route registered.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Failure described by a plain message.
    #[error("{0}")]
    Message(String),

    /// I/O failure while producing the response.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HandlerError {
    /// Creates a handler error from a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}
