//! The ordered route collection.
//!
//! Registration order IS precedence: routes are visited in the order they
//! were added and the first match wins. There is no specificity scoring
//! and no longest-prefix tiebreak.

use std::sync::Arc;

use hearth_router::UriPattern;

use crate::error::RouteError;
use crate::exchange::{responses, Exchange};
use crate::handler::{Handler, HandlerResult};
use crate::resource::Resource;
use crate::route::{ContentResolver, Route, RouteOutcome};

/// An ordered sequence of routes with first-match-wins dispatch.
///
/// A collection is populated during a single-threaded setup phase
/// (`serve`, `add_resource`, the `get` family) and then used read-only for
/// [`apply`](RouteCollection::apply) during serving. `apply` takes `&self`
/// and the collection is `Send + Sync`, so concurrent dispatch from many
/// request threads is safe once registration has completed; concurrent
/// registration and serving is not a supported pattern.
///
/// # Example
///
/// ```rust
/// use hearth_core::{responses, Exchange, RouteCollection};
///
/// let mut routes = RouteCollection::new();
/// routes.get("/hello", |_exchange| Ok(responses::text("Hello World"))).unwrap();
/// routes.get1("/hello/:name", |name, _exchange| {
///     Ok(responses::text(format!("Hello {name}")))
/// }).unwrap();
///
/// let mut exchange = Exchange::get("/hello/Bob").unwrap();
/// assert!(routes.apply(&mut exchange));
/// ```
#[derive(Debug, Default)]
pub struct RouteCollection {
    routes: Vec<Route>,
}

impl RouteCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Registers a static-content route for a URL prefix.
    ///
    /// The route claims every GET/HEAD request under the prefix; the
    /// resolver decides existence and answers 404 for missing resources.
    pub fn serve(&mut self, url_prefix: &str, resolver: Arc<dyn ContentResolver>) {
        self.routes.push(Route::static_content(url_prefix, resolver));
    }

    /// Registers every route a resource declares, in discovery order.
    pub fn add_resource<R: Resource>(&mut self, resource: &R) -> Result<(), RouteError> {
        let name = std::any::type_name::<R>();
        for descriptor in resource.routes() {
            let (pattern, handler) = descriptor.into_parts();
            let pattern = UriPattern::parse(&pattern)?;
            self.routes
                .push(Route::resource(name.to_string(), pattern, handler));
        }
        Ok(())
    }

    /// Registers a GET route whose pattern captures no path variables.
    pub fn get<F>(&mut self, pattern: &str, f: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Exchange) -> HandlerResult + Send + Sync + 'static,
    {
        self.add(pattern, Handler::zero(f))
    }

    /// Registers a GET route whose pattern captures one path variable.
    pub fn get1<F>(&mut self, pattern: &str, f: F) -> Result<(), RouteError>
    where
        F: Fn(&str, &mut Exchange) -> HandlerResult + Send + Sync + 'static,
    {
        self.add(pattern, Handler::one(f))
    }

    /// Registers a GET route whose pattern captures two path variables.
    pub fn get2<F>(&mut self, pattern: &str, f: F) -> Result<(), RouteError>
    where
        F: Fn(&str, &str, &mut Exchange) -> HandlerResult + Send + Sync + 'static,
    {
        self.add(pattern, Handler::two(f))
    }

    /// Registers a GET route whose pattern captures three path variables.
    pub fn get3<F>(&mut self, pattern: &str, f: F) -> Result<(), RouteError>
    where
        F: Fn(&str, &str, &str, &mut Exchange) -> HandlerResult + Send + Sync + 'static,
    {
        self.add(pattern, Handler::three(f))
    }

    fn add(&mut self, pattern: &str, handler: Handler) -> Result<(), RouteError> {
        let pattern = UriPattern::parse(pattern)?;
        self.routes.push(Route::handler(pattern, handler));
        Ok(())
    }

    /// Dispatches a request to the first matching route.
    ///
    /// Visits routes in registration order and invokes at most one. Returns
    /// true if a route handled the request (a response is installed on the
    /// exchange); false if every route declined, in which case the caller
    /// is responsible for the not-found response.
    ///
    /// A handler failure is surfaced as a server-error response for this
    /// request only: it is logged, the exchange gets a 500, and `apply`
    /// returns true. The offending route stays registered and other
    /// in-flight requests are unaffected.
    pub fn apply(&self, exchange: &mut Exchange) -> bool {
        for route in &self.routes {
            match route.try_handle(exchange) {
                Ok(RouteOutcome::Handled) => {
                    tracing::debug!(route = %route.describe(), path = %exchange.path(), "route handled request");
                    return true;
                }
                Ok(RouteOutcome::NotMatched) => {}
                Err(error) => {
                    tracing::error!(
                        route = %route.describe(),
                        path = %exchange.path(),
                        %error,
                        "handler failed while producing a response"
                    );
                    exchange.respond(responses::server_error());
                    return true;
                }
            }
        }
        false
    }
}
