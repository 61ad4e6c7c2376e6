//! Route variants.
//!
//! A route pairs a matching condition with an invocation target. Three
//! kinds exist: programmatic handlers, resource-contributed handlers, and
//! static routes that delegate to a content resolver.

use std::sync::Arc;

use http::{HeaderMap, Method};

use hearth_router::UriPattern;

use crate::error::HandlerError;
use crate::exchange::{Exchange, HttpResponse};
use crate::handler::Handler;

/// The interface to the external static-content subsystem.
///
/// A resolver always produces a response for the path it is handed: the
/// resolver, not the route, decides existence and answers 404 for resources
/// it does not contain.
pub trait ContentResolver: Send + Sync {
    /// Resolves a content path (already stripped of the route's URL prefix)
    /// to a response.
    fn resolve(&self, path: &str, headers: &HeaderMap, method: &Method) -> HttpResponse;
}

impl std::fmt::Debug for dyn ContentResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ContentResolver")
    }
}

/// Outcome of offering a request to a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The route matched and produced a response; dispatch stops.
    Handled,
    /// The route declined the request; dispatch continues. Expected, not an
    /// error.
    NotMatched,
}

/// A registered route.
///
/// A route's pattern and arity are fixed for its lifetime; once added to a
/// collection, routes are append-only.
#[derive(Debug)]
pub enum Route {
    /// A programmatic handler route.
    Handler {
        /// Compiled route pattern.
        pattern: UriPattern,
        /// The handler, arity-checked against the pattern's captures.
        handler: Handler,
    },

    /// A handler route contributed by a [`Resource`](crate::Resource).
    Resource {
        /// Name of the contributing resource (for diagnostics).
        name: String,
        /// Compiled route pattern.
        pattern: UriPattern,
        /// The handler, arity-checked against the pattern's captures.
        handler: Handler,
    },

    /// A static-content route serving a URL prefix.
    Static {
        /// URL prefix this route claims, normalized without a trailing
        /// slash (`"/assets"`); `"/"` claims everything.
        url_prefix: String,
        /// Resolver deciding existence and producing the response.
        resolver: Arc<dyn ContentResolver>,
    },
}

impl Route {
    /// Creates a handler route.
    pub(crate) fn handler(pattern: UriPattern, handler: Handler) -> Self {
        Self::Handler { pattern, handler }
    }

    /// Creates a resource-contributed route.
    pub(crate) fn resource(name: String, pattern: UriPattern, handler: Handler) -> Self {
        Self::Resource {
            name,
            pattern,
            handler,
        }
    }

    /// Creates a static route for a URL prefix.
    pub(crate) fn static_content(url_prefix: &str, resolver: Arc<dyn ContentResolver>) -> Self {
        let mut prefix = url_prefix.trim_end_matches('/').to_string();
        if !prefix.starts_with('/') {
            prefix.insert(0, '/');
        }
        Self::Static {
            url_prefix: prefix,
            resolver,
        }
    }

    /// A short description of the route, for logging.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Handler { pattern, .. } => format!("handler {}", pattern.as_str()),
            Self::Resource { name, pattern, .. } => {
                format!("resource {name} {}", pattern.as_str())
            }
            Self::Static { url_prefix, .. } => format!("static {url_prefix}"),
        }
    }

    /// Offers a request to the route.
    ///
    /// Returns [`RouteOutcome::Handled`] with the response installed on the
    /// exchange, [`RouteOutcome::NotMatched`] when the route declines, or an
    /// error when a matched handler fails.
    pub fn try_handle(&self, exchange: &mut Exchange) -> Result<RouteOutcome, HandlerError> {
        match self {
            Self::Handler { pattern, handler } | Self::Resource {
                pattern, handler, ..
            } => Self::try_handler(pattern, handler, exchange),
            Self::Static {
                url_prefix,
                resolver,
            } => Ok(Self::try_static(url_prefix, resolver.as_ref(), exchange)),
        }
    }

    fn try_handler(
        pattern: &UriPattern,
        handler: &Handler,
        exchange: &mut Exchange,
    ) -> Result<RouteOutcome, HandlerError> {
        if exchange.method() != Method::GET {
            return Ok(RouteOutcome::NotMatched);
        }

        let Some(captures) = pattern.matches(exchange.path()) else {
            return Ok(RouteOutcome::NotMatched);
        };

        // Patterns are authored to match their handler's arity; a mismatch
        // fails closed so later routes still get their chance.
        let values = captures.into_values();
        if values.len() != handler.arity() {
            return Ok(RouteOutcome::NotMatched);
        }

        let response = handler.invoke(&values, exchange)?;
        exchange.respond(response);
        Ok(RouteOutcome::Handled)
    }

    fn try_static(
        url_prefix: &str,
        resolver: &dyn ContentResolver,
        exchange: &mut Exchange,
    ) -> RouteOutcome {
        if exchange.method() != Method::GET && exchange.method() != Method::HEAD {
            return RouteOutcome::NotMatched;
        }

        let content_path = {
            let path = exchange.path();
            if url_prefix == "/" {
                path.to_string()
            } else {
                match path.strip_prefix(url_prefix) {
                    Some(rest) if rest.is_empty() => "/".to_string(),
                    Some(rest) if rest.starts_with('/') => rest.to_string(),
                    // "/assetsfoo" is not under "/assets".
                    _ => return RouteOutcome::NotMatched,
                }
            }
        };

        let response = resolver.resolve(&content_path, exchange.headers(), exchange.method());
        exchange.respond(response);
        RouteOutcome::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::responses;
    use http::StatusCode;

    struct EchoResolver;

    impl ContentResolver for EchoResolver {
        fn resolve(&self, path: &str, _headers: &HeaderMap, _method: &Method) -> HttpResponse {
            responses::text(format!("content:{path}"))
        }
    }

    fn parse(pattern: &str) -> UriPattern {
        UriPattern::parse(pattern).unwrap()
    }

    #[test]
    fn test_handler_route_matches_and_responds() {
        let route = Route::handler(
            parse("/users/:id"),
            Handler::one(|id, _ex| Ok(responses::text(format!("user {id}")))),
        );

        let mut exchange = Exchange::get("/users/42").unwrap();
        assert_eq!(route.try_handle(&mut exchange).unwrap(), RouteOutcome::Handled);
        assert!(exchange.response().is_some());
    }

    #[test]
    fn test_handler_route_declines_other_paths() {
        let route = Route::handler(parse("/users"), Handler::zero(|_ex| Ok(responses::text("x"))));

        let mut exchange = Exchange::get("/posts").unwrap();
        assert_eq!(
            route.try_handle(&mut exchange).unwrap(),
            RouteOutcome::NotMatched
        );
        assert!(exchange.response().is_none());
    }

    #[test]
    fn test_arity_mismatch_fails_closed() {
        // Pattern captures two values but the handler declares one.
        let route = Route::handler(
            parse("/users/:id/:action"),
            Handler::one(|_id, _ex| Ok(responses::text("x"))),
        );

        let mut exchange = Exchange::get("/users/42/edit").unwrap();
        assert_eq!(
            route.try_handle(&mut exchange).unwrap(),
            RouteOutcome::NotMatched
        );
    }

    #[test]
    fn test_handler_route_only_serves_get() {
        let route = Route::handler(parse("/users"), Handler::zero(|_ex| Ok(responses::text("x"))));

        let request = http::Request::builder()
            .method(Method::POST)
            .uri("/users")
            .body(bytes::Bytes::new())
            .unwrap();
        let mut exchange = Exchange::new(request);
        assert_eq!(
            route.try_handle(&mut exchange).unwrap(),
            RouteOutcome::NotMatched
        );
    }

    #[test]
    fn test_static_route_prefix_applicability() {
        let route = Route::static_content("/assets", Arc::new(EchoResolver));

        let mut exchange = Exchange::get("/assets/css/site.css").unwrap();
        assert_eq!(route.try_handle(&mut exchange).unwrap(), RouteOutcome::Handled);

        let mut other = Exchange::get("/api/users").unwrap();
        assert_eq!(
            route.try_handle(&mut other).unwrap(),
            RouteOutcome::NotMatched
        );
    }

    #[test]
    fn test_static_route_strips_prefix() {
        let route = Route::static_content("/assets", Arc::new(EchoResolver));

        let mut exchange = Exchange::get("/assets/logo.png").unwrap();
        route.try_handle(&mut exchange).unwrap();

        let response = exchange.take_response().unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = format!("{:?}", response.body());
        assert!(body.contains("content:/logo.png"), "body was {body}");
    }

    #[test]
    fn test_static_route_rejects_sibling_prefix() {
        // "/assetsfoo" shares the string prefix but is a different segment.
        let route = Route::static_content("/assets", Arc::new(EchoResolver));

        let mut exchange = Exchange::get("/assetsfoo/x").unwrap();
        assert_eq!(
            route.try_handle(&mut exchange).unwrap(),
            RouteOutcome::NotMatched
        );
    }

    #[test]
    fn test_static_route_root_prefix_claims_everything() {
        let route = Route::static_content("/", Arc::new(EchoResolver));

        let mut exchange = Exchange::get("/anything/goes").unwrap();
        assert_eq!(route.try_handle(&mut exchange).unwrap(), RouteOutcome::Handled);
    }

    #[test]
    fn test_handler_failure_is_an_error_not_a_decline() {
        let route = Route::handler(
            parse("/boom"),
            Handler::zero(|_ex| Err(HandlerError::msg("exploded"))),
        );

        let mut exchange = Exchange::get("/boom").unwrap();
        let err = route.try_handle(&mut exchange).unwrap_err();
        assert_eq!(err.to_string(), "exploded");
    }
}
