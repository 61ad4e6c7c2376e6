//! The request/response exchange.
//!
//! An [`Exchange`] is what the external transport layer hands to the
//! dispatcher: the parsed request, plus a slot for the response a route
//! produces. The transport writes the response (or a 404 when nothing
//! matched) back to the wire.

use bytes::Bytes;
use http::{header, HeaderMap, HeaderValue, Method, Request, Response, StatusCode};
use http_body_util::Full;

/// Type alias for HTTP response bodies.
pub type ResponseBody = Full<Bytes>;

/// Type alias for the HTTP response.
pub type HttpResponse = Response<ResponseBody>;

/// A single request/response exchange.
///
/// # Example
///
/// ```rust
/// use hearth_core::{responses, Exchange};
///
/// let mut exchange = Exchange::get("/hello").unwrap();
/// assert_eq!(exchange.path(), "/hello");
///
/// exchange.respond(responses::text("Hello World"));
/// assert!(exchange.response().is_some());
/// ```
#[derive(Debug)]
pub struct Exchange {
    request: Request<Bytes>,
    response: Option<HttpResponse>,
}

impl Exchange {
    /// Wraps a parsed request.
    #[must_use]
    pub fn new(request: Request<Bytes>) -> Self {
        Self {
            request,
            response: None,
        }
    }

    /// Builds an exchange for a bodyless GET request.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a valid URI.
    pub fn get(path: &str) -> Result<Self, http::Error> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Bytes::new())?;
        Ok(Self::new(request))
    }

    /// Returns the request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        self.request.method()
    }

    /// Returns the request URI path.
    #[must_use]
    pub fn path(&self) -> &str {
        self.request.uri().path()
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.request.headers()
    }

    /// Returns the request body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        self.request.body()
    }

    /// Installs the response for this exchange.
    ///
    /// Exactly one route is invoked per request, so at most one response is
    /// installed; a later call replaces the earlier response.
    pub fn respond(&mut self, response: HttpResponse) {
        self.response = Some(response);
    }

    /// Returns the installed response, if any.
    #[must_use]
    pub fn response(&self) -> Option<&HttpResponse> {
        self.response.as_ref()
    }

    /// Takes the installed response, leaving the slot empty.
    #[must_use]
    pub fn take_response(&mut self) -> Option<HttpResponse> {
        self.response.take()
    }
}

/// Response constructors for common cases.
pub mod responses {
    use super::{header, Bytes, Full, HeaderValue, HttpResponse, Response, StatusCode};

    fn with_content_type(body: Bytes, content_type: &'static str) -> HttpResponse {
        let mut response = Response::new(Full::new(body));
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(content_type),
        );
        response
    }

    /// A 200 response with a `text/plain` body.
    #[must_use]
    pub fn text(body: impl Into<Bytes>) -> HttpResponse {
        with_content_type(body.into(), "text/plain; charset=utf-8")
    }

    /// A 200 response with a `text/html` body.
    #[must_use]
    pub fn html(body: impl Into<Bytes>) -> HttpResponse {
        with_content_type(body.into(), "text/html; charset=utf-8")
    }

    /// A 404 response.
    #[must_use]
    pub fn not_found() -> HttpResponse {
        let mut response = with_content_type(Bytes::from_static(b"Not Found"), "text/plain; charset=utf-8");
        *response.status_mut() = StatusCode::NOT_FOUND;
        response
    }

    /// A 500 response.
    #[must_use]
    pub fn server_error() -> HttpResponse {
        let mut response = with_content_type(
            Bytes::from_static(b"Internal Server Error"),
            "text/plain; charset=utf-8",
        );
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_get() {
        let exchange = Exchange::get("/users/42").unwrap();
        assert_eq!(exchange.method(), Method::GET);
        assert_eq!(exchange.path(), "/users/42");
        assert!(exchange.response().is_none());
    }

    #[test]
    fn test_respond_and_take() {
        let mut exchange = Exchange::get("/").unwrap();
        exchange.respond(responses::text("hi"));

        let response = exchange.take_response().unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(exchange.response().is_none());
    }

    #[test]
    fn test_text_response_content_type() {
        let response = responses::text("hello");
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn test_html_response_content_type() {
        let response = responses::html("<p>hi</p>");
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
    }

    #[test]
    fn test_error_responses() {
        assert_eq!(responses::not_found().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            responses::server_error().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
