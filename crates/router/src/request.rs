//! The per-request context handed to middlewares and handlers.
//!
//! [`RequestContext`] owns the request head and the fully received body. The router reads
//! [`method`](RequestContext::method) and [`path`](RequestContext::path) from it and, on a
//! successful match, attaches the extracted [`PathVariables`] and the [`MatchedRoute`]
//! descriptor as request properties.

use crate::router::MatchedRoute;
use crate::PathVariables;
use bytes::Bytes;
use http::request::Parts;
use http::{Extensions, HeaderMap, Method, Request, Uri, Version};

#[derive(Debug)]
pub struct RequestContext {
    parts: Parts,
    body: Bytes,
}

impl RequestContext {
    /// Creates a context from a request head and its body.
    ///
    /// The path of `parts.uri` must already be percent-decoded and normalized by the codec layer.
    pub fn new(parts: Parts, body: Bytes) -> Self {
        Self { parts, body }
    }

    /// Returns the HTTP method of the request
    #[inline]
    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    /// Returns the path of the request, without the query string
    #[inline]
    pub fn path(&self) -> &str {
        self.parts.uri.path()
    }

    /// Returns the URI of the request
    #[inline]
    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    /// Returns the HTTP version of the request
    #[inline]
    pub fn version(&self) -> Version {
        self.parts.version
    }

    /// Returns the HTTP headers of the request
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// Returns the request body
    #[inline]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the path variables bound by the router, empty when the matched template has none
    /// or when the request has not been routed yet.
    pub fn path_variables(&self) -> &PathVariables {
        static EMPTY: PathVariables = PathVariables::EMPTY;
        self.property::<PathVariables>().unwrap_or(&EMPTY)
    }

    /// Returns the route that accepted this request, if any.
    pub fn matched_route(&self) -> Option<&MatchedRoute> {
        self.property::<MatchedRoute>()
    }

    /// Returns a typed request property.
    pub fn property<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.parts.extensions.get::<T>()
    }

    /// Sets a typed request property, returning the previous value of that type.
    pub fn set_property<T: Clone + Send + Sync + 'static>(&mut self, value: T) -> Option<T> {
        self.parts.extensions.insert(value)
    }

    /// Returns all request properties.
    pub fn properties(&self) -> &Extensions {
        &self.parts.extensions
    }

    /// Consumes the context, returning the request head and body.
    pub fn into_parts(self) -> (Parts, Bytes) {
        (self.parts, self.body)
    }
}

impl From<Request<Bytes>> for RequestContext {
    fn from(request: Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();
        Self::new(parts, body)
    }
}
