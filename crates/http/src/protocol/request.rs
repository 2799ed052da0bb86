//! HTTP request head handling.
//!
//! The framer only retains what dispatch needs: method, URI and version.
//! Header values are consumed during framing (to locate the request boundary
//! and the declared body length) and are not carried past the decoder.

use http::request::Parts;
use http::{Method, Request, Uri, Version};

/// The parsed view of one HTTP request: method, URI and version.
///
/// A `RequestHead` is created per framed request and dropped once the
/// corresponding response has been written.
#[derive(Debug)]
pub struct RequestHead {
    inner: Request<()>,
}

impl RequestHead {
    /// Returns a reference to the request's HTTP method.
    pub fn method(&self) -> &Method {
        self.inner.method()
    }

    /// Returns a reference to the request's URI.
    pub fn uri(&self) -> &Uri {
        self.inner.uri()
    }

    /// Returns the request's HTTP version.
    pub fn version(&self) -> Version {
        self.inner.version()
    }

    /// Consumes the head and returns the inner `Request<()>`.
    pub fn into_inner(self) -> Request<()> {
        self.inner
    }
}

impl From<Request<()>> for RequestHead {
    #[inline]
    fn from(inner: Request<()>) -> Self {
        Self { inner }
    }
}

impl From<Parts> for RequestHead {
    #[inline]
    fn from(parts: Parts) -> Self {
        Self { inner: Request::from_parts(parts, ()) }
    }
}
