//! Access to per-request information inside handlers.
//!
//! - [`RequestContext`]: the request head plus any path parameters
//! - [`PathParams`]: named URL segments captured by the matched route

use http::{Method, Uri, Version};
use matchit::Params;
use rill_http::protocol::RequestHead;

/// The context of one HTTP request: the parsed head and the path parameters
/// captured by the route that matched it.
///
/// The lifetime parameters ensure the context does not outlive the router or
/// the request data it references.
#[derive(Debug)]
pub struct RequestContext<'server: 'req, 'req> {
    head: &'req RequestHead,
    path_params: &'req PathParams<'server, 'req>,
}

impl<'server, 'req> RequestContext<'server, 'req> {
    /// Creates a new RequestContext with the given head and path parameters
    pub fn new(head: &'req RequestHead, path_params: &'req PathParams<'server, 'req>) -> Self {
        Self { head, path_params }
    }

    /// Returns the HTTP method of the request
    pub fn method(&self) -> &Method {
        self.head.method()
    }

    /// Returns the URI of the request
    pub fn uri(&self) -> &Uri {
        self.head.uri()
    }

    /// Returns the HTTP version of the request
    pub fn version(&self) -> Version {
        self.head.version()
    }

    /// Returns the path parameters captured by the matched route
    pub fn params(&self) -> &PathParams<'server, 'req> {
        self.path_params
    }
}

/// Named path segments captured from the URL of an HTTP request.
///
/// For example, matching `/calc/{op}/{a}/{b}` against `/calc/add/3/4`
/// captures `op = "add"`, `a = "3"`, `b = "4"`.
#[derive(Debug, Clone)]
pub struct PathParams<'server, 'req> {
    kind: PathParamsKind<'server, 'req>,
}

#[derive(Debug, Clone)]
enum PathParamsKind<'server, 'req> {
    None,
    Params(Params<'server, 'req>),
}

impl<'server, 'req> PathParams<'server, 'req> {
    /// Creates an empty PathParams instance with no parameters
    #[inline]
    pub fn empty() -> Self {
        Self { kind: PathParamsKind::None }
    }

    /// Returns true if there are no path parameters
    #[inline]
    pub fn is_empty(&self) -> bool {
        match &self.kind {
            PathParamsKind::None => true,
            PathParamsKind::Params(params) => params.is_empty(),
        }
    }

    /// Returns the number of path parameters
    #[inline]
    pub fn len(&self) -> usize {
        match &self.kind {
            PathParamsKind::None => 0,
            PathParamsKind::Params(params) => params.len(),
        }
    }

    /// Gets the value of a path parameter by its name
    #[inline]
    pub fn get(&self, key: impl AsRef<str>) -> Option<&'req str> {
        match &self.kind {
            PathParamsKind::Params(params) => params.get(key),
            PathParamsKind::None => None,
        }
    }
}

impl<'server, 'req> From<Params<'server, 'req>> for PathParams<'server, 'req> {
    fn from(params: Params<'server, 'req>) -> Self {
        if params.is_empty() { Self::empty() } else { Self { kind: PathParamsKind::Params(params) } }
    }
}
