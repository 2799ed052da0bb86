//! The route table.
//!
//! Routing is an explicit table of path patterns, each mapped to one
//! [`RequestHandler`], with matching delegated to [`matchit`]: literal
//! segments take priority over captures, and captures over catch-all
//! wildcards, so dispatch order is well defined.

use crate::handler::RequestHandler;
use crate::request::PathParams;

type InnerRouter = matchit::Router<Box<dyn RequestHandler>>;

/// Main router structure that maps request paths to handlers
pub struct Router {
    inner: InnerRouter,
}

/// Result of matching a path: the handler plus captured path parameters
pub struct RouteMatch<'router, 'req> {
    handler: &'router dyn RequestHandler,
    params: PathParams<'router, 'req>,
}

impl Router {
    /// Creates a new router builder
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Matches a path against the route table.
    ///
    /// Returns `None` when no pattern matches; the caller decides what a miss
    /// means (for this server: 404).
    pub fn at<'router, 'req>(&'router self, path: &'req str) -> Option<RouteMatch<'router, 'req>> {
        self.inner
            .at(path)
            .map(|matched| RouteMatch { handler: matched.value.as_ref(), params: matched.params.into() })
            .ok()
    }
}

impl<'router, 'req> RouteMatch<'router, 'req> {
    /// Gets the matched request handler
    pub fn handler(&self) -> &'router dyn RequestHandler {
        self.handler
    }

    /// Gets the path parameters captured by the match
    pub fn params(&self) -> &PathParams<'router, 'req> {
        &self.params
    }
}

/// Builder collecting `(pattern, handler)` pairs before constructing the
/// router.
pub struct RouterBuilder {
    routes: Vec<(String, Box<dyn RequestHandler>)>,
}

impl RouterBuilder {
    fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registers a handler under a path pattern such as `/calc/{op}/{a}/{b}`
    /// or `/static/{*path}`.
    pub fn route(mut self, pattern: impl Into<String>, handler: impl RequestHandler + 'static) -> Self {
        self.routes.push((pattern.into(), Box::new(handler)));
        self
    }

    /// Builds the router from the accumulated routes.
    ///
    /// # Panics
    ///
    /// Panics on an invalid or conflicting pattern; the route table is static
    /// configuration, so this is a programming error, not a runtime one.
    pub fn build(self) -> Router {
        let mut inner = InnerRouter::new();

        for (pattern, handler) in self.routes {
            inner.insert(pattern, handler).unwrap();
        }

        Router { inner }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestContext;
    use crate::responder::Responder;
    use async_trait::async_trait;
    use bytes::Bytes;
    use http::Response;

    /// Identifies itself in the response body, so tests can tell which
    /// handler a path landed on.
    struct Probe(&'static str);

    #[async_trait]
    impl RequestHandler for Probe {
        async fn invoke<'server, 'req>(&self, _ctx: RequestContext<'server, 'req>) -> Response<Bytes> {
            self.0.into_response()
        }
    }

    fn router() -> Router {
        Router::builder()
            .route("/static/{*path}", Probe("static"))
            .route("/calc/{op}/{a}/{b}", Probe("calc"))
            .route("/calc/{*rest}", Probe("calc-fallback"))
            .route("/sleep/{seconds}", Probe("sleep"))
            .build()
    }

    #[tokio::test]
    async fn matches_and_captures_calc_segments() {
        let router = router();
        let matched = router.at("/calc/add/3/4").unwrap();

        assert_eq!(matched.params().len(), 3);
        assert_eq!(matched.params().get("op"), Some("add"));
        assert_eq!(matched.params().get("a"), Some("3"));
        assert_eq!(matched.params().get("b"), Some("4"));

        let head: rill_http::protocol::RequestHead =
            http::Request::builder().uri("/calc/add/3/4").body(()).unwrap().into();
        let ctx = RequestContext::new(&head, matched.params());
        let response = matched.handler().invoke(ctx).await;
        assert_eq!(response.body().as_ref(), b"calc");
    }

    #[test]
    fn the_static_wildcard_captures_nested_paths() {
        let router = router();
        let matched = router.at("/static/css/site.css").unwrap();
        assert_eq!(matched.params().get("path"), Some("css/site.css"));
    }

    #[test]
    fn a_full_match_takes_priority_over_the_catch_all() {
        let router = router();

        let matched = router.at("/calc/add/3/4").unwrap();
        assert_eq!(matched.params().get("op"), Some("add"));

        let matched = router.at("/calc/add/3").unwrap();
        assert_eq!(matched.params().get("rest"), Some("add/3"));
        assert_eq!(matched.params().get("op"), None);
    }

    #[test]
    fn unknown_paths_do_not_match() {
        let router = router();
        assert!(router.at("/unknown").is_none());
        assert!(router.at("/").is_none());
        assert!(router.at("/calcx").is_none());
    }
}
