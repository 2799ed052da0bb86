use async_trait::async_trait;
use bytes::Bytes;
use http::Response;

use crate::request::RequestContext;

/// A route handler: consumes the request context, produces a complete
/// response.
///
/// Handlers express failures (missing file, bad operand, ...) as ordinary
/// 4xx responses; nothing a handler does can take the connection down.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn invoke<'server, 'req>(&self, ctx: RequestContext<'server, 'req>) -> Response<Bytes>;
}
