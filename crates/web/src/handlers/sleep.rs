use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::{Response, StatusCode};
use tracing::debug;

use crate::handler::RequestHandler;
use crate::request::RequestContext;
use crate::responder::Responder;

/// A deliberately slow endpoint: `/sleep/{seconds}` waits that many seconds
/// before confirming.
///
/// The wait suspends only the task owning this connection; nothing is shared
/// and no lock is held, so other connections keep being served while this one
/// sleeps.
#[derive(Debug, Clone, Copy)]
pub struct SleepHandler;

#[async_trait]
impl RequestHandler for SleepHandler {
    async fn invoke<'server, 'req>(&self, ctx: RequestContext<'server, 'req>) -> Response<Bytes> {
        let Some(seconds) = ctx.params().get("seconds").and_then(|raw| raw.parse::<u64>().ok()) else {
            return (StatusCode::BAD_REQUEST, "Invalid format").into_response();
        };

        debug!(seconds, "delaying this connection");
        tokio::time::sleep(Duration::from_secs(seconds)).await;
        "Slept!".into_response()
    }
}
