//! Request handler traits and adapters.

use std::error::Error;
use std::future::Future;

use async_trait::async_trait;
use bytes::Bytes;
use http::Response;

use crate::protocol::RequestHead;

/// An asynchronous request handler.
///
/// The connection layer calls [`Handler::call`] once per framed request and
/// writes the returned response back to the peer before pulling the next
/// request. Returning an error produces a plain 500 response; expected
/// failures (404, 400, ...) should be expressed as ordinary responses.
#[async_trait]
pub trait Handler: Send + Sync {
    type Error: Into<Box<dyn Error + Send + Sync>> + Send;

    async fn call(&self, head: RequestHead) -> Result<Response<Bytes>, Self::Error>;
}

/// A [`Handler`] implemented by a plain async function.
#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

#[async_trait]
impl<Err, F, Fut> Handler for HandlerFn<F>
where
    F: Fn(RequestHead) -> Fut + Send + Sync,
    Err: Into<Box<dyn Error + Send + Sync>> + Send,
    Fut: Future<Output = Result<Response<Bytes>, Err>> + Send,
{
    type Error = Err;

    async fn call(&self, head: RequestHead) -> Result<Response<Bytes>, Self::Error> {
        (self.f)(head).await
    }
}

/// Wraps an async function into a [`Handler`].
pub fn make_handler<F, Err, Fut>(f: F) -> HandlerFn<F>
where
    F: Fn(RequestHead) -> Fut + Send + Sync,
    Err: Into<Box<dyn Error + Send + Sync>>,
    Fut: Future<Output = Result<Response<Bytes>, Err>>,
{
    HandlerFn { f }
}
