use std::sync::Arc;

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use http::{Response, StatusCode, header};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, error, info};

use crate::codec::{RequestDecoder, ResponseEncoder};
use crate::handler::Handler;
use crate::protocol::{Frame, HttpError, ParseError, RequestHead};

/// Initial capacity of the per-connection read buffer
const READ_BUFFER_SIZE: usize = 8 * 1024;

/// An HTTP connection that frames pipelined requests and streams responses
/// back in order.
///
/// `HttpConnection` handles the full lifecycle of one accepted connection:
/// - framing requests out of the shared byte stream (leftover bytes are kept
///   between reads by the framed reader)
/// - dispatching each request to the handler, one at a time, so a slow
///   handler delays only this connection
/// - answering malformed requests with a 400 while keeping the stream open
/// - shutting the connection down on peer close or a fatal protocol error
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
pub struct HttpConnection<R, W> {
    framed_read: FramedRead<R, RequestDecoder>,
    framed_write: FramedWrite<W, ResponseEncoder>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            framed_read: FramedRead::with_capacity(reader, RequestDecoder::new(), READ_BUFFER_SIZE),
            framed_write: FramedWrite::new(writer, ResponseEncoder::new()),
        }
    }

    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler,
    {
        loop {
            match self.framed_read.next().await {
                Some(Ok(Frame::Request(head))) => {
                    self.dispatch(head, &handler).await?;
                }

                Some(Ok(Frame::Invalid { reason })) => {
                    debug!(reason = %reason, "received malformed request");
                    let response = plain_text_response(StatusCode::BAD_REQUEST, reason);
                    self.framed_write.send(response).await?;
                }

                Some(Err(e)) => {
                    error!(cause = %e, "can't frame next request, closing connection");
                    let response = plain_text_response(error_status(&e), e.to_string());
                    // best effort: the connection is going down either way
                    let _ = self.framed_write.send(response).await;
                    return Err(e.into());
                }

                None => {
                    info!("peer finished sending requests, connection shutdown");
                    return Ok(());
                }
            }
        }
    }

    async fn dispatch<H>(&mut self, head: RequestHead, handler: &Arc<H>) -> Result<(), HttpError>
    where
        H: Handler,
    {
        let response = match handler.call(head).await {
            Ok(response) => response,
            Err(e) => {
                error!("handler error, cause: {}", e.into());
                plain_text_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        self.framed_write.send(response).await?;
        Ok(())
    }
}

/// Maps a framing error to the status of the final response sent before the
/// connection closes.
fn error_status(e: &ParseError) -> StatusCode {
    match e {
        ParseError::TooLargeHeader { .. } | ParseError::TooManyHeaders { .. } => {
            StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE
        }
        ParseError::UnsupportedTransferEncoding { .. } => StatusCode::NOT_IMPLEMENTED,
        _ => StatusCode::BAD_REQUEST,
    }
}

/// Builds a plain-text response; the encoder fills in the fixed header set on
/// the way out.
pub fn plain_text_response(status: StatusCode, body: impl Into<Bytes>) -> Response<Bytes> {
    let mut response = Response::new(body.into());
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, mime::TEXT_PLAIN.as_ref().parse().expect("text/plain is a valid header value"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::make_handler;
    use std::convert::Infallible;
    use tokio::io::{AsyncReadExt, AsyncWriteExt, duplex, split};

    async fn echo_path(head: RequestHead) -> Result<Response<Bytes>, Infallible> {
        Ok(plain_text_response(StatusCode::OK, format!("path={}", head.uri().path())))
    }

    /// Runs one connection against the echo handler, writing `input` from the
    /// client side and returning everything the server sent back plus the
    /// connection's exit result.
    async fn drive_connection(input: &[u8]) -> (String, Result<(), HttpError>) {
        let (mut client, server) = duplex(64 * 1024);
        let (reader, writer) = split(server);

        let handler = Arc::new(make_handler(echo_path));
        let connection = tokio::spawn(HttpConnection::new(reader, writer).process(handler));

        let _ = client.write_all(input).await;
        let _ = client.shutdown().await;

        let mut output = Vec::new();
        client.read_to_end(&mut output).await.unwrap();
        let result = connection.await.unwrap();
        (String::from_utf8(output).unwrap(), result)
    }

    #[tokio::test]
    async fn answers_pipelined_requests_in_order() {
        let (output, result) =
            drive_connection(b"GET /first HTTP/1.1\r\nHost: a\r\n\r\nGET /second HTTP/1.1\r\n\r\n").await;

        assert!(result.is_ok());
        let first = output.find("path=/first").unwrap();
        let second = output.find("path=/second").unwrap();
        assert!(first < second);
        assert_eq!(output.matches("HTTP/1.1 200 OK").count(), 2);
    }

    #[tokio::test]
    async fn keeps_the_connection_open_after_a_malformed_request() {
        let (output, result) = drive_connection(b"bogus\r\n\r\nGET /ok HTTP/1.1\r\n\r\n").await;

        assert!(result.is_ok());
        let bad = output.find("HTTP/1.1 400 Bad Request").unwrap();
        let good = output.find("path=/ok").unwrap();
        assert!(bad < good);
    }

    #[tokio::test]
    async fn a_declared_body_does_not_desync_the_next_request() {
        let (output, result) =
            drive_connection(b"POST /upload HTTP/1.1\r\nContent-Length: 5\r\n\r\nhelloGET /after HTTP/1.1\r\n\r\n")
                .await;

        assert!(result.is_ok());
        assert!(output.contains("path=/upload"));
        assert!(output.contains("path=/after"));
    }

    #[tokio::test]
    async fn an_oversized_header_block_gets_a_431_and_closes() {
        let garbage = vec![b'a'; 9 * 1024];
        let (output, result) = drive_connection(&garbage).await;

        assert!(result.is_err());
        assert!(output.contains("HTTP/1.1 431 Request Header Fields Too Large"));
    }

    #[tokio::test]
    async fn a_chunked_request_gets_a_501_and_closes() {
        let (output, result) =
            drive_connection(b"POST /upload HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n").await;

        assert!(result.is_err());
        assert!(output.contains("HTTP/1.1 501 Not Implemented"));
    }

    #[tokio::test]
    async fn an_idle_peer_close_is_an_orderly_shutdown() {
        let (output, result) = drive_connection(b"").await;

        assert!(result.is_ok());
        assert!(output.is_empty());
    }
}
