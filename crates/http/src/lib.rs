//! A pipelined HTTP/1.1 connection layer
//!
//! This crate provides the protocol plumbing for a small keep-alive HTTP/1.1
//! server built on top of tokio. It frames pipelined requests out of a shared
//! byte stream, dispatches each one to a [`handler::Handler`], and writes the
//! responses back in order.
//!
//! # Features
//!
//! - Keep-alive connections with request pipelining
//! - Incremental request framing over a growing buffer, with leftover bytes
//!   preserved across reads
//! - Declared `Content-Length` bodies drained from the stream so they cannot
//!   desynchronize the next request
//! - Correct reason phrases on every status line
//! - Clean error handling with typed parse/send errors
//!
//! # Example
//!
//! ```no_run
//! use std::convert::Infallible;
//! use std::sync::Arc;
//!
//! use bytes::Bytes;
//! use http::{Response, StatusCode};
//! use tokio::net::TcpListener;
//!
//! use rill_http::connection::HttpConnection;
//! use rill_http::handler::make_handler;
//! use rill_http::protocol::RequestHead;
//!
//! #[tokio::main]
//! async fn main() {
//!     let tcp_listener = TcpListener::bind("127.0.0.1:8080").await.expect("bind failed");
//!
//!     let handler = Arc::new(make_handler(hello));
//!
//!     loop {
//!         let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(_) => continue,
//!         };
//!
//!         let handler = Arc::clone(&handler);
//!
//!         tokio::spawn(async move {
//!             let (reader, writer) = tcp_stream.into_split();
//!             let connection = HttpConnection::new(reader, writer);
//!             let _ = connection.process(handler).await;
//!         });
//!     }
//! }
//!
//! async fn hello(head: RequestHead) -> Result<Response<Bytes>, Infallible> {
//!     let body = format!("hello from {}\r\n", head.uri().path());
//!     Ok(Response::builder()
//!         .status(StatusCode::OK)
//!         .header(http::header::CONTENT_TYPE, "text/plain")
//!         .body(Bytes::from(body))
//!         .expect("valid response"))
//! }
//! ```
//!
//! # Architecture
//!
//! - [`codec`]: request framing and response encoding
//! - [`connection`]: connection lifecycle and dispatch loop
//! - [`protocol`]: request head, frame and error types
//! - [`handler`]: the request handler seam
//!
//! # Limitations
//!
//! - GET-oriented: request bodies are skipped, never delivered to handlers
//! - No chunked transfer encoding (such requests are rejected)
//! - No TLS (use a reverse proxy for HTTPS)
//! - Maximum header block size: 8KB

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
