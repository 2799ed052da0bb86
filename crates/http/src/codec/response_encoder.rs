//! HTTP response serialization.
//!
//! Every response in this server is fully in memory before it is sent, so the
//! encoder works in one shot: status line with the canonical reason phrase for
//! the code, headers with `Content-Length` forced to the exact body size and
//! `Connection: keep-alive` filled in when absent, then the body verbatim.

use std::io;
use std::io::{ErrorKind, Write};

use bytes::{BufMut, Bytes, BytesMut};
use http::{HeaderValue, Response, Version, header};
use tokio_util::codec::Encoder;
use tracing::error;

use crate::protocol::SendError;

/// Initial buffer size reserved for header serialization
const INIT_HEADER_SIZE: usize = 4 * 1024;

/// Encoder for complete HTTP responses implementing the [`Encoder`] trait.
#[derive(Default)]
pub struct ResponseEncoder;

impl ResponseEncoder {
    pub fn new() -> Self {
        Default::default()
    }
}

impl Encoder<Response<Bytes>> for ResponseEncoder {
    type Error = SendError;

    /// Encodes a response into the provided bytes buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the response version is not HTTP/1.1.
    fn encode(&mut self, response: Response<Bytes>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (mut parts, body) = response.into_parts();

        dst.reserve(INIT_HEADER_SIZE + body.len());
        match parts.version {
            Version::HTTP_11 => {
                let reason = parts.status.canonical_reason().unwrap_or("Unknown");
                write!(FastWrite(dst), "HTTP/1.1 {} {}\r\n", parts.status.as_str(), reason)?;
            }
            v => {
                error!(http_version = ?v, "unsupported http version");
                return Err(io::Error::from(ErrorKind::Unsupported).into());
            }
        }

        // Content-Length always reflects the exact body size
        parts.headers.insert(header::CONTENT_LENGTH, HeaderValue::from(body.len() as u64));

        // connections stay open between requests unless a handler opted out
        if !parts.headers.contains_key(header::CONNECTION) {
            parts.headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        }

        for (header_name, header_value) in parts.headers.iter() {
            dst.put_slice(header_name.as_ref());
            dst.put_slice(b": ");
            dst.put_slice(header_value.as_ref());
            dst.put_slice(b"\r\n");
        }
        dst.put_slice(b"\r\n");

        dst.put_slice(&body);
        Ok(())
    }
}

/// Fast writer implementation for writing to BytesMut.
///
/// This is an optimization to avoid unnecessary bounds checking when writing
/// to the bytes buffer, since we've already reserved enough space.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
