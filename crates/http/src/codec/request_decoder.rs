//! HTTP request framing.
//!
//! [`RequestDecoder`] pulls complete requests out of the connection's
//! accumulating read buffer. A request boundary is the blank line ending the
//! header block; the decoder scans for it incrementally (bytes already
//! examined are not rescanned on the next read), parses the completed block,
//! and arms a body-skip phase for requests that declare a `Content-Length`.
//!
//! The decoder is a state machine with two phases, mirrored in its fields:
//! draining a declared body (`remaining_body > 0`) and scanning for the next
//! header block delimiter (`scanned` marks the resume offset).

use std::cmp;

use bytes::{Buf, BytesMut};
use http::{Request, Version};
use httparse::Status;
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::ensure;
use crate::protocol::{Frame, ParseError, RequestHead};

/// Maximum number of headers allowed in a request
const MAX_HEADER_NUM: usize = 64;

/// Maximum size in bytes allowed for a single header block
const MAX_HEADER_BYTES: usize = 8 * 1024;

/// The blank line terminating a header block
const DELIMITER: &[u8] = b"\r\n\r\n";

/// Decoder that frames pipelined HTTP/1.1 requests out of a byte stream.
///
/// Yields [`Frame::Request`] for each well-formed header block and
/// [`Frame::Invalid`] for a complete block that does not parse, so the
/// connection can answer 400 and keep going. Errors are reserved for
/// conditions that poison the stream itself: an oversized header block, too
/// many headers, a body whose length cannot be determined.
pub struct RequestDecoder {
    /// Bytes of the current partial block already scanned for the delimiter
    scanned: usize,
    /// Declared body bytes still to be drained before the next header block
    remaining_body: u64,
}

impl RequestDecoder {
    /// Creates a new `RequestDecoder` instance
    pub fn new() -> Self {
        Default::default()
    }

    fn parse_block(&mut self, block: &[u8]) -> Result<Frame, ParseError> {
        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];
        let mut parsed = httparse::Request::new(&mut headers);

        let status = match parsed.parse(block) {
            Ok(status) => status,
            Err(httparse::Error::TooManyHeaders) => return Err(ParseError::too_many_headers(MAX_HEADER_NUM)),
            Err(e) => return Ok(Frame::invalid(format!("malformed request: {e}"))),
        };

        // the block ends at the blank line, so a partial parse means the bytes
        // in front of it never formed a request head
        let Status::Complete(_) = status else {
            return Ok(Frame::invalid("malformed request: incomplete request head"));
        };

        let version = match parsed.version {
            Some(0) => Version::HTTP_10,
            Some(1) => Version::HTTP_11,
            v => return Ok(Frame::invalid(format!("unsupported http version: {v:?}"))),
        };

        // the body must be measurable before the next request can be framed
        let mut content_length = 0u64;
        for header in parsed.headers.iter() {
            if header.name.eq_ignore_ascii_case("transfer-encoding") {
                return Err(ParseError::unsupported_transfer_encoding(String::from_utf8_lossy(header.value)));
            }
            if header.name.eq_ignore_ascii_case("content-length") {
                let value = std::str::from_utf8(header.value)
                    .map_err(|_| ParseError::invalid_content_length("value is not utf-8"))?;
                content_length = value
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ParseError::invalid_content_length(format!("value {value} is not u64")))?;
            }
        }

        let builder = Request::builder()
            .method(parsed.method.unwrap_or(""))
            .uri(parsed.path.unwrap_or(""))
            .version(version);

        match builder.body(()) {
            Ok(request) => {
                self.remaining_body = content_length;
                Ok(Frame::Request(RequestHead::from(request)))
            }
            Err(e) => Ok(Frame::invalid(format!("malformed request: {e}"))),
        }
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self { scanned: 0, remaining_body: 0 }
    }
}

impl Decoder for RequestDecoder {
    type Item = Frame;
    type Error = ParseError;

    /// Attempts to frame one request from the provided buffer.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Frame::Request(_)))`: a complete, well-formed request head
    /// - `Ok(Some(Frame::Invalid { .. }))`: a complete but unparseable block
    /// - `Ok(None)`: need more data; leftover bytes stay in the buffer
    /// - `Err(_)`: the stream can no longer be framed safely
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // drain a declared body before scanning for the next header block
        if self.remaining_body > 0 {
            let drained = cmp::min(self.remaining_body, src.len() as u64);
            src.advance(drained as usize);
            self.remaining_body -= drained;
            if self.remaining_body > 0 {
                return Ok(None);
            }
        }

        // resume the delimiter scan where the previous call stopped, backed up
        // far enough to catch a delimiter straddling two reads
        let resume_at = self.scanned.saturating_sub(DELIMITER.len() - 1);
        let Some(block_len) = find_delimiter(src, resume_at) else {
            ensure!(src.len() <= MAX_HEADER_BYTES, ParseError::too_large_header(src.len(), MAX_HEADER_BYTES));
            self.scanned = src.len();
            return Ok(None);
        };

        trace!(block_len, "framed one header block");
        self.scanned = 0;
        let block = src.split_to(block_len);
        self.parse_block(&block).map(Some)
    }
}

/// Returns the offset just past the first header block delimiter at or after
/// `from`, if the buffer contains one.
fn find_delimiter(haystack: &[u8], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(DELIMITER.len())
        .position(|window| window == DELIMITER)
        .map(|position| from + position + DELIMITER.len())
}
