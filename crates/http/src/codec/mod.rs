//! HTTP codec module for framing requests and encoding responses
//!
//! The codec layer is what turns an arbitrarily fragmented byte stream into
//! discrete requests and turns in-memory responses back into bytes:
//!
//! - [`RequestDecoder`]: extracts complete header blocks from an accumulating
//!   buffer, parses them, and drains declared bodies
//! - [`ResponseEncoder`]: serializes a complete response (status line, headers,
//!   body) in one shot
//!
//! Both sides plug into `tokio_util::codec` framing, which owns the buffer
//! management: leftover bytes from one read are preserved for the next, so a
//! request split across reads is reconstructed and multiple requests delivered
//! in a single read are all framed, in order.

mod request_decoder;
mod response_encoder;

pub use request_decoder::RequestDecoder;
pub use response_encoder::ResponseEncoder;
