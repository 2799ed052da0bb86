//! Core protocol types for the connection layer.
//!
//! - [`RequestHead`]: the parsed view of one request (method, URI, version)
//! - [`Frame`]: what the request framer yields per complete header block
//! - [`HttpError`] / [`ParseError`] / [`SendError`]: error taxonomy

mod frame;
pub use frame::Frame;

mod request;
pub use request::RequestHead;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
