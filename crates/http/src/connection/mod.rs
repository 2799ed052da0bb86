//! Connection lifecycle management.
//!
//! [`HttpConnection`] owns one accepted stream for its whole lifetime and
//! drives the read-frame-dispatch-respond loop until the peer closes the
//! stream or a fatal protocol error occurs.

mod http_connection;
pub use http_connection::HttpConnection;
