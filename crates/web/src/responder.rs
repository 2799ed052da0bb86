//! Conversion of handler results into HTTP responses.
//!
//! [`Responder`] lets handlers return plain values (strings, status/value
//! pairs, prebuilt responses) and have them converted into proper responses
//! with the content type filled in.

use bytes::Bytes;
use http::{Response, StatusCode};

/// A type that can be converted into an HTTP response.
pub trait Responder {
    fn into_response(self) -> Response<Bytes>;
}

/// Prebuilt responses pass through unchanged.
impl Responder for Response<Bytes> {
    fn into_response(self) -> Response<Bytes> {
        self
    }
}

/// Static strings become 200 plain-text responses.
impl Responder for &'static str {
    fn into_response(self) -> Response<Bytes> {
        text_response(Bytes::from_static(self.as_bytes()))
    }
}

/// Strings become 200 plain-text responses.
impl Responder for String {
    fn into_response(self) -> Response<Bytes> {
        text_response(Bytes::from(self))
    }
}

/// A (StatusCode, T) pair responds as T with the status overridden.
impl<T: Responder> Responder for (StatusCode, T) {
    fn into_response(self) -> Response<Bytes> {
        let (status, responder) = self;
        let mut response = responder.into_response();
        *response.status_mut() = status;
        response
    }
}

fn text_response(body: Bytes) -> Response<Bytes> {
    let mut builder = Response::builder();
    let headers = builder.headers_mut().unwrap();
    headers.reserve(8);
    headers.insert(http::header::CONTENT_TYPE, mime::TEXT_PLAIN.as_ref().parse().unwrap());

    builder.status(StatusCode::OK).body(body).unwrap()
}
