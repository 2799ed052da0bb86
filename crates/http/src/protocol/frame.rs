use crate::protocol::RequestHead;

/// One framed unit produced by the request decoder.
///
/// A complete header block that parses cleanly becomes [`Frame::Request`].
/// A complete block that does not parse becomes [`Frame::Invalid`]: the block
/// has already been consumed from the buffer, so the connection can answer
/// with a 400 and keep serving later requests on the same stream.
#[derive(Debug)]
pub enum Frame {
    /// A well-formed request head.
    Request(RequestHead),
    /// A complete but unparseable header block.
    Invalid {
        /// Short plain-text description, used as the 400 response body.
        reason: String,
    },
}

impl Frame {
    /// Creates an invalid frame carrying the reason the block was rejected.
    pub fn invalid<S: ToString>(reason: S) -> Self {
        Frame::Invalid { reason: reason.to_string() }
    }

    /// Returns true if this frame is a well-formed request.
    #[inline]
    pub fn is_request(&self) -> bool {
        matches!(self, Frame::Request(_))
    }

    /// Converts the frame into its request head, if well-formed.
    pub fn into_request(self) -> Option<RequestHead> {
        match self {
            Frame::Request(head) => Some(head),
            Frame::Invalid { .. } => None,
        }
    }
}
