//! Parser error types.

use bytes::Bytes;
use thiserror::Error;

/// The specific violation behind a fatal protocol error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViolationKind {
    #[error("unknown reply type byte '{}'", .0.escape_ascii())]
    UnknownType(u8),
    #[error("invalid digit '{}' in decimal", .0.escape_ascii())]
    InvalidDigit(u8),
    #[error("invalid boolean byte '{}'", .0.escape_ascii())]
    InvalidBoolean(u8),
    #[error("expected CRLF terminator, found '{}'", .0.escape_ascii())]
    BadTerminator(u8),
    #[error("invalid bulk string length {0:?}")]
    BadBulkLength(String),
    #[error("invalid aggregate length {0:?}")]
    BadAggregateLength(String),
    #[error("malformed double {0:?}")]
    BadDouble(String),
}

/// A fatal protocol error.
///
/// Raised when the byte stream violates RESP framing: an unknown type byte
/// or a malformed value body. Delivered through
/// [`ReplySink::on_fatal`](crate::ReplySink::on_fatal); by the time the sink
/// sees it the parser has already discarded all pending state, and the next
/// [`feed`](crate::RespParser::feed) starts fresh. Whether to drop the
/// connection is the caller's decision.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at offset {offset}")]
pub struct ProtocolError {
    /// What was violated.
    pub kind: ViolationKind,
    /// Read cursor at the offending byte, relative to `buffer`.
    pub offset: usize,
    /// Snapshot of the working buffer at the time of the violation.
    pub buffer: Bytes,
}

/// An invalid parser configuration.
///
/// Returned by [`RespParser::new`](crate::RespParser::new) and the mode
/// setters rather than surfacing later as misdecoded replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("string_numbers and big_int are mutually exclusive")]
    ExclusiveNumberModes,
}
