//! Decoded RESP reply values.
//!
//! This module defines the [`Reply`] enum, the recursive sum type every
//! decoded server reply is delivered as, and [`ErrorReply`], the value
//! object for errors received on the wire.

use core::fmt;

use bytes::Bytes;

/// A single decoded RESP reply.
///
/// A reply is recursive: aggregate variants contain further replies. Which
/// variant a given wire value decodes to depends partly on the parser's mode
/// flags:
///
/// - under `return_buffers`, bulk, verbatim and simple strings decode to
///   [`Reply::Buffer`] instead of their text variants;
/// - under `string_numbers`, integers and doubles decode to
///   [`Reply::Number`] carrying the verbatim decimal text;
/// - under `big_int`, integers decode to [`Reply::BigNumber`].
///
/// # Examples
///
/// ```
/// use respmodem::Reply;
///
/// let reply = Reply::Array(vec![Reply::Integer(1), Reply::Null]);
/// assert!(!reply.is_null());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// RESP3 `_` null, or the RESP2 `$-1` / `*-1` legacy forms.
    Null,
    /// RESP3 `#` boolean.
    Boolean(bool),
    /// `:` integer in the native 64-bit range.
    Integer(i64),
    /// RESP3 `,` double, finite or infinite.
    Double(f64),
    /// Verbatim decimal text of an integer or double, produced under the
    /// `string_numbers` mode flag. Exact digits are preserved at any
    /// magnitude; infinities render as `"Infinity"` / `"-Infinity"`.
    Number(String),
    /// RESP3 `(` big number as decimal text, and the overflow form of `:`
    /// integers that do not fit an `i64`.
    BigNumber(String),
    /// `+` simple string.
    SimpleString(String),
    /// `$` bulk string (or `=` verbatim string) decoded as UTF-8 text.
    BulkString(String),
    /// Raw payload bytes, produced under the `return_buffers` mode flag.
    Buffer(Bytes),
    /// A `-` simple error or `!` blob error. Delivered through `on_error`
    /// at top level; nested occurrences stay embedded in their aggregate.
    Error(ErrorReply),
    /// `*` array.
    Array(Vec<Reply>),
    /// RESP3 `~` set. Element order follows the wire; duplicates are kept.
    Set(Vec<Reply>),
    /// RESP3 `%` map as ordered key-value pairs.
    Map(Vec<(Reply, Reply)>),
}

impl Default for Reply {
    fn default() -> Self {
        Self::Null
    }
}

impl Reply {
    /// Returns `true` if the reply is [`Null`].
    ///
    /// [`Null`]: Reply::Null
    ///
    /// # Examples
    ///
    /// ```
    /// use respmodem::Reply;
    ///
    /// assert!(Reply::Null.is_null());
    /// assert!(!Reply::Boolean(false).is_null());
    /// ```
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the reply is [`Error`].
    ///
    /// [`Error`]: Reply::Error
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(..))
    }

    /// Returns `true` if the reply is an aggregate (array, set or map).
    #[must_use]
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Self::Array(..) | Self::Set(..) | Self::Map(..))
    }

    /// Returns the text of the reply if it carries one.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::SimpleString(s) | Self::BulkString(s) | Self::Number(s) | Self::BigNumber(s) => {
                Some(s)
            }
            _ => None,
        }
    }

    /// Returns the raw bytes of the reply if it carries them.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Buffer(bytes) => Some(bytes),
            Self::SimpleString(s) | Self::BulkString(s) => Some(s.as_bytes()),
            _ => None,
        }
    }
}

impl From<bool> for Reply {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i64> for Reply {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Reply {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<Vec<Reply>> for Reply {
    fn from(v: Vec<Reply>) -> Self {
        Self::Array(v)
    }
}

impl From<ErrorReply> for Reply {
    fn from(v: ErrorReply) -> Self {
        Self::Error(v)
    }
}

/// An error received on the wire.
///
/// Simple errors (`-`) carry the whole line as `message` and no `code`.
/// Blob errors (`!`) split their payload on the first space: the leading
/// word becomes `code`, the remainder `message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReply {
    /// Leading error word of a blob error, e.g. `SYNTAX`.
    pub code: Option<String>,
    /// Human-readable error text.
    pub message: String,
}

impl ErrorReply {
    /// Creates an error reply with a message and no code.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for ErrorReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{code} {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ErrorReply {}
