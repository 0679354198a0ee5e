//! RESP3 wire encoder for [`Reply`] values.
//!
//! The inverse of the parser. Replies are encoded in their RESP3 form;
//! [`Reply::Buffer`] encodes as a bulk string and [`Reply::Number`] as an
//! integer line, so a decode of the output under the matching mode flags
//! reproduces the input value.

use bytes::{BufMut, BytesMut};

use crate::reply::{ErrorReply, Reply};

const CRLF: &[u8] = b"\r\n";

/// Encodes `reply` onto the end of `dst`.
///
/// # Examples
///
/// ```
/// use bytes::BytesMut;
/// use respmodem::{encode_reply, Reply};
///
/// let mut wire = BytesMut::new();
/// encode_reply(&Reply::Array(vec![Reply::Integer(1), Reply::Null]), &mut wire);
/// assert_eq!(&wire[..], b"*2\r\n:1\r\n_\r\n");
/// ```
pub fn encode_reply(reply: &Reply, dst: &mut BytesMut) {
    match reply {
        Reply::Null => dst.put_slice(b"_\r\n"),
        Reply::Boolean(true) => dst.put_slice(b"#t\r\n"),
        Reply::Boolean(false) => dst.put_slice(b"#f\r\n"),
        Reply::Integer(value) => put_line(dst, b':', value.to_string().as_bytes()),
        Reply::Number(text) => put_line(dst, b':', text.as_bytes()),
        Reply::Double(value) => put_line(dst, b',', value.to_string().as_bytes()),
        Reply::BigNumber(text) => put_line(dst, b'(', text.as_bytes()),
        Reply::SimpleString(text) => put_line(dst, b'+', text.as_bytes()),
        Reply::BulkString(text) => put_bulk(dst, b'$', text.as_bytes()),
        Reply::Buffer(bytes) => put_bulk(dst, b'$', bytes),
        Reply::Error(ErrorReply {
            code: None,
            message,
        }) => put_line(dst, b'-', message.as_bytes()),
        Reply::Error(ErrorReply {
            code: Some(code),
            message,
        }) => {
            let payload = format!("{code} {message}");
            put_bulk(dst, b'!', payload.as_bytes());
        }
        Reply::Array(items) => {
            put_line(dst, b'*', items.len().to_string().as_bytes());
            for item in items {
                encode_reply(item, dst);
            }
        }
        Reply::Set(items) => {
            put_line(dst, b'~', items.len().to_string().as_bytes());
            for item in items {
                encode_reply(item, dst);
            }
        }
        Reply::Map(pairs) => {
            put_line(dst, b'%', pairs.len().to_string().as_bytes());
            for (key, value) in pairs {
                encode_reply(key, dst);
                encode_reply(value, dst);
            }
        }
    }
}

fn put_line(dst: &mut BytesMut, tag: u8, body: &[u8]) {
    dst.put_u8(tag);
    dst.put_slice(body);
    dst.put_slice(CRLF);
}

fn put_bulk(dst: &mut BytesMut, tag: u8, payload: &[u8]) {
    put_line(dst, tag, payload.len().to_string().as_bytes());
    dst.put_slice(payload);
    dst.put_slice(CRLF);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_scalars() {
        let mut dst = BytesMut::new();
        encode_reply(&Reply::SimpleString("OK".into()), &mut dst);
        encode_reply(&Reply::Integer(-7), &mut dst);
        encode_reply(&Reply::Double(f64::INFINITY), &mut dst);
        assert_eq!(&dst[..], b"+OK\r\n:-7\r\n,inf\r\n");
    }

    #[test]
    fn encodes_blob_error() {
        let mut dst = BytesMut::new();
        let error = ErrorReply {
            code: Some("SYNTAX".into()),
            message: "invalid syntax".into(),
        };
        encode_reply(&Reply::Error(error), &mut dst);
        assert_eq!(&dst[..], b"!21\r\nSYNTAX invalid syntax\r\n");
    }

    #[test]
    fn encodes_nested_map() {
        let mut dst = BytesMut::new();
        let map = Reply::Map(vec![(
            Reply::BulkString("k".into()),
            Reply::Set(vec![Reply::Null]),
        )]);
        encode_reply(&map, &mut dst);
        assert_eq!(&dst[..], b"%1\r\n$1\r\nk\r\n~1\r\n_\r\n");
    }
}
