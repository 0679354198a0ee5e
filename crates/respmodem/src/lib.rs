//! An incremental, chunk-at-a-time parser for the Redis serialization
//! protocol, RESP2 and RESP3.
//!
//! The parser is a pure transducer from bytes to reply events: it accepts
//! arbitrarily fragmented chunks from a connection, reconstructs each
//! discrete server reply, and delivers it synchronously through a
//! caller-owned [`ReplySink`]. Chunk boundaries never matter: feeding a
//! byte sequence in any partition produces the same callback trace as
//! feeding it whole. Large bulk payloads that span many chunks are spliced
//! out of a recycled buffer pool instead of reallocating per payload, and
//! integers past the 64-bit range keep their exact digits.
//!
//! # Examples
//!
//! ```rust
//! use respmodem::{CollectSink, ParserOptions, Reply, RespParser, SinkEvent};
//!
//! let mut parser = RespParser::new(ParserOptions::default()).unwrap();
//! let mut sink = CollectSink::new();
//! parser.feed(b"+OK\r\n$5\r\nhel", &mut sink);
//! parser.feed(b"lo\r\n", &mut sink);
//! assert_eq!(
//!     sink.events,
//!     vec![
//!         SinkEvent::Reply(Reply::SimpleString("OK".into())),
//!         SinkEvent::Reply(Reply::BulkString("hello".into())),
//!     ]
//! );
//! ```

mod chunk_utils;
mod encode;
mod error;
mod options;
mod parser;
mod reply;
mod sink;

pub use chunk_utils::{produce_chunks, seeded_chunks};
pub use encode::encode_reply;
pub use error::{ConfigError, ProtocolError, ViolationKind};
pub use options::ParserOptions;
pub use parser::RespParser;
pub use reply::{ErrorReply, Reply};
pub use sink::{CollectSink, ReplySink, SinkEvent};

#[cfg(test)]
mod tests;
