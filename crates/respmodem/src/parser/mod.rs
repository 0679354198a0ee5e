//! The RESP streaming parser implementation.
//!
//! This module provides [`RespParser`], an incremental decoder for RESP2
//! and RESP3 server replies. Bytes are pushed in with [`RespParser::feed`]
//! in whatever fragments the transport produces; each complete top-level
//! reply is delivered synchronously through the borrowed
//! [`ReplySink`]. Incomplete values leave their continuation state inside
//! the parser and finish on a later feed.
//!
//! # Examples
//!
//! ```rust
//! use respmodem::{CollectSink, ParserOptions, Reply, RespParser, SinkEvent};
//!
//! let mut parser = RespParser::new(ParserOptions::default()).unwrap();
//! let mut sink = CollectSink::new();
//! parser.feed(b"*2\r\n:1\r\n+t", &mut sink);
//! assert!(sink.events.is_empty());
//! parser.feed(b"wo\r\n", &mut sink);
//! assert_eq!(
//!     sink.events,
//!     vec![SinkEvent::Reply(Reply::Array(vec![
//!         Reply::Integer(1),
//!         Reply::SimpleString("two".into()),
//!     ]))]
//! );
//! ```

mod numbers;
mod pool;

#[cfg(test)]
mod tests;

use bytes::{Bytes, BytesMut};
use memchr::memchr;
use tracing::{debug, trace};

use crate::{
    error::{ConfigError, ProtocolError, ViolationKind},
    options::ParserOptions,
    reply::{ErrorReply, Reply},
    sink::ReplySink,
};

// ------------------------------------------------------------------------
// Aggregate frames
// ------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Array,
    Set,
    Map,
    Push,
    Attribute,
}

/// One aggregate under construction. `target` counts flat elements; maps
/// and attributes fill two per pair.
#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    items: Vec<Reply>,
    target: usize,
}

impl Frame {
    fn new(kind: FrameKind, len: usize) -> Self {
        let target = match kind {
            FrameKind::Map | FrameKind::Attribute => len.saturating_mul(2),
            _ => len,
        };
        Self {
            kind,
            items: Vec::new(),
            target,
        }
    }

    fn is_complete(&self) -> bool {
        self.items.len() >= self.target
    }
}

/// Outcome of one value-parsing step.
enum Step {
    /// A complete value was decoded; the cursor sits past it.
    Value(Reply),
    /// An aggregate frame was opened; its elements follow.
    Opened,
    /// Not enough bytes; the cursor is rewound to the value's tag byte.
    Need,
    /// A multi-chunk bulk was armed; the chunk cache owns the payload now.
    Pending,
}

struct Violation {
    kind: ViolationKind,
    at: usize,
}

// ------------------------------------------------------------------------
// Parser
// ------------------------------------------------------------------------

/// The streaming RESP parser.
///
/// One parser serves one connection. All state is owned: dropping the
/// parser discards any partial reply, and [`RespParser::reset`] does the
/// same in place for connection reuse.
#[derive(Debug)]
pub struct RespParser {
    /// The working buffer. Replaced, not appended to, on each feed.
    buffer: Bytes,
    /// Read cursor into `buffer`.
    offset: usize,
    /// Chunks of one in-progress bulk payload spanning multiple feeds.
    /// The first entry is the buffer the bulk started in; `offset` marks
    /// where its payload begins.
    chunk_cache: Vec<Bytes>,
    chunk_cache_total: usize,
    /// End offset of the pending bulk, including its CRLF, measured from
    /// the start of the first cached chunk. Zero when no bulk is pending.
    pending_bulk_len: usize,
    pending_blob_error: bool,
    frames: Vec<Frame>,

    return_buffers: bool,
    string_numbers: bool,
    big_int: bool,
}

impl Default for RespParser {
    fn default() -> Self {
        Self::from_options(ParserOptions::default())
    }
}

impl RespParser {
    /// Creates a parser with the given options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ExclusiveNumberModes`] when `string_numbers`
    /// and `big_int` are both set.
    pub fn new(options: ParserOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self::from_options(options))
    }

    fn from_options(options: ParserOptions) -> Self {
        Self {
            buffer: Bytes::new(),
            offset: 0,
            chunk_cache: Vec::new(),
            chunk_cache_total: 0,
            pending_bulk_len: 0,
            pending_blob_error: false,
            frames: Vec::new(),
            return_buffers: options.return_buffers,
            string_numbers: options.string_numbers,
            big_int: options.big_int,
        }
    }

    /// Pushes a chunk of bytes into the parser.
    ///
    /// Every reply completed by this chunk is delivered through `sink`
    /// before the call returns. A reply left incomplete fires on a later
    /// feed; no reply is ever delivered twice or partially.
    pub fn feed<S: ReplySink>(&mut self, chunk: &[u8], sink: &mut S) {
        trace!(len = chunk.len(), "feeding chunk");
        if self.pending_bulk_len > 0 {
            self.feed_pending(chunk, sink);
            return;
        }
        if self.offset < self.buffer.len() {
            // Carry the unread tail over in front of the new chunk.
            let tail = self.buffer.len() - self.offset;
            let mut merged = BytesMut::with_capacity(tail + chunk.len());
            merged.extend_from_slice(&self.buffer[self.offset..]);
            merged.extend_from_slice(chunk);
            self.buffer = merged.freeze();
        } else {
            self.buffer = Bytes::copy_from_slice(chunk);
        }
        self.offset = 0;
        self.run(sink);
    }

    /// Drops all pending state, readying the parser for a fresh stream.
    ///
    /// Mode flags are configuration and survive the reset.
    pub fn reset(&mut self) {
        self.clear();
    }

    /// Toggles delivery of string payloads as raw bytes.
    ///
    /// Affects replies that begin after the call.
    pub fn set_return_buffers(&mut self, value: bool) {
        self.return_buffers = value;
    }

    /// Toggles delivery of numbers as verbatim decimal text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ExclusiveNumberModes`] when enabling while
    /// `big_int` is active.
    pub fn set_string_numbers(&mut self, value: bool) -> Result<(), ConfigError> {
        if value && self.big_int {
            return Err(ConfigError::ExclusiveNumberModes);
        }
        self.string_numbers = value;
        Ok(())
    }

    /// Toggles delivery of integers as arbitrary-precision values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ExclusiveNumberModes`] when enabling while
    /// `string_numbers` is active.
    pub fn set_big_int(&mut self, value: bool) -> Result<(), ConfigError> {
        if value && self.string_numbers {
            return Err(ConfigError::ExclusiveNumberModes);
        }
        self.big_int = value;
        Ok(())
    }

    // --------------------------------------------------------------------
    // Decode loop
    // --------------------------------------------------------------------

    fn run<S: ReplySink>(&mut self, sink: &mut S) {
        while self.offset < self.buffer.len() {
            match self.parse_value() {
                Ok(Step::Value(value)) => self.settle(Some(value), sink),
                Ok(Step::Opened) => self.settle(None, sink),
                Ok(Step::Need | Step::Pending) => return,
                Err(violation) => {
                    self.abort(violation, sink);
                    return;
                }
            }
        }
        // Fully drained: release the buffer. Open frames, if any, resume
        // against the next chunk.
        self.buffer = Bytes::new();
        self.offset = 0;
    }

    /// Decodes one value starting at the cursor, which must sit on a tag
    /// byte. On [`Step::Need`] the cursor is rewound to that tag so the
    /// value restarts once more bytes arrive; a pending bulk instead keeps
    /// the cursor on its payload start for the chunk cache.
    fn parse_value(&mut self) -> Result<Step, Violation> {
        let start = self.offset;
        let tag = self.buffer[start];
        self.offset += 1;
        let step = match tag {
            b'+' => self.parse_simple_string(),
            b'-' => self.parse_simple_error(),
            b':' => self.parse_integer(),
            b'$' | b'=' => self.parse_bulk(false),
            b'!' => self.parse_bulk(true),
            b'_' => self.parse_null(),
            b'#' => self.parse_boolean(),
            b',' => self.parse_double(),
            b'(' => self.parse_big_number(),
            b'*' => self.parse_aggregate(FrameKind::Array),
            b'~' => self.parse_aggregate(FrameKind::Set),
            b'%' => self.parse_aggregate(FrameKind::Map),
            b'>' => self.parse_aggregate(FrameKind::Push),
            b'|' => self.parse_aggregate(FrameKind::Attribute),
            byte => Err(Violation {
                kind: ViolationKind::UnknownType(byte),
                at: start,
            }),
        }?;
        if matches!(step, Step::Need) {
            self.offset = start;
        }
        Ok(step)
    }

    /// Routes a completed value into the open frames, popping every frame
    /// it completes, and delivers whatever reaches top level.
    fn settle<S: ReplySink>(&mut self, mut incoming: Option<Reply>, sink: &mut S) {
        loop {
            if let Some(value) = incoming.take() {
                match self.frames.last_mut() {
                    None => {
                        deliver(value, sink);
                        return;
                    }
                    Some(frame) => frame.items.push(value),
                }
            }
            match self.frames.last() {
                Some(frame) if frame.is_complete() => {
                    let frame = self.frames.pop().expect("completed frame");
                    match frame.kind {
                        FrameKind::Attribute => {
                            // Side-band metadata: no value bubbles, the next
                            // reply decoded here is the one it decorates.
                            sink.on_attribute(pair_up(frame.items));
                            return;
                        }
                        FrameKind::Push if self.frames.is_empty() => {
                            sink.on_push(Reply::Array(frame.items));
                            return;
                        }
                        FrameKind::Array | FrameKind::Push => {
                            incoming = Some(Reply::Array(frame.items));
                        }
                        FrameKind::Set => incoming = Some(Reply::Set(frame.items)),
                        FrameKind::Map => incoming = Some(Reply::Map(pair_up(frame.items))),
                    }
                }
                _ => return,
            }
        }
    }

    fn abort<S: ReplySink>(&mut self, violation: Violation, sink: &mut S) {
        let error = ProtocolError {
            kind: violation.kind,
            offset: violation.at,
            buffer: self.buffer.clone(),
        };
        debug!(%error, "protocol violation, discarding parser state");
        self.clear();
        sink.on_fatal(error);
    }

    fn clear(&mut self) {
        self.buffer = Bytes::new();
        self.offset = 0;
        self.chunk_cache.clear();
        self.chunk_cache_total = 0;
        self.pending_bulk_len = 0;
        self.pending_blob_error = false;
        self.frames.clear();
    }

    // --------------------------------------------------------------------
    // Scalar decoders
    // --------------------------------------------------------------------

    /// Scans for a CRLF pair from `from`. Returns the content end and the
    /// offset past the LF. A CR not followed by LF is body content; the
    /// scan continues behind it.
    fn find_line(&self, from: usize) -> Option<(usize, usize)> {
        let hay: &[u8] = &self.buffer;
        let mut search = from;
        while let Some(found) = memchr(b'\r', &hay[search..]) {
            let cr = search + found;
            match hay.get(cr + 1) {
                Some(&b'\n') => return Some((cr, cr + 2)),
                Some(_) => search = cr + 1,
                None => return None,
            }
        }
        None
    }

    /// `return_buffers`, minus the forced-text contexts: attribute bodies
    /// always decode as text.
    fn buffers_mode(&self) -> bool {
        self.return_buffers && !self.frames.iter().any(|f| f.kind == FrameKind::Attribute)
    }

    fn parse_simple_string(&mut self) -> Result<Step, Violation> {
        let Some((end, next)) = self.find_line(self.offset) else {
            return Ok(Step::Need);
        };
        let reply = if self.buffers_mode() {
            Reply::Buffer(self.buffer.slice(self.offset..end))
        } else {
            Reply::SimpleString(decode_text(&self.buffer[self.offset..end]))
        };
        self.offset = next;
        Ok(Step::Value(reply))
    }

    fn parse_simple_error(&mut self) -> Result<Step, Violation> {
        let Some((end, next)) = self.find_line(self.offset) else {
            return Ok(Step::Need);
        };
        let message = decode_text(&self.buffer[self.offset..end]);
        self.offset = next;
        Ok(Step::Value(Reply::Error(ErrorReply {
            code: None,
            message,
        })))
    }

    fn parse_integer(&mut self) -> Result<Step, Violation> {
        let Some((end, next)) = self.find_line(self.offset) else {
            return Ok(Step::Need);
        };
        let raw = &self.buffer[self.offset..end];
        if let Err((at, byte)) = numbers::check_decimal(raw) {
            return Err(Violation {
                kind: ViolationKind::InvalidDigit(byte),
                at: self.offset + at,
            });
        }
        let reply = if self.string_numbers {
            Reply::Number(decode_text(raw))
        } else if self.big_int {
            Reply::BigNumber(numbers::big_number_text(raw))
        } else {
            match numbers::parse_i64(raw) {
                Some(value) => Reply::Integer(value),
                // Past the i64 range: keep the exact digits.
                None => Reply::BigNumber(numbers::big_number_text(raw)),
            }
        };
        self.offset = next;
        Ok(Step::Value(reply))
    }

    fn parse_null(&mut self) -> Result<Step, Violation> {
        if self.buffer.len() < self.offset + 2 {
            return Ok(Step::Need);
        }
        if self.buffer[self.offset..self.offset + 2] != *b"\r\n" {
            let at = self.offset;
            return Err(Violation {
                kind: ViolationKind::BadTerminator(self.buffer[at]),
                at,
            });
        }
        self.offset += 2;
        Ok(Step::Value(Reply::Null))
    }

    fn parse_boolean(&mut self) -> Result<Step, Violation> {
        if self.buffer.len() < self.offset + 3 {
            return Ok(Step::Need);
        }
        let value = match self.buffer[self.offset] {
            b't' => true,
            b'f' => false,
            byte => {
                return Err(Violation {
                    kind: ViolationKind::InvalidBoolean(byte),
                    at: self.offset,
                });
            }
        };
        if self.buffer[self.offset + 1..self.offset + 3] != *b"\r\n" {
            let at = self.offset + 1;
            return Err(Violation {
                kind: ViolationKind::BadTerminator(self.buffer[at]),
                at,
            });
        }
        self.offset += 3;
        Ok(Step::Value(Reply::Boolean(value)))
    }

    fn parse_double(&mut self) -> Result<Step, Violation> {
        let Some((end, next)) = self.find_line(self.offset) else {
            return Ok(Step::Need);
        };
        let raw = &self.buffer[self.offset..end];
        let reply = if self.string_numbers {
            Reply::Number(numbers::double_text(raw))
        } else {
            match numbers::parse_double(raw) {
                Some(value) => Reply::Double(value),
                None => {
                    return Err(Violation {
                        kind: ViolationKind::BadDouble(decode_text(raw)),
                        at: self.offset,
                    });
                }
            }
        };
        self.offset = next;
        Ok(Step::Value(reply))
    }

    fn parse_big_number(&mut self) -> Result<Step, Violation> {
        let Some((end, next)) = self.find_line(self.offset) else {
            return Ok(Step::Need);
        };
        let raw = &self.buffer[self.offset..end];
        if let Err((at, byte)) = numbers::check_decimal(raw) {
            return Err(Violation {
                kind: ViolationKind::InvalidDigit(byte),
                at: self.offset + at,
            });
        }
        let reply = Reply::BigNumber(numbers::big_number_text(raw));
        self.offset = next;
        Ok(Step::Value(reply))
    }

    // --------------------------------------------------------------------
    // Bulk strings and the chunk cache
    // --------------------------------------------------------------------

    fn parse_bulk(&mut self, blob_error: bool) -> Result<Step, Violation> {
        let Some((end, next)) = self.find_line(self.offset) else {
            return Ok(Step::Need);
        };
        let len = self.parse_length(end, ViolationKind::BadBulkLength)?;
        if len == -1 {
            // RESP2 null bulk.
            self.offset = next;
            return Ok(Step::Value(Reply::Null));
        }
        if len < -1 {
            return Err(Violation {
                kind: ViolationKind::BadBulkLength(len.to_string()),
                at: self.offset,
            });
        }
        #[allow(clippy::cast_sign_loss)]
        let len = len as usize;
        let body = next;
        let Some(total) = body.checked_add(len).and_then(|v| v.checked_add(2)) else {
            return Err(Violation {
                kind: ViolationKind::BadBulkLength(len.to_string()),
                at: self.offset,
            });
        };
        if total <= self.buffer.len() {
            let reply = self.shape_bulk(body, body + len, blob_error);
            self.offset = total;
            return Ok(Step::Value(reply));
        }
        // The payload spans feeds: stash the whole buffer and absorb
        // chunks without decoding until the target length is covered.
        self.offset = body;
        self.pending_bulk_len = total;
        self.pending_blob_error = blob_error;
        self.chunk_cache.push(self.buffer.clone());
        self.chunk_cache_total = self.buffer.len();
        Ok(Step::Pending)
    }

    fn shape_bulk(&self, start: usize, end: usize, blob_error: bool) -> Reply {
        if blob_error {
            Reply::Error(split_blob_error(decode_text(&self.buffer[start..end])))
        } else if self.buffers_mode() {
            Reply::Buffer(self.buffer.slice(start..end))
        } else {
            Reply::BulkString(decode_text(&self.buffer[start..end]))
        }
    }

    fn feed_pending<S: ReplySink>(&mut self, chunk: &[u8], sink: &mut S) {
        if self.chunk_cache_total + chunk.len() < self.pending_bulk_len {
            self.chunk_cache.push(Bytes::copy_from_slice(chunk));
            self.chunk_cache_total += chunk.len();
            return;
        }

        let chunk = Bytes::copy_from_slice(chunk);
        self.chunk_cache.push(chunk.clone());
        self.chunk_cache_total += chunk.len();

        let reply = self.splice();

        // The tail of the final chunk holds whatever follows the bulk.
        self.offset = self.pending_bulk_len - (self.chunk_cache_total - chunk.len());
        self.buffer = chunk;
        self.chunk_cache.clear();
        self.chunk_cache_total = 0;
        self.pending_bulk_len = 0;
        self.pending_blob_error = false;

        self.settle(Some(reply), sink);
        self.run(sink);
    }

    /// Materializes the pending bulk out of the chunk cache: one pass over
    /// the cached chunks into a contiguous destination, CRLF dropped.
    fn splice(&self) -> Reply {
        let start = self.offset;
        let end = self.pending_bulk_len - 2;
        let len = end - start;

        if self.pending_blob_error || !self.buffers_mode() {
            let mut scratch = Vec::with_capacity(len);
            for part in fragments(&self.chunk_cache, start, end) {
                scratch.extend_from_slice(part);
            }
            // Decoding once over the contiguous bytes keeps multi-byte
            // sequences split across chunks intact.
            let text = String::from_utf8_lossy(&scratch).into_owned();
            if self.pending_blob_error {
                Reply::Error(split_blob_error(text))
            } else {
                Reply::BulkString(text)
            }
        } else {
            let bytes = pool::with_pool(|p| p.splice(len, fragments(&self.chunk_cache, start, end)));
            Reply::Buffer(bytes)
        }
    }

    // --------------------------------------------------------------------
    // Aggregates
    // --------------------------------------------------------------------

    fn parse_aggregate(&mut self, kind: FrameKind) -> Result<Step, Violation> {
        let Some((end, next)) = self.find_line(self.offset) else {
            return Ok(Step::Need);
        };
        let len = self.parse_length(end, ViolationKind::BadAggregateLength)?;
        if len == -1 {
            // RESP2 null array.
            self.offset = next;
            return Ok(Step::Value(Reply::Null));
        }
        if len < -1 {
            return Err(Violation {
                kind: ViolationKind::BadAggregateLength(len.to_string()),
                at: self.offset,
            });
        }
        self.offset = next;
        #[allow(clippy::cast_sign_loss)]
        self.frames.push(Frame::new(kind, len as usize));
        Ok(Step::Opened)
    }

    fn parse_length(
        &self,
        end: usize,
        overflow: fn(String) -> ViolationKind,
    ) -> Result<i64, Violation> {
        let raw = &self.buffer[self.offset..end];
        if let Err((at, byte)) = numbers::check_decimal(raw) {
            return Err(Violation {
                kind: ViolationKind::InvalidDigit(byte),
                at: self.offset + at,
            });
        }
        numbers::parse_i64(raw).ok_or_else(|| Violation {
            kind: overflow(decode_text(raw)),
            at: self.offset,
        })
    }
}

// ------------------------------------------------------------------------
// Free helpers
// ------------------------------------------------------------------------

fn deliver<S: ReplySink>(value: Reply, sink: &mut S) {
    match value {
        Reply::Error(error) => sink.on_error(error),
        value => sink.on_reply(value),
    }
}

fn pair_up(items: Vec<Reply>) -> Vec<(Reply, Reply)> {
    let mut pairs = Vec::with_capacity(items.len() / 2);
    let mut items = items.into_iter();
    while let (Some(key), Some(value)) = (items.next(), items.next()) {
        pairs.push((key, value));
    }
    pairs
}

fn split_blob_error(payload: String) -> ErrorReply {
    match payload.find(' ') {
        Some(space) => ErrorReply {
            code: Some(payload[..space].to_string()),
            message: payload[space + 1..].to_string(),
        },
        None => ErrorReply {
            code: None,
            message: payload,
        },
    }
}

fn decode_text(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

/// Yields the sub-slices of `chunks` covering `[start, end)` of their
/// concatenation.
fn fragments<'a>(chunks: &'a [Bytes], start: usize, end: usize) -> impl Iterator<Item = &'a [u8]> {
    let mut pos = 0usize;
    chunks.iter().filter_map(move |chunk| {
        let base = pos;
        pos += chunk.len();
        let lo = start.max(base);
        let hi = end.min(base + chunk.len());
        if lo < hi {
            Some(&chunk[lo - base..hi - base])
        } else {
            None
        }
    })
}
