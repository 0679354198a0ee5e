//! The callback surface decoded replies are delivered through.
//!
//! The parser does not own its sink; [`RespParser::feed`] borrows one for
//! the duration of the call and invokes it synchronously, once per complete
//! top-level value, in wire order.
//!
//! [`RespParser::feed`]: crate::RespParser::feed

use crate::{
    error::ProtocolError,
    reply::{ErrorReply, Reply},
};

/// Receives decoded replies from [`RespParser::feed`](crate::RespParser::feed).
///
/// `on_reply` and `on_error` are the required surface. The remaining
/// methods have defaults: push frames and attributes are dropped unless
/// overridden, and fatal protocol errors fall back to `on_error`.
///
/// # Examples
///
/// ```
/// use respmodem::{ErrorReply, Reply, ReplySink};
///
/// struct Printer;
///
/// impl ReplySink for Printer {
///     fn on_reply(&mut self, reply: Reply) {
///         println!("reply: {reply:?}");
///     }
///
///     fn on_error(&mut self, error: ErrorReply) {
///         eprintln!("server error: {error}");
///     }
/// }
/// ```
pub trait ReplySink {
    /// Deliver an ordinary reply.
    fn on_reply(&mut self, reply: Reply);

    /// Deliver a server-side error received on the wire.
    ///
    /// Only top-level errors arrive here; errors nested inside aggregates
    /// stay embedded as [`Reply::Error`] elements.
    fn on_error(&mut self, error: ErrorReply);

    /// Deliver an out-of-band push frame.
    fn on_push(&mut self, push: Reply) {
        let _ = push;
    }

    /// Deliver attribute metadata. The attributes decorate the next reply
    /// delivered at the same position.
    fn on_attribute(&mut self, attribute: Vec<(Reply, Reply)>) {
        let _ = attribute;
    }

    /// Deliver a fatal protocol violation. The parser has already discarded
    /// its state when this fires.
    fn on_fatal(&mut self, error: ProtocolError) {
        self.on_error(ErrorReply::message(error.to_string()));
    }
}

/// One recorded sink invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Reply(Reply),
    Error(ErrorReply),
    Push(Reply),
    Attribute(Vec<(Reply, Reply)>),
    Fatal(ProtocolError),
}

/// A sink that records every callback in order.
///
/// Useful for tests and for hosts that prefer pulling a batch of events
/// after each `feed` over handling callbacks inline.
///
/// # Examples
///
/// ```
/// use respmodem::{CollectSink, ParserOptions, Reply, RespParser, SinkEvent};
///
/// let mut parser = RespParser::new(ParserOptions::default()).unwrap();
/// let mut sink = CollectSink::new();
/// parser.feed(b":42\r\n", &mut sink);
/// assert_eq!(sink.events, vec![SinkEvent::Reply(Reply::Integer(42))]);
/// ```
#[derive(Debug, Default)]
pub struct CollectSink {
    /// The recorded callback trace.
    pub events: Vec<SinkEvent>,
}

impl CollectSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains the recorded events.
    pub fn take_events(&mut self) -> Vec<SinkEvent> {
        std::mem::take(&mut self.events)
    }
}

impl ReplySink for CollectSink {
    fn on_reply(&mut self, reply: Reply) {
        self.events.push(SinkEvent::Reply(reply));
    }

    fn on_error(&mut self, error: ErrorReply) {
        self.events.push(SinkEvent::Error(error));
    }

    fn on_push(&mut self, push: Reply) {
        self.events.push(SinkEvent::Push(push));
    }

    fn on_attribute(&mut self, attribute: Vec<(Reply, Reply)>) {
        self.events.push(SinkEvent::Attribute(attribute));
    }

    fn on_fatal(&mut self, error: ProtocolError) {
        self.events.push(SinkEvent::Fatal(error));
    }
}
