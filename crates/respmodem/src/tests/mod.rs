mod boundary;

use crate::{CollectSink, ParserOptions, RespParser, SinkEvent};

/// Feeds `chunks` through a fresh parser and returns the recorded trace.
pub(crate) fn run_chunks(options: ParserOptions, chunks: &[&[u8]]) -> Vec<SinkEvent> {
    let mut parser = RespParser::new(options).expect("valid options");
    let mut sink = CollectSink::new();
    for chunk in chunks {
        parser.feed(chunk, &mut sink);
    }
    sink.events
}
