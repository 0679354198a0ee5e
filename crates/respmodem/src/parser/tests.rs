use bytes::Bytes;

use super::*;
use crate::{CollectSink, ParserOptions, SinkEvent};

fn parser() -> RespParser {
    RespParser::new(ParserOptions::default()).unwrap()
}

#[test]
fn find_line_skips_stray_cr() {
    let mut p = parser();
    p.buffer = Bytes::from_static(b"ab\rcd\r\nrest");
    assert_eq!(p.find_line(0), Some((5, 7)));
}

#[test]
fn find_line_needs_the_lf() {
    let mut p = parser();
    p.buffer = Bytes::from_static(b"abc\r");
    assert_eq!(p.find_line(0), None);
    p.buffer = Bytes::from_static(b"abc");
    assert_eq!(p.find_line(0), None);
    p.buffer = Bytes::new();
    assert_eq!(p.find_line(0), None);
}

#[test]
fn incomplete_scalar_rewinds_to_its_tag() {
    let mut p = parser();
    let mut sink = CollectSink::new();
    p.feed(b":12", &mut sink);
    // The cursor sits on the tag so the next feed redecodes the value.
    assert_eq!(p.offset, 0);
    assert_eq!(&p.buffer[..], b":12");
    p.feed(b"3\r\n", &mut sink);
    assert_eq!(sink.events, vec![SinkEvent::Reply(Reply::Integer(123))]);
    assert!(p.buffer.is_empty());
    assert_eq!(p.offset, 0);
}

#[test]
fn open_frames_survive_a_drained_buffer() {
    let mut p = parser();
    let mut sink = CollectSink::new();
    p.feed(b"*2\r\n:1\r\n", &mut sink);
    assert_eq!(p.frames.len(), 1);
    assert_eq!(p.frames[0].items.len(), 1);
    assert!(sink.events.is_empty());
    p.feed(b":2\r\n", &mut sink);
    assert!(p.frames.is_empty());
    assert_eq!(sink.events.len(), 1);
}

#[test]
fn pending_bulk_tracks_the_chunk_cache() {
    let mut p = parser();
    let mut sink = CollectSink::new();
    p.feed(b"$10\r\nabc", &mut sink);
    assert_eq!(p.pending_bulk_len, 17);
    assert_eq!(p.chunk_cache.len(), 1);
    assert_eq!(p.chunk_cache_total, 8);
    assert_eq!(p.offset, 5);

    p.feed(b"def", &mut sink);
    assert_eq!(p.chunk_cache.len(), 2);
    assert_eq!(p.chunk_cache_total, 11);
    assert!(sink.events.is_empty());

    p.feed(b"ghij\r\n", &mut sink);
    assert_eq!(p.pending_bulk_len, 0);
    assert!(p.chunk_cache.is_empty());
    assert_eq!(
        sink.events,
        vec![SinkEvent::Reply(Reply::BulkString("abcdefghij".into()))]
    );
}

#[test]
fn violation_clears_every_piece_of_state() {
    let mut p = parser();
    let mut sink = CollectSink::new();
    p.feed(b"*2\r\n:1\r\nX", &mut sink);
    assert!(matches!(sink.events.last(), Some(SinkEvent::Fatal(_))));
    assert!(p.buffer.is_empty());
    assert_eq!(p.offset, 0);
    assert!(p.frames.is_empty());
    assert!(p.chunk_cache.is_empty());
    assert_eq!(p.pending_bulk_len, 0);
}

#[test]
fn fragments_cover_the_requested_window() {
    let chunks = vec![
        Bytes::from_static(b"abc"),
        Bytes::from_static(b"defg"),
        Bytes::from_static(b"hi"),
    ];
    let parts: Vec<&[u8]> = fragments(&chunks, 2, 8).collect();
    assert_eq!(parts, vec![b"c".as_slice(), b"defg".as_slice(), b"h".as_slice()]);

    let empty: Vec<&[u8]> = fragments(&chunks, 4, 4).collect();
    assert!(empty.is_empty());
}

#[test]
fn blob_error_split() {
    let with_code = split_blob_error("SYNTAX invalid syntax".into());
    assert_eq!(with_code.code.as_deref(), Some("SYNTAX"));
    assert_eq!(with_code.message, "invalid syntax");

    let bare = split_blob_error("oops".into());
    assert_eq!(bare.code, None);
    assert_eq!(bare.message, "oops");
}
