//! Boundary cases of the wire grammar.

use rstest::rstest;

use super::run_chunks;
use crate::{ParserOptions, Reply, SinkEvent};

#[rstest]
#[case(b":\r\n".as_slice(), Reply::Integer(0))]
#[case(b":-\r\n".as_slice(), Reply::Integer(0))]
#[case(b":0\r\n".as_slice(), Reply::Integer(0))]
#[case(b":-42\r\n".as_slice(), Reply::Integer(-42))]
#[case(b":9223372036854775807\r\n".as_slice(), Reply::Integer(i64::MAX))]
#[case(b":9223372036854775808\r\n".as_slice(), Reply::BigNumber("9223372036854775808".into()))]
#[case(b"$-1\r\n".as_slice(), Reply::Null)]
#[case(b"*-1\r\n".as_slice(), Reply::Null)]
#[case(b"*0\r\n".as_slice(), Reply::Array(vec![]))]
#[case(b"~0\r\n".as_slice(), Reply::Set(vec![]))]
#[case(b"%0\r\n".as_slice(), Reply::Map(vec![]))]
#[case(b"$0\r\n\r\n".as_slice(), Reply::BulkString(String::new()))]
#[case(b"$8\r\nfoo\r\nbar\r\n".as_slice(), Reply::BulkString("foo\r\nbar".into()))]
#[case(b"_\r\n".as_slice(), Reply::Null)]
#[case(b"#t\r\n".as_slice(), Reply::Boolean(true))]
#[case(b"#f\r\n".as_slice(), Reply::Boolean(false))]
#[case(b",inf\r\n".as_slice(), Reply::Double(f64::INFINITY))]
#[case(b",-inf\r\n".as_slice(), Reply::Double(f64::NEG_INFINITY))]
#[case(b",3.14\r\n".as_slice(), Reply::Double(3.14))]
#[case(b",10\r\n".as_slice(), Reply::Double(10.0))]
#[case(
    b"(3492890328409238509324850943850943825024385\r\n".as_slice(),
    Reply::BigNumber("3492890328409238509324850943850943825024385".into())
)]
#[case(b"(-7\r\n".as_slice(), Reply::BigNumber("-7".into()))]
#[case(b"=15\r\ntxt:Some string\r\n".as_slice(), Reply::BulkString("txt:Some string".into()))]
#[case(b"+a\rb\r\n".as_slice(), Reply::SimpleString("a\rb".into()))]
fn single_reply(#[case] wire: &[u8], #[case] expected: Reply) {
    let events = run_chunks(ParserOptions::default(), &[wire]);
    assert_eq!(events, vec![SinkEvent::Reply(expected)]);
}

#[test]
fn single_byte_chunks() {
    let events = run_chunks(ParserOptions::default(), &[b":", b"1", b"\r", b"\n"]);
    assert_eq!(events, vec![SinkEvent::Reply(Reply::Integer(1))]);
}

#[test]
fn no_reply_until_the_final_byte() {
    let wire = b"*1\r\n$3\r\nfoo\r\n";
    for cut in 1..wire.len() {
        let events = run_chunks(ParserOptions::default(), &[&wire[..cut]]);
        assert!(events.is_empty(), "premature event at cut {cut}");
    }
}

#[test]
fn every_two_way_split_decodes_identically() {
    let wire = b"%1\r\n+k\r\n*2\r\n:1\r\n!9\r\nERR oops!\r\n";
    let whole = run_chunks(ParserOptions::default(), &[wire]);
    for cut in 1..wire.len() {
        let split = run_chunks(ParserOptions::default(), &[&wire[..cut], &wire[cut..]]);
        assert_eq!(split, whole, "divergence at cut {cut}");
    }
}

#[test]
fn cr_at_chunk_boundary_is_not_a_terminator() {
    // The CR is the last byte of the first chunk; only the LF in the next
    // chunk completes the line.
    let events = run_chunks(ParserOptions::default(), &[b"+abc\r", b"\n"]);
    assert_eq!(
        events,
        vec![SinkEvent::Reply(Reply::SimpleString("abc".into()))]
    );
}

#[test]
fn empty_chunks_are_harmless() {
    let events = run_chunks(ParserOptions::default(), &[b"", b":5\r", b"", b"\n", b""]);
    assert_eq!(events, vec![SinkEvent::Reply(Reply::Integer(5))]);
}
