//! Benchmark – `respmodem::RespParser`
#![allow(missing_docs)]

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use respmodem::{produce_chunks, CollectSink, ParserOptions, RespParser};

/// Produce a deterministic RESP payload of exactly `target_len` bytes: one
/// large bulk string so that every scenario stresses the cross-chunk bulk
/// path, followed by small pipelined replies.
fn make_wire_payload(target_len: usize) -> Vec<u8> {
    let tail = b"+OK\r\n:12345\r\n*2\r\n:1\r\n:2\r\n";
    let header_and_crlf = |body_len: usize| format!("${body_len}\r\n").len() + 2;

    let mut body_len = target_len.saturating_sub(tail.len() + header_and_crlf(target_len));
    while body_len + header_and_crlf(body_len) + tail.len() != target_len {
        body_len += 1;
    }

    let mut wire = format!("${body_len}\r\n").into_bytes();
    wire.extend(std::iter::repeat(b'a').take(body_len));
    wire.extend_from_slice(b"\r\n");
    wire.extend_from_slice(tail);
    debug_assert_eq!(wire.len(), target_len);
    wire
}

/// Feed the payload in `parts` chunks and return the number of delivered
/// events so Criterion can black-box the work.
fn run_streaming_parser(payload: &[u8], parts: usize, return_buffers: bool) -> usize {
    let mut parser = RespParser::new(ParserOptions {
        return_buffers,
        ..Default::default()
    })
    .expect("valid options");
    let mut sink = CollectSink::new();

    for chunk in produce_chunks(payload, parts) {
        parser.feed(chunk, &mut sink);
    }

    sink.events.len()
}

fn bench_streaming_parser(c: &mut Criterion) {
    let payload = make_wire_payload(100_000);

    let mut group = c.benchmark_group("streaming_parser_split");

    for &parts in &[10usize, 100, 1_000] {
        for &(name, return_buffers) in &[("text", false), ("buffers", true)] {
            group.bench_with_input(
                BenchmarkId::new(parts.to_string(), name),
                &return_buffers,
                |b, &mode| {
                    b.iter(|| {
                        let count = run_streaming_parser(black_box(&payload), parts, mode);
                        black_box(count);
                    });
                },
            );
        }
    }
    group.finish();
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(5))
            .measurement_time(Duration::from_secs(10));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_streaming_parser }
criterion_main!(benches);
