#![no_main]
use libfuzzer_sys::fuzz_target;
use respmodem::{seeded_chunks, CollectSink, ParserOptions, RespParser};

// 1 flag byte + 4-byte split seed, then the wire bytes.
const HEADER: usize = 5;

fn parse(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let flags = data[0];
    let split_seed = u64::from(u32::from_le_bytes(data[1..5].try_into().unwrap()));
    let data = &data[HEADER..];
    if data.is_empty() {
        return;
    }

    let options = ParserOptions {
        return_buffers: flags & 1 != 0,
        string_numbers: flags & 2 != 0,
        big_int: flags & 4 != 0,
    };
    let Ok(mut parser) = RespParser::new(options) else {
        return;
    };

    // Feed the same bytes twice with a reset in between: the second pass
    // must be unaffected by whatever state the first one left behind.
    let mut sink = CollectSink::new();
    for chunk in seeded_chunks(data, split_seed) {
        parser.feed(chunk, &mut sink);
    }
    parser.reset();
    for chunk in seeded_chunks(data, split_seed.rotate_left(13)) {
        parser.feed(chunk, &mut sink);
    }
}

fuzz_target!(|data: &[u8]| parse(data));
