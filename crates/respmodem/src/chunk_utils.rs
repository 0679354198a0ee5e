//! Deterministic chunking helpers shared by tests, benchmarks and the fuzz
//! target.

/// Splits `payload` into `parts` nearly-equal chunks.
///
/// The last chunk may be shorter. Asking for more parts than there are
/// bytes yields one chunk per byte.
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_chunks(payload: &[u8], parts: usize) -> Vec<&[u8]> {
    assert!(parts > 0);
    let chunk_size = payload.len().div_ceil(parts).max(1);
    payload.chunks(chunk_size).collect()
}

/// Splits `payload` into chunks whose sizes are derived from `seed`.
///
/// Deterministic for a given `(payload, seed)` pair; every chunk is at
/// least one byte.
#[must_use]
pub fn seeded_chunks(payload: &[u8], mut seed: u64) -> Vec<&[u8]> {
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < payload.len() {
        let remaining = payload.len() - start;
        let size = (seed as usize % remaining) + 1;
        chunks.push(&payload[start..start + size]);
        start += size;
        seed = seed.rotate_left(7).wrapping_add(0x9E37_79B9_7F4A_7C15);
    }
    chunks
}
