//! Thread-local buffer pool for splicing multi-chunk bulk payloads.
//!
//! Splicing a large bulk string out of its cached chunks needs one
//! contiguous destination per payload. Allocating that destination fresh
//! for every payload is wasteful on busy connections, so splices are bump-
//! allocated out of a shared arena that grows with the largest payload seen
//! and decays back down while the connection is quiet.
//!
//! The arena hands out [`Bytes`] views, so a spliced payload stays readable
//! for as long as the caller keeps the handle; growing or decaying the
//! arena never invalidates earlier splices. The pool is thread-local rather
//! than locked: a parser instance is single-threaded by contract.

use std::{
    cell::RefCell,
    time::{Duration, Instant},
};

use bytes::{Bytes, BytesMut};

const INITIAL_SIZE: usize = 32 * 1024;
const DECAY_FLOOR: usize = 50 * 1024;
const DECAY_PERIOD: Duration = Duration::from_millis(50);
/// Splices past this size grow the arena 2x instead of 3x.
const DOUBLE_THRESHOLD: usize = 75 * 1024 * 1024;
const CARRY_CLAMP_AT: usize = 111 * 1024 * 1024;
const CARRY_CLAMP_TO: usize = 50 * 1024 * 1024;

pub(crate) struct BufferPool {
    arena: BytesMut,
    /// Size of the arena's current allocation.
    size: usize,
    last_decay: Instant,
}

impl BufferPool {
    pub(crate) fn new() -> Self {
        Self {
            arena: BytesMut::with_capacity(INITIAL_SIZE),
            size: INITIAL_SIZE,
            last_decay: Instant::now(),
        }
    }

    /// Copies `parts` (totalling `len` bytes) into the arena and returns
    /// one contiguous view of them.
    pub(crate) fn splice<'a, I>(&mut self, len: usize, parts: I) -> Bytes
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        self.decay(Instant::now());
        if self.arena.capacity() < len {
            self.grow(len);
        }
        debug_assert!(self.arena.is_empty());
        for part in parts {
            self.arena.extend_from_slice(part);
        }
        debug_assert_eq!(self.arena.len(), len);
        self.arena.split().freeze()
    }

    fn grow(&mut self, len: usize) {
        // The write cursor: bytes of the current allocation consumed by
        // earlier splices.
        let mut carry = self.size.saturating_sub(self.arena.capacity());
        if carry > CARRY_CLAMP_AT {
            carry = CARRY_CLAMP_TO;
        }
        let factor = if len > DOUBLE_THRESHOLD { 2 } else { 3 };
        self.size = len * factor + carry;
        self.arena = BytesMut::with_capacity(self.size);
        self.last_decay = Instant::now();
    }

    /// Applies one 10% shrink step per elapsed decay period. Inert once the
    /// arena is at or below the floor, until the next growth re-arms it.
    fn decay(&mut self, now: Instant) {
        if self.size <= DECAY_FLOOR {
            self.last_decay = now;
            return;
        }
        let periods = now.duration_since(self.last_decay).as_millis() / DECAY_PERIOD.as_millis();
        if periods == 0 {
            return;
        }
        self.last_decay = now;
        self.decay_steps(periods.min(usize::MAX as u128) as usize);
    }

    fn decay_steps(&mut self, mut steps: usize) {
        let before = self.size;
        while steps > 0 && self.size > DECAY_FLOOR {
            self.size -= self.size / 10;
            steps -= 1;
        }
        if self.size != before {
            self.arena = BytesMut::with_capacity(self.size);
        }
    }

    #[cfg(test)]
    fn size(&self) -> usize {
        self.size
    }

    #[cfg(test)]
    fn free(&self) -> usize {
        self.arena.capacity()
    }
}

thread_local! {
    static POOL: RefCell<BufferPool> = RefCell::new(BufferPool::new());
}

pub(crate) fn with_pool<R>(f: impl FnOnce(&mut BufferPool) -> R) -> R {
    POOL.with(|pool| f(&mut pool.borrow_mut()))
}
