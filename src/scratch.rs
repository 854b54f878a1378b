//! Pooled scratch space for validation.
//!
//! Every validating constructor builds its output in a [`ScratchBuffer`] and
//! only copies it out (via [`ScratchBuffer::freeze`]) once validation has
//! fully succeeded. Backing vectors come from a per-thread pool bucketed by
//! power-of-two capacity, and go back to it when the buffer grows, is
//! released, or is dropped. Dropping covers early returns through `?`, so a
//! failed validation never leaks its storage.
//!
//! The pool is thread-local, so a buffer is never shared between threads and
//! needs no locking.

use std::cell::RefCell;
use std::mem;
use std::sync::Arc;

use log::trace;
use utf_scalar::encode_utf8_into;

/// Smallest capacity handed out (`1 << MIN_SHIFT`).
const MIN_SHIFT: u32 = 6;
/// Larger vectors are freed instead of pooled.
const MAX_SHIFT: u32 = 20;
const MAX_PER_BUCKET: usize = 4;

struct BufferPool {
    buckets: Vec<Vec<Vec<u8>>>,
}

impl BufferPool {
    fn new() -> Self {
        BufferPool {
            buckets: (MIN_SHIFT..=MAX_SHIFT).map(|_| Vec::new()).collect(),
        }
    }

    fn rent(&mut self, min_capacity: usize) -> Vec<u8> {
        let capacity = min_capacity.max(1 << MIN_SHIFT).next_power_of_two();
        let shift = capacity.trailing_zeros();
        if shift <= MAX_SHIFT {
            if let Some(buf) = self.buckets[(shift - MIN_SHIFT) as usize].pop() {
                return buf;
            }
        }
        Vec::with_capacity(capacity)
    }

    fn give_back(&mut self, mut buf: Vec<u8>) {
        let capacity = buf.capacity();
        if capacity < (1 << MIN_SHIFT) {
            return;
        }
        // Bucket by the largest power of two not above the capacity, so a
        // rented vector always holds at least what its bucket promises.
        let shift = capacity.ilog2();
        if shift > MAX_SHIFT {
            return;
        }
        let bucket = &mut self.buckets[(shift - MIN_SHIFT) as usize];
        if bucket.len() < MAX_PER_BUCKET {
            buf.clear();
            bucket.push(buf);
        }
    }

    fn pooled(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}

thread_local! {
    static POOL: RefCell<BufferPool> = RefCell::new(BufferPool::new());
}

fn rent(min_capacity: usize) -> Vec<u8> {
    POOL.try_with(|pool| pool.borrow_mut().rent(min_capacity))
        .unwrap_or_else(|_| Vec::with_capacity(min_capacity))
}

fn give_back(buf: Vec<u8>) {
    // During thread teardown the pool may already be gone; the vector is then
    // simply freed.
    let _ = POOL.try_with(|pool| pool.borrow_mut().give_back(buf));
}

/// Number of vectors currently parked in this thread's pool.
#[cfg(test)]
pub(crate) fn pooled_buffers() -> usize {
    POOL.with(|pool| pool.borrow().pooled())
}

/// Append-only byte accumulator backed by the thread-local pool.
#[derive(Debug)]
pub struct ScratchBuffer {
    buf: Vec<u8>,
}

impl ScratchBuffer {
    /// Rent a buffer able to hold at least `capacity_hint` bytes without growing.
    pub fn with_capacity(capacity_hint: usize) -> Self {
        ScratchBuffer {
            buf: rent(capacity_hint),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Extend the written region by `n` bytes and hand those bytes out for
    /// the caller to fill.
    ///
    /// The region starts zeroed; whatever the caller leaves in it counts as
    /// written.
    pub fn reserve(&mut self, n: usize) -> &mut [u8] {
        self.ensure(n);
        let start = self.buf.len();
        self.buf.resize(start + n, 0);
        &mut self.buf[start..]
    }

    #[inline]
    pub fn append(&mut self, bytes: &[u8]) {
        self.ensure(bytes.len());
        self.buf.extend_from_slice(bytes);
    }

    #[inline]
    pub fn push(&mut self, byte: u8) {
        self.ensure(1);
        self.buf.push(byte);
    }

    /// Append the UTF-8 encoding of `cp`; values without one append nothing.
    #[inline]
    pub fn push_scalar(&mut self, cp: u32) {
        let mut utf8 = [0u8; 4];
        if let Some(len) = encode_utf8_into(cp, &mut utf8) {
            self.append(&utf8[..len]);
        }
    }

    /// Everything written so far.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Copy the written bytes into an immutable shared sequence and return the
    /// backing storage to the pool.
    pub fn freeze(self) -> Arc<[u8]> {
        Arc::from(self.as_slice())
    }

    /// Return the backing storage to the pool.
    ///
    /// Dropping the buffer does the same; this just makes the hand-back
    /// explicit at call sites that want it.
    pub fn release(self) {
        drop(self);
    }

    fn ensure(&mut self, additional: usize) {
        let needed = self.buf.len() + additional;
        if needed <= self.buf.capacity() {
            return;
        }

        let mut grown = rent(needed.max(self.buf.capacity() * 2));
        grown.extend_from_slice(&self.buf);
        trace!(
            "scratch buffer grew from {} to {} bytes",
            self.buf.capacity(),
            grown.capacity()
        );
        give_back(mem::replace(&mut self.buf, grown));
    }
}

impl Default for ScratchBuffer {
    fn default() -> Self {
        ScratchBuffer::with_capacity(0)
    }
}

impl Drop for ScratchBuffer {
    fn drop(&mut self) {
        let buf = mem::take(&mut self.buf);
        if buf.capacity() > 0 {
            give_back(buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_capacity_is_power_of_two() {
        let scratch = ScratchBuffer::with_capacity(100);
        assert!(scratch.capacity() >= 128);
        assert!(scratch.is_empty());
    }

    #[test]
    fn test_append_push_and_reserve() {
        let mut scratch = ScratchBuffer::with_capacity(4);
        scratch.append(b"<a");
        scratch.push(b'>');
        scratch.reserve(2).copy_from_slice(b"hi");
        scratch.push_scalar(0x20AC);
        scratch.push_scalar(0xD800);
        assert_eq!(scratch.as_slice(), "<a>hi\u{20AC}".as_bytes());
    }

    #[test]
    fn test_growth_preserves_content() {
        let mut scratch = ScratchBuffer::with_capacity(0);
        let initial = scratch.capacity();
        let chunk = [b'x'; 50];
        for _ in 0..10 {
            scratch.append(&chunk);
        }
        assert_eq!(scratch.len(), 500);
        assert!(scratch.capacity() > initial);
        assert!(scratch.capacity().is_power_of_two());
        assert!(scratch.as_slice().iter().all(|&b| b == b'x'));
    }

    #[test]
    fn test_release_returns_storage_to_pool() {
        // Drain whatever earlier tests on this thread left behind.
        let held: Vec<ScratchBuffer> = (0..64).map(|_| ScratchBuffer::with_capacity(64)).collect();
        let before = pooled_buffers();

        let mut scratch = ScratchBuffer::with_capacity(64);
        scratch.append(b"abc");
        scratch.release();
        assert_eq!(pooled_buffers(), before + 1);

        let reused = ScratchBuffer::with_capacity(10);
        assert!(reused.is_empty());
        assert_eq!(pooled_buffers(), before);
        drop(reused);
        drop(held);
    }

    #[test]
    fn test_freeze_and_early_return_release() {
        fn fails(scratch: &mut ScratchBuffer) -> Result<(), ()> {
            scratch.append(b"partial");
            Err(())
        }

        let held: Vec<ScratchBuffer> = (0..64).map(|_| ScratchBuffer::with_capacity(64)).collect();
        let before = pooled_buffers();
        {
            let mut scratch = ScratchBuffer::with_capacity(64);
            assert!(fails(&mut scratch).is_err());
        }
        assert_eq!(pooled_buffers(), before + 1);

        let mut scratch = ScratchBuffer::with_capacity(64);
        scratch.append(b"done");
        let frozen = scratch.freeze();
        assert_eq!(&frozen[..], b"done");
        assert_eq!(pooled_buffers(), before + 1);
        drop(held);
    }
}
