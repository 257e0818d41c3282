//! Pooled read buffers.
//!
//! The driver rents one buffer per deserialization call. Returning happens
//! in `Drop`, so the scrub-and-return guarantee holds on success, error and
//! panic paths alike: a buffer that held payload bytes is zeroed before any
//! later call can observe it.

use std::ops::{Deref, DerefMut};
use std::sync::Mutex;

/// Capacity handed to stream reads that do not ask for a specific size.
pub(crate) const MIN_CAPACITY: usize = 1024;
/// Buffers above this capacity are dropped rather than pooled.
const MAX_POOLED_CAPACITY: usize = 1 << 20;
/// Upper bound on idle pooled buffers.
const MAX_POOLED: usize = 8;

static POOL: Mutex<Vec<Vec<u8>>> = Mutex::new(Vec::new());

/// One rented buffer. Dereferences to its full zero-initialized capacity;
/// the driver tracks how much of it is filled.
#[derive(Debug)]
pub(crate) struct PooledBuffer {
    data: Vec<u8>,
}

impl PooledBuffer {
    /// Rents a buffer of exactly `capacity` bytes, reusing a pooled
    /// allocation when one fits.
    pub(crate) fn rent(capacity: usize) -> Self {
        let wanted = capacity.max(1);
        let mut pool = POOL.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let found = pool.iter().position(|buf| buf.len() >= wanted);
        let data = match found {
            Some(index) => {
                let mut data = pool.swap_remove(index);
                data.truncate(wanted);
                data
            }
            None => vec![0u8; wanted],
        };
        drop(pool);
        Self { data }
    }

    /// Grows to at least `min_capacity` bytes, preserving the filled prefix
    /// in place.
    pub(crate) fn grow(&mut self, min_capacity: usize) {
        if min_capacity > self.data.len() {
            let target = min_capacity.max(self.data.len() * 2);
            self.data.resize(target, 0);
        }
    }
}

impl Deref for PooledBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl DerefMut for PooledBuffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        let mut data = std::mem::take(&mut self.data);
        data.fill(0);
        if data.len() <= MAX_POOLED_CAPACITY {
            let mut pool = POOL.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            if pool.len() < MAX_POOLED {
                pool.push(data);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rents_exactly_the_requested_capacity() {
        let buffer = PooledBuffer::rent(MIN_CAPACITY);
        assert_eq!(buffer.len(), MIN_CAPACITY);
        let buffer = PooledBuffer::rent(4096);
        assert_eq!(buffer.len(), 4096);
        // Drivers use the buffer length as the fill target, so a reused
        // allocation must come back trimmed to the request.
        let buffer = PooledBuffer::rent(64);
        assert_eq!(buffer.len(), 64);
    }

    #[test]
    fn growth_preserves_prefix() {
        let mut buffer = PooledBuffer::rent(MIN_CAPACITY);
        buffer[..4].copy_from_slice(b"abcd");
        let before = buffer.len();
        buffer.grow(before + 1);
        assert!(buffer.len() >= before * 2);
        assert_eq!(&buffer[..4], b"abcd");
    }

    #[test]
    fn returned_buffers_come_back_scrubbed() {
        let mut buffer = PooledBuffer::rent(MIN_CAPACITY);
        buffer[..6].copy_from_slice(b"secret");
        drop(buffer);
        // Whatever allocation the next rent hands out must be all zeroes.
        let buffer = PooledBuffer::rent(MIN_CAPACITY);
        assert!(buffer.iter().all(|b| *b == 0));
    }
}
