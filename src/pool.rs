//! A small pool of reusable chaining-value scratch buffers for the batched hasher (§5).
//!
//! Hashing a large input via [`crate::batch::chunk_cvs`]'s fast path needs a `[CVWords; N]`
//! scratch buffer per call. Under the `parallel` feature that buffer is handed to worker threads
//! repeatedly; pooling it avoids a fresh stack frame's worth of zeroing on every batch when a
//! caller drives many batches back to back (e.g. hashing a long-lived stream in a loop).

use std::sync::Mutex;
use std::vec::Vec;

/// An 8-word chaining value, in the pool's own public-facing representation (kept distinct from
/// the crate's internal `CVWords` alias, which is private).
pub type CvWords = [u32; 8];

/// A pool of reusable `Vec<CvWords>` scratch buffers, sized on demand.
///
/// Mirrors a plain checkout/return pool: [`Self::get`] returns a buffer of at least `min_len`
/// entries (reusing a pooled one if large enough, allocating otherwise), and [`Self::put`]
/// returns it for reuse. Dropping a checked-out buffer instead of returning it is harmless — the
/// pool just allocates a new one next time.
#[derive(Debug, Default)]
pub struct CvBufferPool {
    buffers: Mutex<Vec<Vec<CvWords>>>,
}

impl CvBufferPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffers: Mutex::new(Vec::new()),
        }
    }

    /// Checks out a buffer with at least `min_len` zeroed entries.
    #[must_use]
    pub fn get(&self, min_len: usize) -> Vec<CvWords> {
        let mut buffers = self.buffers.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        while let Some(mut buffer) = buffers.pop() {
            if buffer.capacity() >= min_len {
                buffer.clear();
                buffer.resize(min_len, [0u32; 8]);
                return buffer;
            }
        }
        std::vec![[0u32; 8]; min_len]
    }

    /// Returns a buffer to the pool for reuse by a future [`Self::get`] call.
    pub fn put(&self, buffer: Vec<CvWords>) {
        let mut buffers = self.buffers.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        buffers.push(buffer);
    }
}
