//! The streaming hasher: the Merkle-stack accumulator (§4.4) and the finalizer (§4.5) wired up
//! around [`crate::chunk::ChunkState`] and the batched hasher in [`crate::batch`].

use crate::batch::{chunk_cvs, parent_output};
use crate::chunk::ChunkState;
use crate::output::Output;
use crate::{CVWords, BLOCK_LEN, CHUNK_LEN, OUT_LEN};

/// Maximum depth of the subtree stack: `2^54` chunks already covers `2^64` bytes of input, so
/// the stack can never need a 55th entry.
const MAX_STACK_DEPTH: usize = 54;

/// How many chunks to hash per call into the batched chunk hasher while streaming a large
/// contiguous write (§4.7). Chosen to match [`crate::PARALLEL_CHUNK_THRESHOLD`] so that a large
/// enough write always gives the `parallel` feature's worker fan-out a full-sized batch to work
/// with, while keeping the scratch buffer a small, fixed-size stack allocation.
const WRITE_BATCH_CHUNKS: usize = crate::PARALLEL_CHUNK_THRESHOLD;

/// A streaming BLAKE3 hasher with extendable output.
///
/// Constructed via [`crate::Hasher::new`], [`crate::Hasher::new_keyed`] or
/// [`crate::Hasher::new_derive_key`]; see the crate-level docs for the one-shot convenience
/// functions. Not `Sync`/shareable across threads without external synchronization — see the
/// crate docs' concurrency notes.
#[derive(Debug, Clone)]
pub struct Hasher {
    chunk_state: ChunkState,
    key_words: CVWords,
    cv_stack: [CVWords; MAX_STACK_DEPTH],
    cv_stack_len: u8,
    flags: u8,
}

impl Hasher {
    pub(crate) fn new_internal(key_words: CVWords, flags: u8) -> Self {
        Self {
            chunk_state: ChunkState::new(key_words, 0, flags),
            key_words,
            cv_stack: [[0; 8]; MAX_STACK_DEPTH],
            cv_stack_len: 0,
            flags,
        }
    }

    /// Constructs a hasher for the standard (unkeyed) hash function.
    #[must_use]
    pub fn new() -> Self {
        Self::new_internal(crate::IV, 0)
    }

    /// Constructs a hasher for the keyed hash function (MAC mode).
    #[must_use]
    pub fn new_keyed(key: &[u8; crate::KEY_LEN]) -> Self {
        let key_words = crate::platform::key_words_from_bytes(key);
        Self::new_internal(key_words, crate::KEYED_HASH)
    }

    /// Constructs a hasher for the key-derivation function. `context` should be a hardcoded,
    /// globally unique, application-specific string, per §4.6.
    #[must_use]
    pub fn new_derive_key(context: &str) -> Self {
        let mut context_hasher = Self::new_internal(crate::IV, crate::DERIVE_KEY_CONTEXT);
        context_hasher.write(context.as_bytes());
        let mut context_key = [0u8; crate::KEY_LEN];
        context_hasher.finalize(&mut context_key);
        let key_words = crate::platform::key_words_from_bytes(&context_key);
        Self::new_internal(key_words, crate::DERIVE_KEY_MATERIAL)
    }

    fn push_stack(&mut self, cv: CVWords) {
        self.cv_stack[usize::from(self.cv_stack_len)] = cv;
        self.cv_stack_len += 1;
    }

    fn pop_stack(&mut self) -> CVWords {
        self.cv_stack_len -= 1;
        self.cv_stack[usize::from(self.cv_stack_len)]
    }

    /// Implements the push-complete-chunk rule from §4.4: collapse complete left subtrees
    /// (counted by the trailing zeros of `total_chunks`) before pushing the result.
    fn add_chunk_chaining_value(&mut self, mut new_cv: CVWords, mut total_chunks: u64) {
        while total_chunks & 1 == 0 {
            let left = self.pop_stack();
            new_cv = parent_output(&left, &new_cv, &self.key_words, self.flags).chaining_value();
            total_chunks >>= 1;
        }
        self.push_stack(new_cv);
    }

    /// Appends `input` to the hash state. Never fails: this engine has no fallible operations
    /// (§7).
    pub fn write(&mut self, mut input: &[u8]) {
        while !input.is_empty() {
            // Streaming fast path (§4.7): bypass the per-byte buffer when a large contiguous
            // region arrives and no chunk is in progress.
            if self.chunk_state.len() == 0 && input.len() > CHUNK_LEN {
                let mut full_chunks = input.len() / CHUNK_LEN;
                // The last chunk must stay deferred in case more input follows, even when the
                // input ends exactly on a chunk boundary.
                if input.len() % CHUNK_LEN == 0 {
                    full_chunks -= 1;
                }

                if full_chunks > 0 {
                    let mut counter = self.chunk_state.chunk_counter();
                    let mut remaining = full_chunks;
                    let mut cursor = input;
                    let mut cv_batch = [[0u32; 8]; WRITE_BATCH_CHUNKS];

                    while remaining > 0 {
                        let batch = remaining.min(WRITE_BATCH_CHUNKS);
                        let batch_bytes = &cursor[..batch * CHUNK_LEN];
                        chunk_cvs(batch_bytes, &self.key_words, counter, self.flags, &mut cv_batch[..batch]);
                        for cv in &cv_batch[..batch] {
                            let total_chunks = counter + 1;
                            self.add_chunk_chaining_value(*cv, total_chunks);
                            counter = total_chunks;
                        }
                        cursor = &cursor[batch * CHUNK_LEN..];
                        remaining -= batch;
                    }

                    self.chunk_state = ChunkState::new(self.key_words, counter, self.flags);
                    input = cursor;
                    continue;
                }
            }

            if self.chunk_state.len() == CHUNK_LEN {
                let chunk_cv = self.chunk_state.output().chaining_value();
                let total_chunks = self.chunk_state.chunk_counter() + 1;
                self.add_chunk_chaining_value(chunk_cv, total_chunks);
                self.chunk_state = ChunkState::new(self.key_words, total_chunks, self.flags);
            }

            let want = CHUNK_LEN - self.chunk_state.len();
            let take = want.min(input.len());
            self.chunk_state.update(&input[..take]);
            input = &input[take..];
        }
    }

    /// Builds the root descriptor without mutating `self`: a snapshot of the stack folded over
    /// the active chunk's output, top to bottom (§4.5).
    fn root_output(&self) -> Output {
        let mut output = self.chunk_state.output();
        for i in (0..usize::from(self.cv_stack_len)).rev() {
            let right = output.chaining_value();
            output = parent_output(&self.cv_stack[i], &right, &self.key_words, self.flags);
        }
        output
    }

    /// Fills `out` with `out.len()` bytes of extendable output. May be called repeatedly, and
    /// writing may continue afterwards (producing a different digest on the next finalize) — see
    /// §9 "Root reuse".
    pub fn finalize(&self, out: &mut [u8]) {
        self.root_output().root_output_bytes(out);
    }

    /// Returns the standard 32-byte digest.
    #[must_use]
    pub fn sum256(&self) -> [u8; OUT_LEN] {
        let mut out = [0u8; OUT_LEN];
        self.finalize(&mut out);
        out
    }

    /// Resets the hasher to its just-constructed state, preserving the mode and key.
    pub fn reset(&mut self) {
        self.chunk_state = ChunkState::new(self.key_words, 0, self.flags);
        self.cv_stack_len = 0;
    }

    /// The output size in bytes of [`Self::sum256`]: always 32.
    #[must_use]
    pub const fn size() -> usize {
        OUT_LEN
    }

    /// The block size in bytes of the underlying compression function: always 64.
    #[must_use]
    pub const fn block_size() -> usize {
        BLOCK_LEN
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}
