//! The deferred compression descriptor and the extendable-output streaming it enables.

use crate::portable::compress;
use crate::{BlockWords, CVWords, BLOCK_LEN, ROOT};

/// A not-yet-performed compression. Chunk folding and the Merkle accumulator both produce one
/// of these instead of compressing eagerly, because the caller (finalize) may need to override
/// the counter and add the `ROOT` flag before the compression actually happens. Building this is
/// free of side effects, so it can be constructed repeatedly from a snapshot of hasher state
/// without mutating anything — that's what makes `Hasher::finalize` idempotent.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Output {
    pub(crate) input_chaining_value: CVWords,
    pub(crate) block_words: BlockWords,
    pub(crate) counter: u64,
    pub(crate) block_len: u32,
    pub(crate) flags: u8,
}

impl Output {
    /// Performs the compression with this descriptor's own counter and flags, keeping only the
    /// 8-word chaining value. Used for non-root (chunk and parent) compressions.
    pub(crate) fn chaining_value(&self) -> CVWords {
        let state = compress(
            &self.input_chaining_value,
            &self.block_words,
            self.counter,
            self.block_len,
            u32::from(self.flags),
        );
        let mut cv = [0u32; 8];
        cv.copy_from_slice(&state[..8]);
        cv
    }

    /// Streams `out.len()` bytes of extendable output by repeatedly compressing this descriptor
    /// with `ROOT` set and an incrementing output-block counter, per §4.5. The descriptor's own
    /// stored counter is ignored here and overridden by the output-block counter.
    pub(crate) fn root_output_bytes(&self, mut out: &mut [u8]) {
        let mut output_block_counter = 0u64;
        while !out.is_empty() {
            let state = compress(
                &self.input_chaining_value,
                &self.block_words,
                output_block_counter,
                self.block_len,
                u32::from(self.flags | ROOT),
            );
            let block_bytes = {
                let mut bytes = [0u8; 64];
                for (chunk, word) in bytes.chunks_exact_mut(4).zip(state) {
                    chunk.copy_from_slice(&word.to_le_bytes());
                }
                bytes
            };
            let take = out.len().min(BLOCK_LEN);
            out[..take].copy_from_slice(&block_bytes[..take]);
            out = &mut out[take..];
            output_block_counter += 1;
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IV;

    #[test]
    fn root_output_is_deterministic_and_extendable() {
        let descriptor = Output {
            input_chaining_value: IV,
            block_words: [0; 16],
            counter: 0,
            block_len: 0,
            flags: 0,
        };

        let mut short = [0u8; 16];
        descriptor.root_output_bytes(&mut short);
        let mut long = [0u8; 128];
        descriptor.root_output_bytes(&mut long);
        assert_eq!(short[..], long[..16]);
    }
}
