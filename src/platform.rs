//! Little-endian word/byte conversions shared by the portable compression path and the public
//! key-loading helpers.

use crate::{BlockBytes, BlockWords, CVWords, KEY_LEN};

/// Converts a 32-byte key into its 8 little-endian words.
#[inline(always)]
pub(crate) fn key_words_from_bytes(key: &[u8; KEY_LEN]) -> CVWords {
    let mut words = [0u32; 8];
    for (word, chunk) in words.iter_mut().zip(key.chunks_exact(4)) {
        *word = u32::from_le_bytes(chunk.try_into().expect("chunk of length 4; qed"));
    }
    words
}

/// Converts a 64-byte block into its 16 little-endian words.
#[inline(always)]
pub(crate) fn words_from_le_bytes_64(bytes: &BlockBytes) -> BlockWords {
    let mut words = [0u32; 16];
    for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
        *word = u32::from_le_bytes(chunk.try_into().expect("chunk of length 4; qed"));
    }
    words
}
