//! The batched chunk and parent hashing pipeline (§4.3 / §4.4).
//!
//! The serial loop in [`chunk_cv_serial`] is the semantic reference. [`chunk_cvs`] is the fast
//! path: it always produces bit-identical output to calling [`chunk_cv_serial`] once per chunk,
//! whether or not it fans work out across worker threads (property 6, §8). This crate does not
//! implement SIMD lanes itself (that's an external collaborator, §1); the "batching" it performs
//! is coarse, thread-level parallelism, gated behind the `parallel` feature.

use crate::output::Output;
use crate::platform::words_from_le_bytes_64;
use crate::portable::compress_in_place;
use crate::{BlockBytes, CVWords, BLOCK_LEN, CHUNK_END, CHUNK_LEN, CHUNK_START, PARALLEL_CHUNK_THRESHOLD};

/// Hashes one complete, aligned chunk. This is the reference every batched/parallel path must
/// match bit-for-bit.
pub(crate) fn chunk_cv_serial(
    chunk_bytes: &[u8; CHUNK_LEN],
    key_words: &CVWords,
    counter: u64,
    flags: u8,
) -> CVWords {
    let mut cv = *key_words;
    for block_index in 0..(CHUNK_LEN / BLOCK_LEN) {
        let start = block_index * BLOCK_LEN;
        let block: &BlockBytes = chunk_bytes[start..start + BLOCK_LEN]
            .try_into()
            .expect("exactly BLOCK_LEN");
        let block_words = words_from_le_bytes_64(block);

        let mut block_flags = flags;
        if block_index == 0 {
            block_flags |= CHUNK_START;
        }
        if block_index + 1 == CHUNK_LEN / BLOCK_LEN {
            block_flags |= CHUNK_END;
        }
        compress_in_place(&mut cv, &block_words, counter, BLOCK_LEN as u32, u32::from(block_flags));
    }
    cv
}

/// Hashes `out.len()` consecutive complete chunks starting at chunk index `counter`, matching
/// [`chunk_cv_serial`] applied once per chunk. `input.len()` must equal `out.len() * CHUNK_LEN`.
pub(crate) fn chunk_cvs(input: &[u8], key_words: &CVWords, counter: u64, flags: u8, out: &mut [CVWords]) {
    debug_assert_eq!(input.len(), out.len() * CHUNK_LEN);

    #[cfg(feature = "parallel")]
    if out.len() >= PARALLEL_CHUNK_THRESHOLD && rayon::current_num_threads() > 1 {
        use rayon::prelude::*;

        out.par_iter_mut().enumerate().for_each(|(i, cv)| {
            let chunk: &[u8; CHUNK_LEN] = input[i * CHUNK_LEN..(i + 1) * CHUNK_LEN]
                .try_into()
                .expect("exactly CHUNK_LEN");
            *cv = chunk_cv_serial(chunk, key_words, counter + i as u64, flags);
        });
        return;
    }
    #[cfg(not(feature = "parallel"))]
    let _ = PARALLEL_CHUNK_THRESHOLD;

    for (i, cv) in out.iter_mut().enumerate() {
        let chunk: &[u8; CHUNK_LEN] = input[i * CHUNK_LEN..(i + 1) * CHUNK_LEN]
            .try_into()
            .expect("exactly CHUNK_LEN");
        *cv = chunk_cv_serial(chunk, key_words, counter + i as u64, flags);
    }
}

pub(crate) fn parent_output(left: &CVWords, right: &CVWords, key_words: &CVWords, flags: u8) -> Output {
    let mut block_words = [0u32; 16];
    block_words[..8].copy_from_slice(left);
    block_words[8..].copy_from_slice(right);
    Output {
        input_chaining_value: *key_words,
        block_words,
        counter: 0,
        block_len: BLOCK_LEN as u32,
        flags: flags | crate::PARENT,
    }
}

/// Combines two child chaining values into their parent's. Only used by [`parent_cvs`] below;
/// the incremental Merkle accumulator in [`crate::hasher`] calls [`parent_output`] directly since
/// it needs the unfinalized descriptor for the root case, not just the chaining value.
#[cfg(test)]
fn parent_cv(left: &CVWords, right: &CVWords, key_words: &CVWords, flags: u8) -> CVWords {
    parent_output(left, right, key_words, flags).chaining_value()
}

/// Combines `pairs.len()` sibling pairs into their parents in one call, matching [`parent_cv`]
/// applied once per pair. This is the batched-parent-hasher contract from §4.3/§4.4's pipeline.
/// The incremental Merkle accumulator in [`crate::hasher`] never calls it directly: each stack
/// merge pops one sibling and depends on the popped value, so those merges are inherently
/// sequential (the reference implementation doesn't batch them either). It's exercised here so
/// the "batched = serial" property (§8) covers parent nodes, not just chunks.
#[cfg(test)]
pub(crate) fn parent_cvs(pairs: &[(CVWords, CVWords)], key_words: &CVWords, flags: u8, out: &mut [CVWords]) {
    debug_assert_eq!(pairs.len(), out.len());
    for ((left, right), cv) in pairs.iter().zip(out) {
        *cv = parent_cv(left, right, key_words, flags);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IV;

    #[test]
    fn batched_chunk_hashing_matches_serial() {
        const NUM_CHUNKS: usize = 6;
        let input: [u8; NUM_CHUNKS * CHUNK_LEN] = core::array::from_fn(|i| (i % 251) as u8);

        let mut batched = [[0u32; 8]; NUM_CHUNKS];
        chunk_cvs(&input, &IV, 10, 0, &mut batched);

        for i in 0..NUM_CHUNKS {
            let chunk: &[u8; CHUNK_LEN] = input[i * CHUNK_LEN..(i + 1) * CHUNK_LEN]
                .try_into()
                .unwrap();
            let serial = chunk_cv_serial(chunk, &IV, 10 + i as u64, 0);
            assert_eq!(batched[i], serial, "chunk {i}");
        }
    }

    #[test]
    fn batched_parent_hashing_matches_serial() {
        let pairs: [(CVWords, CVWords); 3] = [
            ([1; 8], [2; 8]),
            ([3; 8], [4; 8]),
            ([5; 8], [6; 8]),
        ];
        let mut batched = [[0u32; 8]; 3];
        parent_cvs(&pairs, &IV, 0, &mut batched);
        for (i, (left, right)) in pairs.iter().enumerate() {
            assert_eq!(batched[i], parent_cv(left, right, &IV, 0), "pair {i}");
        }
    }
}
