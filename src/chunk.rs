//! The per-chunk state machine: folds up to 1024 bytes (16 blocks) into a running chaining
//! value, deferring the final block so its `CHUNK_END` (and, at the root, `ROOT`) flag can be
//! set correctly.

use crate::output::Output;
use crate::platform::words_from_le_bytes_64;
use crate::portable::compress_in_place;
use crate::{BlockBytes, BlockWords, CVWords, BLOCK_LEN, CHUNK_END, CHUNK_LEN, CHUNK_START};

#[derive(Debug, Clone)]
pub(crate) struct ChunkState {
    cv: CVWords,
    chunk_counter: u64,
    buf: BlockBytes,
    buf_len: u8,
    blocks_compressed: u8,
    flags: u8,
}

impl ChunkState {
    pub(crate) fn new(key_words: CVWords, chunk_counter: u64, flags: u8) -> Self {
        Self {
            cv: key_words,
            chunk_counter,
            buf: [0; BLOCK_LEN],
            buf_len: 0,
            blocks_compressed: 0,
            flags,
        }
    }

    /// Total bytes folded into this chunk so far, including the unfolded partial buffer.
    pub(crate) fn len(&self) -> usize {
        BLOCK_LEN * usize::from(self.blocks_compressed) + usize::from(self.buf_len)
    }

    pub(crate) fn chunk_counter(&self) -> u64 {
        self.chunk_counter
    }

    fn start_flag(&self) -> u8 {
        if self.blocks_compressed == 0 {
            CHUNK_START
        } else {
            0
        }
    }

    /// Folds as many full blocks of `input` as possible, buffering the remainder. Never folds
    /// the very last block of a chunk eagerly: that fold is deferred to [`Self::output`] so its
    /// `CHUNK_END` flag (and, at the root, `ROOT`) can be set once no more input is known to
    /// follow. Panics if `input` would overflow the chunk (callers must not offer more than
    /// `CHUNK_LEN - self.len()` bytes).
    pub(crate) fn update(&mut self, mut input: &[u8]) {
        debug_assert!(self.len() + input.len() <= CHUNK_LEN);

        if self.buf_len > 0 {
            let want = BLOCK_LEN - usize::from(self.buf_len);
            let take = want.min(input.len());
            let start = usize::from(self.buf_len);
            self.buf[start..start + take].copy_from_slice(&input[..take]);
            self.buf_len += take as u8;
            input = &input[take..];

            // Only fold the buffered block if more input remains: a block that exactly fills
            // the buffer with nothing left over might be the chunk's last block.
            if !input.is_empty() {
                self.fold_buffer();
            }
        }

        while input.len() > BLOCK_LEN {
            let (block, rest) = input.split_at(BLOCK_LEN);
            let block_words = words_from_le_bytes_64(block.try_into().expect("exactly BLOCK_LEN"));
            self.fold_block(&block_words);
            input = rest;
        }

        let start = usize::from(self.buf_len);
        self.buf[start..start + input.len()].copy_from_slice(input);
        self.buf_len += input.len() as u8;

        debug_assert!(self.len() <= CHUNK_LEN);
    }

    fn fold_buffer(&mut self) {
        debug_assert_eq!(usize::from(self.buf_len), BLOCK_LEN);
        let block_words = words_from_le_bytes_64(&self.buf);
        self.fold_block(&block_words);
        self.buf = [0; BLOCK_LEN];
        self.buf_len = 0;
    }

    fn fold_block(&mut self, block_words: &BlockWords) {
        let flags = u32::from(self.flags | self.start_flag());
        compress_in_place(&mut self.cv, block_words, self.chunk_counter, BLOCK_LEN as u32, flags);
        self.blocks_compressed += 1;
    }

    /// Builds the deferred compression descriptor for this chunk's last block. Does not mutate
    /// `self`, so it may be called repeatedly (e.g. by a non-mutating `finalize`).
    pub(crate) fn output(&self) -> Output {
        let block_words = words_from_le_bytes_64(&self.buf);
        Output {
            input_chaining_value: self.cv,
            block_words,
            counter: self.chunk_counter,
            block_len: u32::from(self.buf_len),
            flags: self.flags | self.start_flag() | CHUNK_END,
        }
    }
}
