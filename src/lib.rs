//! Streaming BLAKE3 tree-hash engine.
//!
//! This crate implements the "hard part" of BLAKE3: the compression function, the per-chunk
//! block sequencing, the incremental Merkle-tree accumulator and the extendable-output
//! finalizer. It does not include a CLI, file I/O, or CPU feature detection for SIMD kernels —
//! those are external collaborators that feed bytes into [`Hasher::write`].
#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod batch;
mod chunk;
mod hasher;
mod modes;
mod output;
mod platform;
mod portable;

#[cfg(feature = "std")]
mod pool;

pub use hasher::Hasher;
pub use modes::{derive_key, sum, sum256, sum_keyed};
#[cfg(feature = "std")]
pub use pool::{CvBufferPool, CvWords};

/// The number of bytes in a hash output.
pub const OUT_LEN: usize = 32;
/// The number of bytes in a key.
pub const KEY_LEN: usize = 32;
/// The number of bytes in a block, the unit the compression function consumes.
pub const BLOCK_LEN: usize = 64;
/// The number of bytes in a chunk, the leaf unit of the Merkle tree.
pub const CHUNK_LEN: usize = 1024;

/// Number of chunks at which the batched chunk hasher considers fanning work out across worker
/// threads (see [`batch::chunk_cvs`]). Purely a performance policy: property "batched = serial"
/// must hold regardless of whether this threshold is crossed.
pub const PARALLEL_CHUNK_THRESHOLD: usize = 128;

/// An 8-word chaining value, the compressed representation of a subtree root.
pub(crate) type CVWords = [u32; 8];
/// A 64-byte block reinterpreted as 16 little-endian words.
pub(crate) type BlockWords = [u32; 16];
/// A 64-byte block in its raw byte representation.
pub(crate) type BlockBytes = [u8; BLOCK_LEN];

pub(crate) const IV: CVWords = [
    0x6A09_E667,
    0xBB67_AE85,
    0x3C6E_F372,
    0xA54F_F53A,
    0x510E_527F,
    0x9B05_688C,
    0x1F83_D9AB,
    0x5BE0_CD19,
];

pub(crate) const MSG_PERMUTATION: [usize; 16] =
    [2, 6, 3, 10, 7, 0, 4, 13, 1, 11, 12, 5, 9, 14, 15, 8];

// Domain-separation flags, one bit each, combined into the compression function's flags byte.
pub(crate) const CHUNK_START: u8 = 1 << 0;
pub(crate) const CHUNK_END: u8 = 1 << 1;
pub(crate) const PARENT: u8 = 1 << 2;
pub(crate) const ROOT: u8 = 1 << 3;
pub(crate) const KEYED_HASH: u8 = 1 << 4;
pub(crate) const DERIVE_KEY_CONTEXT: u8 = 1 << 5;
pub(crate) const DERIVE_KEY_MATERIAL: u8 = 1 << 6;
