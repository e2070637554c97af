//! The laws from §8: submission independence, XOF prefix/consistency, mode separation, reset
//! equivalence and batched/serial agreement, exercised over randomized inputs instead of a fixed
//! handful of lengths.

use b3_core::Hasher;
use chacha20::rand_core::{RngCore, SeedableRng};
use chacha20::ChaCha8Rng;

const TRIALS: usize = 64;
const MAX_LEN: usize = 8 * 1024;

fn rng_for_trial(trial: usize) -> ChaCha8Rng {
    let mut seed = [0u8; 32];
    seed[..8].copy_from_slice(&(trial as u64).to_le_bytes());
    ChaCha8Rng::from_seed(seed)
}

fn random_bytes(rng: &mut ChaCha8Rng, len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    rng.fill_bytes(&mut bytes);
    bytes
}

/// Property: how input is split across `write` calls never affects the digest.
#[test]
fn submission_independence() {
    for trial in 0..TRIALS {
        let mut rng = rng_for_trial(trial);
        let len = (rng.next_u32() as usize) % MAX_LEN;
        let data = random_bytes(&mut rng, len);

        let mut whole = Hasher::new();
        whole.write(&data);
        let expected = whole.sum256();

        let mut split = Hasher::new();
        let mut offset = 0;
        while offset < data.len() {
            let piece_len = 1 + (rng.next_u32() as usize) % 97;
            let end = (offset + piece_len).min(data.len());
            split.write(&data[offset..end]);
            offset = end;
        }
        assert_eq!(split.sum256(), expected, "trial {trial}, len {len}");
    }
}

/// Property: a longer XOF request's leading bytes equal a shorter request's output in full.
#[test]
fn xof_prefix() {
    for trial in 0..TRIALS {
        let mut rng = rng_for_trial(trial);
        let len = (rng.next_u32() as usize) % MAX_LEN;
        let data = random_bytes(&mut rng, len);

        let mut hasher = Hasher::new();
        hasher.write(&data);

        let mut short = [0u8; 32];
        hasher.finalize(&mut short);
        let mut long = vec![0u8; 500];
        hasher.finalize(&mut long);

        assert_eq!(short[..], long[..32], "trial {trial}");
    }
}

/// Property: repeated finalize calls with the same length are identical (finalize doesn't
/// mutate observable state).
#[test]
fn xof_consistency() {
    let mut hasher = Hasher::new();
    hasher.write(b"some stable input");

    let mut first = [0u8; 96];
    let mut second = [0u8; 96];
    hasher.finalize(&mut first);
    hasher.finalize(&mut second);
    assert_eq!(first, second);
}

/// Property: the three modes never collide on the same input, across many random inputs and
/// keys/contexts.
#[test]
fn mode_separation() {
    for trial in 0..TRIALS {
        let mut rng = rng_for_trial(trial);
        let len = (rng.next_u32() as usize) % MAX_LEN;
        let data = random_bytes(&mut rng, len);
        let mut key = [0u8; 32];
        rng.fill_bytes(&mut key);

        let unkeyed = {
            let mut h = Hasher::new();
            h.write(&data);
            h.sum256()
        };
        let keyed = {
            let mut h = Hasher::new_keyed(&key);
            h.write(&data);
            h.sum256()
        };
        let derived = {
            let mut h = Hasher::new_derive_key("properties test context");
            h.write(&data);
            h.sum256()
        };

        assert_ne!(unkeyed, keyed, "trial {trial}");
        assert_ne!(unkeyed, derived, "trial {trial}");
        assert_ne!(keyed, derived, "trial {trial}");
    }
}

/// Property: `reset` returns a hasher to byte-for-byte the same state as a freshly constructed
/// one with the same mode.
#[test]
fn reset_equivalence() {
    for trial in 0..TRIALS {
        let mut rng = rng_for_trial(trial);
        let discarded_len = (rng.next_u32() as usize) % MAX_LEN;
        let discarded = random_bytes(&mut rng, discarded_len);
        let kept_len = (rng.next_u32() as usize) % MAX_LEN;
        let kept = random_bytes(&mut rng, kept_len);

        let mut reused = Hasher::new();
        reused.write(&discarded);
        reused.reset();
        reused.write(&kept);

        let mut fresh = Hasher::new();
        fresh.write(&kept);

        assert_eq!(reused.sum256(), fresh.sum256(), "trial {trial}");
    }
}

/// Property: the batched chunk hasher's fast path (crossed by large enough writes) always
/// agrees with the byte-at-a-time path that never triggers it.
#[test]
fn batched_matches_serial_for_large_random_inputs() {
    for trial in 0..8 {
        let mut rng = rng_for_trial(trial);
        let chunks = 1 + (rng.next_u32() as usize) % (b3_core::PARALLEL_CHUNK_THRESHOLD * 3);
        let data = random_bytes(&mut rng, chunks * b3_core::CHUNK_LEN + 17);

        let mut fast = Hasher::new();
        fast.write(&data);

        let mut serial = Hasher::new();
        for byte in &data {
            serial.write(core::slice::from_ref(byte));
        }

        assert_eq!(fast.sum256(), serial.sum256(), "trial {trial}");
    }
}
