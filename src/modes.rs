//! The three hashing modes' one-shot convenience functions (§4.6). Each just drives a
//! [`crate::Hasher`] through a single `write` + `finalize`; the interesting logic lives there.

use crate::{Hasher, KEY_LEN, OUT_LEN};

/// Hashes `data` with the standard (unkeyed) hash function and returns the 32-byte digest.
#[must_use]
pub fn sum256(data: &[u8]) -> [u8; OUT_LEN] {
    let mut hasher = Hasher::new();
    hasher.write(data);
    hasher.sum256()
}

/// Hashes `data` with the standard (unkeyed) hash function, filling `out` with `out.len()` bytes
/// of extendable output.
pub fn sum(data: &[u8], out: &mut [u8]) {
    let mut hasher = Hasher::new();
    hasher.write(data);
    hasher.finalize(out);
}

/// Hashes `data` under `key` (MAC mode, §4.6) and returns the 32-byte digest.
#[must_use]
pub fn sum_keyed(key: &[u8; KEY_LEN], data: &[u8]) -> [u8; OUT_LEN] {
    let mut hasher = Hasher::new_keyed(key);
    hasher.write(data);
    hasher.sum256()
}

/// Derives a subkey from `context` and `key_material`, filling `out` with `out.len()` bytes
/// (§4.6). `context` should be a hardcoded, globally unique, application-specific string.
pub fn derive_key(context: &str, key_material: &[u8], out: &mut [u8]) {
    let mut hasher = Hasher::new_derive_key(context);
    hasher.write(key_material);
    hasher.finalize(out);
}
