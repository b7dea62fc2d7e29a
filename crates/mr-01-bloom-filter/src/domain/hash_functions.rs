//! Hash functions for the Bloom filter
//!
//! One MurmurHash3 x64-128 pass per item; the two 64-bit halves feed the
//! double hashing scheme h(i) = h1 + i * h2 (Kirsch-Mitzenmacher).

use std::io::Cursor;

/// Fixed seed so every process derives the same positions for an item
pub const HASH_SEED: u32 = 0;

/// Hash an element with MurmurHash3 and split the result into two halves
pub fn base_hashes(element: &[u8]) -> (u64, u64) {
    let mut cursor = Cursor::new(element);
    // Reading from an in-memory cursor cannot fail
    let hash = murmur3::murmur3_x64_128(&mut cursor, HASH_SEED).unwrap_or(0);
    let h1 = hash as u64;
    // An even h2 would revisit the same slots when m is a power of two
    let h2 = ((hash >> 64) as u64) | 1;
    (h1, h2)
}

/// Iterate the `k` bit positions for an element in a filter of `m` bits
pub fn hash_positions(element: &[u8], k: usize, m: usize) -> impl Iterator<Item = usize> {
    let (h1, h2) = base_hashes(element);
    let m = m as u64;

    (0..k as u64).map(move |i| (h1.wrapping_add(i.wrapping_mul(h2)) % m) as usize)
}
