//! Bucket selection: Jenkins' one-at-a-time hash reduced modulo the
//! bucket count.

/// Mixes `bytes` into a 32-bit value, one octet at a time, then applies
/// the three finishing avalanche steps. All arithmetic wraps.
#[inline]
pub fn one_at_a_time(bytes: &[u8]) -> u32 {
    let mut h: u32 = 0;
    for &b in bytes {
        h = h.wrapping_add(u32::from(b));
        h = h.wrapping_add(h << 10);
        h ^= h >> 6;
    }
    h = h.wrapping_add(h << 3);
    h ^= h >> 11;
    h = h.wrapping_add(h << 15);
    h
}

/// Bucket of `key` in a table of `capacity` buckets.
///
/// Deterministic for a given `(key, capacity)`, so the table can recompute
/// every entry's bucket under a new capacity while resizing.
#[inline]
pub fn bucket_index(key: &str, capacity: usize) -> usize {
    debug_assert!(capacity > 0, "bucket_index requires a non-empty table");
    one_at_a_time(key.as_bytes()) as usize % capacity
}
