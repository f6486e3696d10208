//! Deterministic index selection into finite value pools (spec §4.A).
//!
//! Two independent implementations must agree on the pool element chosen for
//! a given input, because referential integrity across tables depends on it:
//! the same source value must always draw the same replacement, in this
//! process or any other. The exact hash family (MD5) and byte order are part
//! of that external contract and must never change.

/// Reads the first eight bytes of `MD5(input)` as a big-endian `u64` and
/// returns that value modulo `pool_len`.
///
/// Panics if `pool_len` is zero; pools are defined to be non-empty.
pub fn pool_index(input: &[u8], pool_len: usize) -> usize {
    assert!(pool_len > 0, "pool must be non-empty");
    let digest = md5::compute(input);
    let value = u64::from_be_bytes(digest.0[..8].try_into().unwrap());
    (value % pool_len as u64) as usize
}

/// Like [`pool_index`], but salts the hashed input with a disambiguating
/// `role` label so that multiple draws against the same input (e.g. first
/// name, then last name, then domain, to build an email) land on independent
/// pool elements: `MD5(role || 0x1F || input)`.
pub fn salted_pool_index(role: &str, input: &[u8], pool_len: usize) -> usize {
    let mut buf = Vec::with_capacity(role.len() + 1 + input.len());
    buf.extend_from_slice(role.as_bytes());
    buf.push(0x1F);
    buf.extend_from_slice(input);
    pool_index(&buf, pool_len)
}

/// Draws one element from `pool`, salted by `role`, keyed on `input`.
pub fn sample<'a>(role: &str, input: &str, pool: &'a [&'static str]) -> &'a str {
    pool[salted_pool_index(role, input.as_bytes(), pool.len())]
}
