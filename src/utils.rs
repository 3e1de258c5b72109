//! Shared key and identifier utilities.

use std::fmt::Display;

/// Generate a fresh key for a stored value.
///
/// Keys are random 128-bit UUIDs. Collisions are treated as impossible and
/// nothing retries on one.
pub fn generate_key() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Build a composite key from a prefix and a suffix.
///
/// Format: `{prefix}:{suffix}`
pub fn build_key<P: Display, S: Display>(prefix: &P, suffix: &S) -> String {
    format!("{}:{}", prefix, suffix)
}

/// Resolve a Redis-style inclusive index range against a list of `len` items.
///
/// Returns `None` when the range selects nothing.
pub fn resolve_range(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if len == 0 || start > stop || start >= len || stop < 0 {
        return None;
    }
    Some((start as usize, stop as usize))
}
