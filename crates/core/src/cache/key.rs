//! Cache key derivation.

/// Derive the cache key for an entity resolved by a named source.
///
/// Keys have the form `{source}_{kind}_{id}`, so the same show resolved by
/// different sources never shares an entry.
pub fn cache_key(source: &str, kind: &str, id: &str) -> String {
    format!("{source}_{kind}_{id}")
}
