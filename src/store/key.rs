//! Cache key derivation
//!
//! Keys are derived, never assigned: the same `(scope, name, version,
//! generator)` always maps to the same key, so a new package version
//! orphans old entries instead of expiring them.

/// Sentinel for an absent scope.
const GLOBAL_SCOPE: &str = "global";

/// Sentinel for any other absent field.
///
/// The asymmetry with [`GLOBAL_SCOPE`] is load-bearing: changing either
/// sentinel invalidates every previously written key.
const ABSENT: &str = "undefined";

/// Derive the cache key for a `(scope, name, version, generator)` tuple.
///
/// Pure and total: absent fields serialize to fixed sentinels so the
/// result is deterministic across runs.
pub fn derive_key(
    scope: Option<&str>,
    name: Option<&str>,
    version: Option<&str>,
    generator: Option<&str>,
) -> String {
    format!(
        "{}-{}-{}-{}",
        scope.unwrap_or(GLOBAL_SCOPE),
        name.unwrap_or(ABSENT),
        version.unwrap_or(ABSENT),
        generator.unwrap_or(ABSENT),
    )
}
