//! Prefix matching.
//!
//! # Responsibilities
//! - Normalize configured prefixes (one trailing `/` removed)
//! - Decide whether a request path falls under a prefix
//!
//! # Design Decisions
//! - Matching is case-sensitive, byte-wise
//! - A prefix only matches on a path-segment boundary: `a/b` covers `a/b`
//!   and `a/b/c` but never `a/bc`
//! - No longest-match; callers scan rules in declaration order

/// Strip a single trailing `/` from a configured prefix.
pub fn normalize_prefix(prefix: &str) -> &str {
    prefix.strip_suffix('/').unwrap_or(prefix)
}

/// Returns true if `path` is `prefix` or lies beneath it.
pub fn prefix_matches(prefix: &str, path: &str) -> bool {
    let prefix = normalize_prefix(prefix);
    if prefix.is_empty() {
        return false;
    }

    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
