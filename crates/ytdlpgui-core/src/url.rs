//! URL clean-up

/// Drop everything from the first `?` on (`?si=`, `?t=` and friends).
pub fn strip_query(url: &str) -> &str {
    match url.split_once('?') {
        Some((base, _)) => base,
        None => url,
    }
}
