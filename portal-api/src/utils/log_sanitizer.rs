//! Log sanitization utilities
//!
//! Keeps bearer tokens, card data and large response bodies out of
//! debug/error logs.

/// Maximum number of characters to include in truncated log output.
const TRUNCATE_LIMIT: usize = 256;

/// Number of trailing characters left visible by [`mask_secret`].
const VISIBLE_SUFFIX: usize = 4;

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a string for safe logging.
///
/// Returns the original string if it's within the limit,
/// otherwise returns the first `TRUNCATE_LIMIT` bytes with a suffix
/// indicating the total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Mask a secret (token, card number) so only the last few characters remain.
///
/// Secrets shorter than or equal to the visible suffix are fully masked.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= VISIBLE_SUFFIX {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - VISIBLE_SUFFIX..].iter().collect();
    format!("{}{visible}", "*".repeat(chars.len() - VISIBLE_SUFFIX))
}
