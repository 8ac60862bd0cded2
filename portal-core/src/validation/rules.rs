//! Shared field rules (hostnames, phone numbers, postal codes)

use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static HOST_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$").expect("valid regex")
});

// Record names may carry underscores (`_dmarc`, `_sip._tcp`).
#[allow(clippy::expect_used)]
static RECORD_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_](?:[A-Za-z0-9_-]{0,61}[A-Za-z0-9_])?$").expect("valid regex")
});

#[allow(clippy::expect_used)]
pub(crate) static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9 ()-]{7,20}$").expect("valid regex"));

#[allow(clippy::expect_used)]
pub(crate) static POSTAL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9 -]{3,10}$").expect("valid regex"));

#[allow(clippy::expect_used)]
pub(crate) static COUNTRY_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}$").expect("valid regex"));

pub(crate) const MAX_HOSTNAME_LEN: usize = 253;

/// RFC 1123 hostname with at least two labels. A single trailing dot is accepted.
pub(crate) fn is_valid_hostname(value: &str) -> bool {
    let host = value.strip_suffix('.').unwrap_or(value);
    if host.is_empty() || host.len() > MAX_HOSTNAME_LEN || !host.contains('.') {
        return false;
    }
    let labels: Vec<&str> = host.split('.').collect();
    // The top-level label is never purely numeric, which also rejects IPv4 literals.
    let tld_numeric = labels
        .last()
        .is_some_and(|tld| tld.chars().all(|c| c.is_ascii_digit()));
    !tld_numeric && labels.iter().all(|label| HOST_LABEL.is_match(label))
}

/// Record owner name relative to the zone: `@`, `*`, `*.sub` or labels.
pub(crate) fn is_valid_record_name(value: &str) -> bool {
    if value == "@" || value == "*" {
        return true;
    }
    let name = value.strip_prefix("*.").unwrap_or(value);
    let name = name.strip_suffix('.').unwrap_or(name);
    !name.is_empty()
        && name.len() <= MAX_HOSTNAME_LEN
        && name.split('.').all(|label| RECORD_LABEL.is_match(label))
}

/// Lowercased form without a trailing dot, used for duplicate detection.
pub(crate) fn canonical_host(value: &str) -> String {
    value.trim().trim_end_matches('.').to_ascii_lowercase()
}
