//! Postcode extraction from free-text addresses.
//!
//! Listing pages render addresses inconsistently: comma-separated lines,
//! collapsed whitespace, postcode anywhere in the text. This module pulls
//! out the best-guess UK postcode, with a salvage heuristic for addresses
//! where the strict pattern never matches.

use std::sync::LazyLock;

use regex::Regex;

/// UK postcode pattern: outward code (1–2 letters, digit, optional
/// letter/digit) then inward code (digit, 2 letters), with optional
/// separating whitespace.
static POSTCODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[A-Z]{1,2}[0-9][0-9A-Z]?\s*[0-9][A-Z]{2}").expect("valid regex")
});

/// Loose salvage pattern: a 5–8 character alphanumeric run.
static SALVAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[A-Z0-9]{5,8}").expect("valid regex"));

/// Collapses runs of whitespace into single spaces.
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Extracts the best-guess postcode from a free-text address.
///
/// Commas and repeated whitespace are normalized away first. If the
/// strict pattern matches more than once, the **last** match wins,
/// since addresses put the postcode at the end. When nothing matches, the
/// final two whitespace-delimited tokens are returned as-is if they
/// contain a 5–8 character alphanumeric run; otherwise `None`.
#[must_use]
pub fn extract_postcode(address: &str) -> Option<String> {
    let cleaned = WHITESPACE_RE
        .replace_all(&address.replace(',', " "), " ")
        .trim()
        .to_string();
    if cleaned.is_empty() {
        return None;
    }

    if let Some(found) = POSTCODE_RE.find_iter(&cleaned).last() {
        return Some(found.as_str().trim().to_string());
    }

    // Salvage: the address may end in a postcode too mangled for the
    // strict pattern (missing digit, stray character).
    let parts: Vec<&str> = cleaned.split(' ').collect();
    let tail = parts[parts.len().saturating_sub(2)..].join(" ");
    if SALVAGE_RE.is_match(&tail) {
        return Some(tail);
    }

    None
}
