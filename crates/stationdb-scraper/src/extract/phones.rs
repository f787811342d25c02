//! Phone number detection over plain text.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::normalize_phone;

/// Applied in order; every match goes through [`normalize_phone`].
static PHONE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // 205-583-4300, 205.583.4300, 205 583 4300
        r"\b\d{3}[-.\s]\d{3}[-.\s]\d{4}\b",
        // (205) 583-4300
        r"\(\d{3}\)[-.\s]*\d{3}[-.\s]*\d{4}\b",
        r"\b\d{3}\s\d{3}\s\d{4}\b",
        // +1 (205) 583-4300, 1-205-583-4300
        r"\+?\b1[-.\s]*\(?\d{3}\)?[-.\s]*\d{3}[-.\s]*\d{4}\b",
        r"\b\d{10}\b",
        r"(?i)\b\d{3}[-.\s]\d{3}[-.\s]\d{4}\s*(?:ext\.?|extension|x)\s*\d+\b",
        r"(?i)\(\d{3}\)[-.\s]*\d{3}[-.\s]*\d{4}\s*(?:ext\.?|extension|x)\s*\d+\b",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("valid regex"))
    .collect()
});

/// Canonical phone numbers found in `text`.
///
/// When a number was also seen with an extension, the bare form is dropped
/// in favour of the extended one.
#[must_use]
pub fn find_phones(text: &str) -> BTreeSet<String> {
    let found: BTreeSet<String> = PHONE_PATTERNS
        .iter()
        .flat_map(|pattern| pattern.find_iter(text))
        .filter_map(|m| normalize_phone(m.as_str()))
        .collect();

    let extended_mains: BTreeSet<&str> = found
        .iter()
        .filter_map(|phone| phone.split_once(" ext. ").map(|(main, _)| main))
        .collect();

    found
        .iter()
        .filter(|phone| !extended_mains.contains(phone.as_str()))
        .cloned()
        .collect()
}
