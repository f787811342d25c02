//! Canonical forms for phone numbers and email addresses.

use std::sync::LazyLock;

use regex::Regex;

static EXTENSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<main>.*?)\s*(?:extension|ext|x)\.?\s*(?P<ext>\d+)\s*$")
        .expect("valid regex")
});

/// Local parts ending in one of these are template or placeholder addresses.
const PLACEHOLDER_LOCAL_PARTS: [&str; 7] = [
    "example",
    "test",
    "sample",
    "noreply",
    "no-reply",
    "donotreply",
    "placeholder",
];

/// Retina asset names such as `logo@2x.png` look like addresses.
const ASSET_SUFFIXES: [&str; 6] = [".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp"];

/// Normalize a raw phone match to `(AAA) BBB-CCCC`, with ` ext. N` appended
/// when an extension was present.
///
/// Returns `None` unless the main number has exactly 10 digits, or 11 digits
/// starting with the country code `1`. Normalizing a canonical string returns
/// it unchanged.
#[must_use]
pub fn normalize_phone(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let (main, extension) = match EXTENSION_RE.captures(raw) {
        Some(caps) => (
            caps.name("main").map_or("", |m| m.as_str()),
            caps.name("ext").map(|m| m.as_str()),
        ),
        None => (raw, None),
    };

    let digits: String = main.chars().filter(char::is_ascii_digit).collect();
    let national = match digits.len() {
        10 => digits.as_str(),
        11 if digits.starts_with('1') => &digits[1..],
        _ => return None,
    };

    let formatted = format!(
        "({}) {}-{}",
        &national[..3],
        &national[3..6],
        &national[6..]
    );
    Some(match extension {
        Some(ext) => format!("{formatted} ext. {ext}"),
        None => formatted,
    })
}

/// Lower-case `raw` and drop placeholder and asset-name matches.
#[must_use]
pub fn normalize_email(raw: &str) -> Option<String> {
    let email = raw.trim().to_lowercase();
    let (local, domain) = email.split_once('@')?;
    if local.is_empty() || domain.is_empty() {
        return None;
    }
    if PLACEHOLDER_LOCAL_PARTS
        .iter()
        .any(|placeholder| local.ends_with(placeholder))
    {
        return None;
    }
    if ASSET_SUFFIXES.iter().any(|suffix| domain.ends_with(suffix)) {
        return None;
    }
    Some(email)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
