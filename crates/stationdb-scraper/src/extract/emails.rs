//! Email address detection over text or raw markup.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::normalize_email;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid regex")
});

/// Lower-cased addresses in `text`, placeholders removed.
#[must_use]
pub fn find_emails(text: &str) -> BTreeSet<String> {
    EMAIL_RE
        .find_iter(text)
        .filter_map(|m| normalize_email(m.as_str()))
        .collect()
}
