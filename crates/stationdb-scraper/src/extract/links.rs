//! "Contact us" page link discovery.

use scraper::Html;
use url::Url;

use super::dom::{selector, text_of};
use crate::error::ExtractError;

const CONTACT_HREF_TERMS: [&str; 1] = ["contact"];
const CONTACT_TEXT_TERMS: [&str; 2] = ["contact", "get in touch"];

const SOCIAL_DOMAINS: [&str; 8] = [
    "facebook.com",
    "twitter.com",
    "x.com",
    "instagram.com",
    "youtube.com",
    "linkedin.com",
    "tiktok.com",
    "pinterest.com",
];

/// `true` when `url`'s host is a social network or one of its subdomains.
#[must_use]
pub fn is_social_url(url: &Url) -> bool {
    url.host_str().is_some_and(|host| {
        let host = host.to_ascii_lowercase();
        SOCIAL_DOMAINS
            .iter()
            .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
    })
}

/// Absolute contact-page URLs in document order, without duplicates.
///
/// An anchor qualifies when its `href` or its visible text uses the contact
/// vocabulary. Relative hrefs resolve against `base`, which must be the
/// post-redirect URL of the page.
///
/// # Errors
///
/// Returns [`ExtractError`] if the anchor selector cannot be built.
pub fn find_contact_links(doc: &Html, base: &Url) -> Result<Vec<String>, ExtractError> {
    let anchors = selector("a[href]")?;
    let mut links: Vec<String> = Vec::new();

    for anchor in doc.select(&anchors) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let href_lower = href.to_lowercase();
        let text_lower = text_of(anchor).to_lowercase();
        let matches = CONTACT_HREF_TERMS.iter().any(|t| href_lower.contains(t))
            || CONTACT_TEXT_TERMS.iter().any(|t| text_lower.contains(t));
        if !matches {
            continue;
        }

        let Ok(resolved) = base.join(href.trim()) else {
            continue;
        };
        if !matches!(resolved.scheme(), "http" | "https") || is_social_url(&resolved) {
            continue;
        }

        let resolved = resolved.to_string();
        if !links.contains(&resolved) {
            links.push(resolved);
        }
    }

    Ok(links)
}
