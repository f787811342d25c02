//! Official-website resolution from an encyclopedia article.
//!
//! Five strategies run in priority order and the first hit wins:
//! infobox "Website" row, "Official website" entry under External links,
//! any acceptable infobox link, a call-sign domain guess found in the page
//! text, and finally any acceptable External links anchor.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};
use stationdb_core::DetectionMethod;
use url::Url;

use super::dom::{body_text, selector, text_of};
use crate::error::ExtractError;

static INFOBOX_DENYLIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(facebook|twitter|instagram|youtube|linkedin|wikipedia|fcc\.gov|rabbitears|imdb)")
        .expect("valid regex")
});

static EXTERNAL_LINKS_DENYLIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(facebook|twitter|instagram|youtube|linkedin|wikipedia|fcc\.gov|rabbitears|imdb|archive\.org)",
    )
    .expect("valid regex")
});

/// Map and geocoding services linked from coordinates in article infoboxes.
const MAP_MARKERS: [&str; 5] = [
    "geohack",
    "maps.google.",
    "google.com/maps",
    "openstreetmap.org",
    "wmflabs.org",
];

/// Hosts that are never a station's own website.
const NON_STATION_DOMAINS: [&str; 9] = [
    "wikipedia.org",
    "wikimedia.org",
    "wikidata.org",
    "fcc.gov",
    "facebook.com",
    "twitter.com",
    "instagram.com",
    "youtube.com",
    "linkedin.com",
];

const EXTERNAL_LINKS_IDS: [&str; 2] = ["External_links", "External_Links"];

/// A resolved official website and the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebsiteMatch {
    pub url: String,
    pub method: DetectionMethod,
}

type Strategy = fn(&Html, Option<&str>) -> Result<Option<String>, ExtractError>;

const STRATEGIES: [(DetectionMethod, Strategy); 5] = [
    (DetectionMethod::InfoboxWebsite, infobox_website_row),
    (DetectionMethod::ExternalLinksOfficial, external_links_official),
    (DetectionMethod::InfoboxLink, infobox_any_link),
    (DetectionMethod::CallSignPattern, call_sign_pattern),
    (DetectionMethod::ExternalLinksFallback, external_links_any),
];

/// Resolve the station's official website from article markup.
///
/// A strategy that fails is logged and skipped. A winning URL that points at
/// a map service or a non-station domain is discarded and `None` returned.
#[must_use]
pub fn resolve_official_website(html: &str, call_sign: Option<&str>) -> Option<WebsiteMatch> {
    let doc = Html::parse_document(html);

    let found = STRATEGIES.iter().find_map(|(method, strategy)| {
        match strategy(&doc, call_sign) {
            Ok(Some(url)) => {
                tracing::debug!(%method, url = %url, "official website strategy matched");
                Some(WebsiteMatch {
                    url,
                    method: *method,
                })
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(%method, error = %e, "official website strategy failed");
                None
            }
        }
    })?;

    if is_false_positive(&found.url) {
        tracing::debug!(url = %found.url, method = %found.method, "discarding non-station website");
        return None;
    }
    Some(found)
}

/// Strip the fragment, default the scheme to https, and require an absolute
/// URL with a host.
#[must_use]
pub fn clean_url(raw: &str) -> Option<String> {
    let without_fragment = raw.split('#').next().unwrap_or_default().trim();
    if without_fragment.is_empty() {
        return None;
    }
    let candidate = if without_fragment.starts_with("//") {
        format!("https:{without_fragment}")
    } else if without_fragment.starts_with("http") {
        without_fragment.to_owned()
    } else {
        format!("https://{without_fragment}")
    };
    let parsed = Url::parse(&candidate).ok()?;
    parsed.host_str()?;
    Some(candidate)
}

/// `true` for map links and hosts that belong to an encyclopedia, social
/// network, or the regulator.
#[must_use]
pub fn is_false_positive(url: &str) -> bool {
    let lower = url.to_lowercase();
    if MAP_MARKERS.iter().any(|marker| lower.contains(marker)) {
        return true;
    }
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
        .is_some_and(|host| {
            NON_STATION_DOMAINS
                .iter()
                .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
        })
}

fn first_http_href(element: ElementRef<'_>) -> Result<Option<String>, ExtractError> {
    let links = selector(r#"a[href^="http"]"#)?;
    Ok(element
        .select(&links)
        .filter_map(|a| a.value().attr("href"))
        .find_map(clean_url))
}

fn infobox_website_row(doc: &Html, _: Option<&str>) -> Result<Option<String>, ExtractError> {
    let rows = selector(".infobox tr")?;
    let cells = selector("th, td")?;

    for row in doc.select(&rows) {
        let labelled = row.select(&cells).any(|cell| {
            let text = text_of(cell).to_lowercase();
            text.contains("website") || text.contains("web site")
        });
        if labelled {
            if let Some(url) = first_http_href(row)? {
                return Ok(Some(url));
            }
        }
    }
    Ok(None)
}

/// Siblings following the External links heading, up to the next section.
fn external_links_section(doc: &Html) -> Result<Vec<ElementRef<'_>>, ExtractError> {
    let ids = selector("#External_links, #External_Links")?;
    let Some(anchor) = doc
        .select(&ids)
        .find(|el| el.value().id().is_some_and(|id| EXTERNAL_LINKS_IDS.contains(&id)))
    else {
        return Ok(Vec::new());
    };

    let Some(heading) = anchor.parent().and_then(ElementRef::wrap) else {
        return Ok(Vec::new());
    };

    Ok(heading
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .take_while(|el| !is_section_heading(*el))
        .collect())
}

fn is_section_heading(element: ElementRef<'_>) -> bool {
    let name = element.value().name();
    name == "h2"
        || name == "h3"
        || (name == "div" && element.value().classes().any(|c| c == "mw-heading"))
}

fn external_links_official(doc: &Html, _: Option<&str>) -> Result<Option<String>, ExtractError> {
    let items = selector("li")?;
    for block in external_links_section(doc)? {
        for item in block.select(&items) {
            let text = text_of(item).to_lowercase();
            if text.contains("official website") || text.contains("official site") {
                if let Some(url) = first_http_href(item)? {
                    return Ok(Some(url));
                }
            }
        }
    }
    Ok(None)
}

fn infobox_any_link(doc: &Html, _: Option<&str>) -> Result<Option<String>, ExtractError> {
    let links = selector(r#".infobox a[href^="http"]"#)?;
    Ok(doc
        .select(&links)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| !INFOBOX_DENYLIST.is_match(href))
        .find_map(clean_url))
}

/// Domain guesses for a call sign, most specific first.
fn call_sign_domains(call_sign: &str) -> Vec<String> {
    let call_sign = call_sign.split(" (").next().unwrap_or(call_sign).trim();
    let compact: String = call_sign
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    let mut domains = vec![format!("{compact}.com")];

    let hyphenated = format!("{}.com", call_sign.to_lowercase());
    if !domains.contains(&hyphenated) {
        domains.push(hyphenated);
    }

    let digits: String = compact.chars().filter(char::is_ascii_digit).collect();
    if !digits.is_empty() {
        domains.push(format!("fox{digits}.com"));
    }
    domains
}

fn call_sign_pattern(doc: &Html, call_sign: Option<&str>) -> Result<Option<String>, ExtractError> {
    let Some(call_sign) = call_sign.filter(|c| !c.trim().is_empty()) else {
        return Ok(None);
    };
    let text = body_text(doc)?;

    for domain in call_sign_domains(call_sign) {
        let Ok(pattern) = Regex::new(&format!("(?i){}", regex::escape(&domain))) else {
            continue;
        };
        if let Some(m) = pattern.find(&text) {
            if let Some(url) = clean_url(&m.as_str().to_lowercase()) {
                return Ok(Some(url));
            }
        }
    }
    Ok(None)
}

fn external_links_any(doc: &Html, _: Option<&str>) -> Result<Option<String>, ExtractError> {
    let links = selector(r#"a[href^="http"]"#)?;
    for block in external_links_section(doc)? {
        let hrefs = std::iter::once(block)
            .filter(|el| el.value().name() == "a")
            .chain(block.select(&links))
            .filter_map(|a| a.value().attr("href"))
            .filter(|href| href.starts_with("http"))
            .filter(|href| !EXTERNAL_LINKS_DENYLIST.is_match(href));
        for href in hrefs {
            if let Some(url) = clean_url(href) {
                return Ok(Some(url));
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
#[path = "website_test.rs"]
mod tests;
