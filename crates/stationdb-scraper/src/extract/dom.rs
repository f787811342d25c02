//! Small helpers over `scraper`'s DOM shared by every extraction strategy.

use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractError;

/// Elements whose text never holds contact details.
const NON_CONTENT_TAGS: [&str; 5] = ["script", "style", "noscript", "template", "head"];

pub(crate) fn selector(css: &'static str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Selector {
        selector: css,
        reason: e.to_string(),
    })
}

/// Text content with text nodes separated by a space and whitespace runs
/// collapsed, so adjacent cells do not run together.
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text of `<body>`, or of the whole document when there is no body.
pub(crate) fn body_text(doc: &Html) -> Result<String, ExtractError> {
    Ok(body(doc)?.map_or_else(|| text_of(doc.root_element()), text_of))
}

/// Markup of `<body>`, or of the whole document when there is no body.
pub(crate) fn body_html(doc: &Html) -> Result<String, ExtractError> {
    Ok(body(doc)?.map_or_else(|| doc.root_element().html(), |b| b.inner_html()))
}

fn body(doc: &Html) -> Result<Option<ElementRef<'_>>, ExtractError> {
    let body = selector("body")?;
    Ok(doc.select(&body).next())
}

/// Deepest content elements whose text contains `needle` (case-sensitive),
/// in document order. An element qualifies only if none of its child
/// elements also contains `needle`.
pub(crate) fn innermost_containing<'a>(doc: &'a Html, needle: &str) -> Vec<ElementRef<'a>> {
    doc.root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| !NON_CONTENT_TAGS.contains(&el.value().name()))
        .filter(|el| raw_text(*el).contains(needle))
        .filter(|el| {
            !el.children()
                .filter_map(ElementRef::wrap)
                .any(|child| raw_text(child).contains(needle))
        })
        .collect()
}

/// `element` itself or its nearest ancestor whose tag is in `tags`; falls
/// back to `element` when no such ancestor exists.
pub(crate) fn closest_block<'a>(element: ElementRef<'a>, tags: &[&str]) -> ElementRef<'a> {
    if tags.contains(&element.value().name()) {
        return element;
    }
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| tags.contains(&ancestor.value().name()))
        .unwrap_or(element)
}

pub(crate) fn parent_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.parent().and_then(ElementRef::wrap)
}

pub(crate) fn next_element_sibling(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

fn raw_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}
