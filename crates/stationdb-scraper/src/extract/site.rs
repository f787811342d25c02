//! Contact extraction from a station's own website.

use scraper::{ElementRef, Html};
use stationdb_core::{ContactFacts, DetectionMethod};
use url::Url;

use super::dom::{body_html, body_text, innermost_containing, parent_element, selector, text_of};
use super::emails::find_emails;
use super::links::find_contact_links;
use super::phones::find_phones;
use crate::error::ExtractError;

const CONTACT_SECTION_SELECTOR: &str = "footer, header, .contact, #contact, .footer, #footer, \
     .contact-info, #contact-info, .contact-us, #contact-us";

/// Labels whose surrounding markup usually holds a phone number or address.
const CONTACT_LABELS: [&str; 4] = ["Contact Us", "Phone", "Call", "Email"];

const CONTACT_VIA_EMAIL: &str = "Contact via Email";

type Strategy = fn(&Html, &mut ContactFacts) -> Result<(), ExtractError>;

const STRATEGIES: [(DetectionMethod, Strategy); 3] = [
    (DetectionMethod::MainPageContent, main_page_content),
    (DetectionMethod::ContactSection, contact_sections),
    (DetectionMethod::ContactViaEmail, contact_via_email),
];

/// Run every site strategy over the station's home page and merge the
/// results into `facts`.
///
/// Returns the first contact page link in document order, if any, for the
/// caller's follow-up fetch. `base` must be the post-redirect URL.
pub fn extract_site_contacts(html: &str, base: &Url, facts: &mut ContactFacts) -> Option<String> {
    let doc = Html::parse_document(html);

    for (method, strategy) in &STRATEGIES {
        if let Err(e) = strategy(&doc, facts) {
            tracing::warn!(%method, error = %e, "site contact strategy failed");
        }
    }

    match find_contact_links(&doc, base) {
        Ok(links) => {
            let first = links.first().cloned();
            facts.add_contact_links(DetectionMethod::ContactPageLinks, links);
            first
        }
        Err(e) => {
            tracing::warn!(method = %DetectionMethod::ContactPageLinks, error = %e, "site contact strategy failed");
            None
        }
    }
}

/// Merge phones and emails from a fetched contact page into `facts`.
pub fn extract_contact_page(html: &str, facts: &mut ContactFacts) {
    let doc = Html::parse_document(html);
    let method = DetectionMethod::ContactPageScrape;

    let scanned = body_text(&doc).and_then(|text| body_html(&doc).map(|markup| (text, markup)));
    match scanned {
        Ok((text, markup)) => {
            facts.add_phones(method, find_phones(&text));
            facts.add_emails(method, find_emails(&format!("{text} {markup}")));
        }
        Err(e) => tracing::warn!(%method, error = %e, "contact page scan failed"),
    }
}

fn main_page_content(doc: &Html, facts: &mut ContactFacts) -> Result<(), ExtractError> {
    let text = body_text(doc)?;
    facts.add_phones(DetectionMethod::MainPageContent, find_phones(&text));
    facts.add_emails(DetectionMethod::MainPageContent, find_emails(&text));
    Ok(())
}

fn scan_section(section: ElementRef<'_>, method: DetectionMethod, facts: &mut ContactFacts) {
    let text = text_of(section);
    facts.add_phones(method, find_phones(&text));
    facts.add_emails(method, find_emails(&format!("{text} {}", section.inner_html())));
}

fn contact_sections(doc: &Html, facts: &mut ContactFacts) -> Result<(), ExtractError> {
    let sections = selector(CONTACT_SECTION_SELECTOR)?;
    for section in doc.select(&sections) {
        scan_section(section, DetectionMethod::ContactSection, facts);
    }

    // A label and its value are usually siblings, so scan the label's parent.
    for label in CONTACT_LABELS {
        for element in innermost_containing(doc, label) {
            let scope = parent_element(element).unwrap_or(element);
            scan_section(scope, DetectionMethod::ContactSection, facts);
        }
    }
    Ok(())
}

fn contact_via_email(doc: &Html, facts: &mut ContactFacts) -> Result<(), ExtractError> {
    for element in innermost_containing(doc, CONTACT_VIA_EMAIL) {
        let scope = parent_element(element).unwrap_or(element);
        let text = text_of(scope);
        facts.add_emails(
            DetectionMethod::ContactViaEmail,
            find_emails(&format!("{text} {}", scope.inner_html())),
        );
    }
    Ok(())
}
