//! Contact extraction from a regulator public-file page.
//!
//! Phones and emails are read from the first labelled section found, scoped
//! to that label's enclosing block and the block right after it so numbers
//! elsewhere on the page are not attributed to the station. Only when no
//! labelled section exists is the whole page scanned.

use std::sync::LazyLock;

use scraper::{ElementRef, Html};
use stationdb_core::{ContactFacts, DetectionMethod};
use url::Url;

use super::dom::{
    body_text, closest_block, collapse_whitespace, innermost_containing, next_element_sibling,
    text_of,
};
use super::emails::find_emails;
use super::links::find_contact_links;
use super::phones::find_phones;
use crate::normalize::normalize_phone;

const MAIN_STUDIO_LABEL: &str = "Main Studio Address";

/// Section labels in priority order; the first present wins.
const SECTION_LABELS: [(&str, DetectionMethod); 5] = [
    (MAIN_STUDIO_LABEL, DetectionMethod::MainStudioSection),
    ("Carriage Election Contact", DetectionMethod::CarriageElectionSection),
    ("Carriage Election", DetectionMethod::CarriageElectionSection),
    ("Election Contact", DetectionMethod::CarriageElectionSection),
    ("Contact Information", DetectionMethod::ContactInformationSection),
];

const CARRIAGE_LABELS: [&str; 3] = [
    "Carriage Election Contact",
    "Carriage Election",
    "Election Contact",
];

const SECTION_BLOCKS: [&str; 8] = [
    "tr", "div", "section", "table", "fieldset", "li", "dl", "article",
];

const ADDRESS_BLOCKS: [&str; 3] = ["tr", "div", "section"];

/// The regulator's own help-desk lines, printed on every filing page.
const REGULATOR_SUPPORT_NUMBERS: [&str; 5] = [
    "877-480-3201",
    "717-338-2824",
    "888-225-5322",
    "844-432-2275",
    "866-418-0232",
];

static SUPPORT_PHONES: LazyLock<Vec<String>> = LazyLock::new(|| {
    REGULATOR_SUPPORT_NUMBERS
        .iter()
        .filter_map(|n| normalize_phone(n))
        .collect()
});

/// Run the regulator strategies over a filing page and merge into `facts`.
pub fn extract_regulator_contacts(html: &str, base: &Url, facts: &mut ContactFacts) {
    let doc = Html::parse_document(html);

    if let Some(address) = main_studio_address(&doc) {
        tracing::debug!(address = %address, "main studio address found");
        facts.main_studio_address = Some(address);
        facts
            .detection_methods
            .insert(DetectionMethod::MainStudioAddress);
    }

    facts.carriage_election_contact = CARRIAGE_LABELS.iter().find_map(|label| {
        innermost_containing(&doc, label)
            .first()
            .map(|el| text_of(closest_block(*el, &SECTION_BLOCKS)))
            .filter(|text| !text.is_empty())
    });

    let section = SECTION_LABELS.iter().find_map(|(label, method)| {
        innermost_containing(&doc, label)
            .first()
            .map(|el| (closest_block(*el, &SECTION_BLOCKS), *method))
    });

    match section {
        Some((block, method)) => {
            tracing::debug!(%method, "scanning labelled regulator section");
            // A label row is often followed by the row holding its value.
            let scope: Vec<ElementRef<'_>> = std::iter::once(block)
                .chain(next_element_sibling(block))
                .collect();
            let text = scope
                .iter()
                .map(|el| text_of(*el))
                .collect::<Vec<_>>()
                .join(" ");
            let markup: String = scope.iter().map(|el| el.inner_html()).collect();
            facts.add_phones(method, station_phones(&text));
            facts.add_emails(method, find_emails(&format!("{text} {markup}")));
        }
        None => match body_text(&doc) {
            Ok(text) => {
                let method = DetectionMethod::GeneralPageScan;
                facts.add_phones(method, station_phones(&text));
                facts.add_emails(method, find_emails(&text));
            }
            Err(e) => tracing::warn!(error = %e, "regulator page scan failed"),
        },
    }

    match find_contact_links(&doc, base) {
        Ok(links) => facts.add_contact_links(DetectionMethod::ContactPageLinks, links),
        Err(e) => tracing::warn!(error = %e, "regulator contact link scan failed"),
    }
}

/// Phones in `text` other than the regulator's support lines.
fn station_phones(text: &str) -> Vec<String> {
    find_phones(text)
        .into_iter()
        .filter(|phone| {
            let main = phone.split(" ext. ").next().unwrap_or(phone);
            !SUPPORT_PHONES.iter().any(|s| s == main)
        })
        .collect()
}

/// Text of the block after the "Main Studio Address" label's block, or the
/// label block itself minus the label when nothing follows it.
fn main_studio_address(doc: &Html) -> Option<String> {
    let label = *innermost_containing(doc, MAIN_STUDIO_LABEL).first()?;
    let block = closest_block(label, &ADDRESS_BLOCKS);

    let address = next_element_sibling(block)
        .map(text_of)
        .filter(|text| !text.is_empty())
        .or_else(|| inline_value(block))?;
    Some(collapse_whitespace(&address))
}

fn inline_value(block: ElementRef<'_>) -> Option<String> {
    let text = text_of(block);
    let value = text.replacen(MAIN_STUDIO_LABEL, "", 1);
    let value = value.trim_start_matches([':', ' ']).trim();
    (!value.is_empty()).then(|| value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(html: &str) -> ContactFacts {
        let base = Url::parse("https://publicfiles.fcc.gov/tv-profile/wbrc").unwrap();
        let mut facts = ContactFacts::fetched(base.as_str());
        extract_regulator_contacts(html, &base, &mut facts);
        facts
    }

    #[test]
    fn main_studio_address_reads_following_row() {
        let facts = scan(
            r"<html><body><table>
                <tr><th>Main Studio Address</th></tr>
                <tr><td>1720 Valley View Dr, Birmingham, AL 35209 (205) 322-6666</td></tr>
              </table></body></html>",
        );
        assert_eq!(
            facts.main_studio_address.as_deref(),
            Some("1720 Valley View Dr, Birmingham, AL 35209 (205) 322-6666")
        );
        assert!(facts.detection_methods.contains(&DetectionMethod::MainStudioAddress));
        assert!(facts.phone_numbers.contains("(205) 322-6666"));
    }

    #[test]
    fn section_scan_reads_the_row_after_the_label_row() {
        let facts = scan(
            r#"<html><body><table>
                <tr><th>Main Studio Address</th></tr>
                <tr><td>1720 Valley View Dr, Birmingham, AL 35209 (205) 322-6666
                    <a href="mailto:PublicFile@WBRC.com">public file</a></td></tr>
                <tr><td>Questions? 877-480-3201</td></tr>
                <tr><td>Sales 205-999-0000</td></tr>
              </table></body></html>"#,
        );
        let phones: Vec<_> = facts.phone_numbers.iter().cloned().collect();
        assert_eq!(phones, vec!["(205) 322-6666"]);
        assert!(facts.email_addresses.contains("publicfile@wbrc.com"));
        assert!(facts.detection_methods.contains(&DetectionMethod::MainStudioSection));
        assert!(!facts.detection_methods.contains(&DetectionMethod::GeneralPageScan));
    }

    #[test]
    fn main_studio_address_falls_back_to_inline_value() {
        let facts = scan(
            r"<html><body><div>Main Studio Address: 1 Broadcast Plaza, Mobile, AL</div></body></html>",
        );
        assert_eq!(
            facts.main_studio_address.as_deref(),
            Some("1 Broadcast Plaza, Mobile, AL")
        );
    }

    #[test]
    fn carriage_section_scopes_extraction() {
        let facts = scan(
            r#"<html><body>
                <div class="help">Questions? Call 877-480-3201 or 205-000-1111</div>
                <div class="carriage">
                  <h3>Carriage Election Contact</h3>
                  <p>Jane Doe, (205) 583-4300, <a href="mailto:Jane.Doe@wbrc.com">email</a></p>
                </div>
              </body></html>"#,
        );
        let phones: Vec<_> = facts.phone_numbers.iter().cloned().collect();
        assert_eq!(phones, vec!["(205) 583-4300"]);
        assert!(facts.email_addresses.contains("jane.doe@wbrc.com"));
        assert!(facts
            .detection_methods
            .contains(&DetectionMethod::CarriageElectionSection));
        assert!(!facts.detection_methods.contains(&DetectionMethod::GeneralPageScan));
        assert!(facts
            .carriage_election_contact
            .as_deref()
            .is_some_and(|t| t.contains("Jane Doe")));
    }

    #[test]
    fn main_studio_section_takes_priority() {
        let facts = scan(
            r"<html><body>
                <div>Contact Information 205-111-2222</div>
                <div>Main Studio Address 1720 Valley View Dr 205-583-4300</div>
              </body></html>",
        );
        let phones: Vec<_> = facts.phone_numbers.iter().cloned().collect();
        assert_eq!(phones, vec!["(205) 583-4300"]);
        assert!(facts.detection_methods.contains(&DetectionMethod::MainStudioSection));
        assert!(!facts
            .detection_methods
            .contains(&DetectionMethod::ContactInformationSection));
    }

    #[test]
    fn general_scan_when_no_labelled_section() {
        let facts = scan(
            r"<html><body><p>WBRC 205-583-4300, help desk 877-480-3201, news@wbrc.com</p></body></html>",
        );
        let phones: Vec<_> = facts.phone_numbers.iter().cloned().collect();
        assert_eq!(phones, vec!["(205) 583-4300"]);
        assert!(facts.email_addresses.contains("news@wbrc.com"));
        assert!(facts.detection_methods.contains(&DetectionMethod::GeneralPageScan));
        assert!(facts.main_studio_address.is_none());
        assert!(facts.carriage_election_contact.is_none());
    }

    #[test]
    fn support_numbers_are_excluded_in_any_format() {
        let phones = station_phones("(866) 418-0232 / 888.225.5322 / 205-583-4300");
        assert_eq!(phones, vec!["(205) 583-4300"]);
    }

    #[test]
    fn regulator_stage_never_sets_official_website() {
        let facts = scan(
            r#"<html><body><a href="https://www.wbrc.com">Station website</a></body></html>"#,
        );
        assert!(facts.official_website.is_none());
    }
}
