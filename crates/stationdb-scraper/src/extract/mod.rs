//! Ordered extraction strategies over fetched documents.
//!
//! Every entry point takes the raw markup and parses it synchronously, so
//! the parsed DOM never lives across an await point.

mod dom;
pub mod emails;
pub mod links;
pub mod phones;
pub mod regulator;
pub mod site;
pub mod website;

pub use emails::find_emails;
pub use links::{find_contact_links, is_social_url};
pub use phones::find_phones;
pub use regulator::extract_regulator_contacts;
pub use site::{extract_contact_page, extract_site_contacts};
pub use website::{clean_url, is_false_positive, resolve_official_website, WebsiteMatch};
