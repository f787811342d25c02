pub mod error;
pub mod extract;
pub mod fetch;
pub mod normalize;
mod retry;

pub use error::{ExtractError, FetchError};
pub use extract::{
    extract_contact_page, extract_regulator_contacts, extract_site_contacts,
    resolve_official_website, WebsiteMatch,
};
pub use fetch::{Document, FetchClient, FetchSettings};
pub use normalize::{normalize_email, normalize_phone};
