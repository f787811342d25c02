//! Record processors: one per stage, each applying the fetch client and
//! that stage's extractor to a single record.

mod regulator;
mod resolve;
mod site;

pub(crate) use regulator::RegulatorProcessor;
pub(crate) use resolve::ResolveProcessor;
pub(crate) use site::SiteProcessor;

use stationdb_core::{EnhancedRecord, Stage};

/// Enriches one record for one stage.
///
/// `process` never fails: a fetch that exhausts its retries is recorded on
/// the returned record as unsuccessful facts with the error message.
pub(crate) trait RecordProcessor {
    fn stage(&self) -> Stage;

    /// Whether the record carries what this stage needs to run.
    fn is_eligible(&self, record: &EnhancedRecord) -> bool;

    async fn process(&self, record: EnhancedRecord) -> EnhancedRecord;
}

/// A non-blank URL field.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
