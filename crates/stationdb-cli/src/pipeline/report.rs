//! Derived report files and end-of-pass summary statistics.
//!
//! Reports are convenience exports next to the main output: a CSV with the
//! primary fields of every record and a JSON subset (found / not found for
//! the resolver, records with at least one contact fact for the contact
//! stages). Every CSV cell is quoted and multi-valued cells are joined with
//! `"; "`.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, WriterBuilder};
use stationdb_core::{EnhancedRecord, ResolutionStatus, Stage};

use super::checkpoint::write_json;

const MULTI_VALUE_SEPARATOR: &str = "; ";

const RESOLVE_HEADERS: [&str; 6] = [
    "Wikipedia URL",
    "State",
    "City",
    "Official Website",
    "Status",
    "Error",
];

const SITE_HEADERS: [&str; 8] = [
    "Wikipedia URL",
    "State",
    "City",
    "Official Website",
    "Phone Numbers",
    "Email Addresses",
    "Contact Pages",
    "Status",
];

const REGULATOR_HEADERS: [&str; 9] = [
    "Call Sign",
    "State",
    "City",
    "FCC URL",
    "Phone Numbers",
    "Email Addresses",
    "Contact Pages",
    "Main Studio Address",
    "Status",
];

/// `<dir>/<stem><suffix>.<ext>` for an output path `<dir>/<stem>.json`.
fn sibling_path(output: &Path, suffix: &str, ext: &str) -> PathBuf {
    let stem = output
        .file_stem()
        .map_or_else(|| "output".into(), |s| s.to_string_lossy());
    output.with_file_name(format!("{stem}{suffix}.{ext}"))
}

/// Write the stage's CSV and filtered JSON reports. Returns the paths written.
///
/// # Errors
///
/// Returns the first I/O error; reports written before it are left in place.
pub(crate) fn write_reports(
    stage: Stage,
    output: &Path,
    records: &[EnhancedRecord],
) -> io::Result<Vec<PathBuf>> {
    let csv_path = sibling_path(output, "", "csv");
    write_csv(File::create(&csv_path)?, stage, records)?;
    let mut written = vec![csv_path];

    match stage {
        Stage::Resolve => {
            let (found, not_found): (Vec<&EnhancedRecord>, Vec<&EnhancedRecord>) = records
                .iter()
                .partition(|r| r.status == Some(ResolutionStatus::Found));
            let found_path = sibling_path(output, "_found", "json");
            write_json(&found_path, &found)?;
            let not_found_path = sibling_path(output, "_not_found", "json");
            write_json(&not_found_path, &not_found)?;
            written.extend([found_path, not_found_path]);
        }
        Stage::Site | Stage::Regulator => {
            let with_contact: Vec<&EnhancedRecord> = records
                .iter()
                .filter(|r| r.facts_for(stage).is_some_and(|f| f.has_any()))
                .collect();
            let path = sibling_path(output, "_with_contact", "json");
            write_json(&path, &with_contact)?;
            written.push(path);
        }
    }
    Ok(written)
}

fn write_csv<W: io::Write>(
    writer: W,
    stage: Stage,
    records: &[EnhancedRecord],
) -> csv::Result<()> {
    let headers: &[&str] = match stage {
        Stage::Resolve => &RESOLVE_HEADERS,
        Stage::Site => &SITE_HEADERS,
        Stage::Regulator => &REGULATOR_HEADERS,
    };
    let mut csv_writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(writer);
    csv_writer.write_record(headers)?;
    for record in records {
        csv_writer.write_record(csv_row(stage, record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn csv_row(stage: Stage, record: &EnhancedRecord) -> Vec<String> {
    let station = &record.station;
    let text = |value: Option<&str>| value.unwrap_or_default().to_owned();

    match stage {
        Stage::Resolve => vec![
            text(station.wikipedia_url.as_deref()),
            text(station.state.as_deref()),
            text(station.city.as_deref()),
            text(record.website()),
            record.status.as_ref().map(ResolutionStatus::to_string).unwrap_or_default(),
            text(record.error.as_deref()),
        ],
        Stage::Site | Stage::Regulator => {
            let facts = record.facts_for(stage);
            let phones = facts.map(|f| join(&f.phone_numbers)).unwrap_or_default();
            let emails = facts.map(|f| join(&f.email_addresses)).unwrap_or_default();
            let links = facts.map(|f| join(&f.contact_page_links)).unwrap_or_default();
            let status = match facts {
                Some(f) if f.success => "success",
                Some(_) => "failed",
                None => "",
            }
            .to_owned();

            if stage == Stage::Site {
                vec![
                    text(station.wikipedia_url.as_deref()),
                    text(station.state.as_deref()),
                    text(station.city.as_deref()),
                    text(record.website()),
                    phones,
                    emails,
                    links,
                    status,
                ]
            } else {
                vec![
                    station.call_sign().unwrap_or_default(),
                    text(station.state.as_deref()),
                    text(station.city.as_deref()),
                    text(station.fcc_url.as_deref()),
                    phones,
                    emails,
                    links,
                    text(facts.and_then(|f| f.main_studio_address.as_deref())),
                    status,
                ]
            }
        }
    }
}

fn join(values: &BTreeSet<String>) -> String {
    values
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(MULTI_VALUE_SEPARATOR)
}

// ---------------------------------------------------------------------------
// summary statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ResolveStats {
    pub total: usize,
    pub found: usize,
    pub not_found: usize,
    pub errors: usize,
    /// `(state, found, total)`, most found first.
    pub by_state: Vec<(String, usize, usize)>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ContactStats {
    pub total: usize,
    pub successful: usize,
    pub with_phones: usize,
    pub with_emails: usize,
    pub with_contact_pages: usize,
    pub with_any: usize,
    pub phones: usize,
    pub emails: usize,
    pub contact_pages: usize,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum StageStats {
    Resolve(ResolveStats),
    Contacts(ContactStats),
}

impl StageStats {
    pub(crate) fn compute(stage: Stage, records: &[EnhancedRecord]) -> Self {
        match stage {
            Stage::Resolve => Self::Resolve(resolve_stats(records)),
            Stage::Site | Stage::Regulator => Self::Contacts(contact_stats(stage, records)),
        }
    }

    pub(crate) fn log(&self, stage: Stage) {
        match self {
            Self::Resolve(s) => {
                let found_pct = format!("{:.1}", percent(s.found, s.total));
                tracing::info!(
                    %stage,
                    total = s.total,
                    found = s.found,
                    not_found = s.not_found,
                    errors = s.errors,
                    found_pct = %found_pct,
                    "official website resolution summary"
                );
                for (state, found, total) in &s.by_state {
                    let found_pct = format!("{:.1}", percent(*found, *total));
                    tracing::info!(
                        %stage,
                        state = %state,
                        found,
                        total,
                        found_pct = %found_pct,
                        "websites found by state"
                    );
                }
            }
            Self::Contacts(s) => {
                let with_any_pct = format!("{:.1}", percent(s.with_any, s.total));
                tracing::info!(
                    %stage,
                    total = s.total,
                    successful = s.successful,
                    with_phones = s.with_phones,
                    with_emails = s.with_emails,
                    with_contact_pages = s.with_contact_pages,
                    with_any = s.with_any,
                    with_any_pct = %with_any_pct,
                    "contact extraction summary"
                );
                let avg_phones = format!("{:.1}", ratio(s.phones, s.successful));
                let avg_emails = format!("{:.1}", ratio(s.emails, s.successful));
                tracing::info!(
                    %stage,
                    phones = s.phones,
                    emails = s.emails,
                    contact_pages = s.contact_pages,
                    avg_phones = %avg_phones,
                    avg_emails = %avg_emails,
                    "contact facts found"
                );
            }
        }
    }
}

fn resolve_stats(records: &[EnhancedRecord]) -> ResolveStats {
    let mut stats = ResolveStats {
        total: records.len(),
        ..ResolveStats::default()
    };
    let mut states: BTreeMap<&str, (usize, usize)> = BTreeMap::new();

    for record in records {
        let found = record.status == Some(ResolutionStatus::Found);
        match &record.status {
            Some(ResolutionStatus::Found) => stats.found += 1,
            Some(ResolutionStatus::Error) => stats.errors += 1,
            _ => stats.not_found += 1,
        }
        let entry = states
            .entry(record.station.state.as_deref().unwrap_or("Unknown"))
            .or_default();
        entry.1 += 1;
        if found {
            entry.0 += 1;
        }
    }

    stats.by_state = states
        .into_iter()
        .map(|(state, (found, total))| (state.to_owned(), found, total))
        .collect();
    // Stable sort keeps states alphabetical within equal counts.
    stats.by_state.sort_by(|a, b| b.1.cmp(&a.1));
    stats
}

fn contact_stats(stage: Stage, records: &[EnhancedRecord]) -> ContactStats {
    let mut stats = ContactStats {
        total: records.len(),
        ..ContactStats::default()
    };
    for facts in records.iter().filter_map(|r| r.facts_for(stage)) {
        if facts.success {
            stats.successful += 1;
        }
        stats.with_phones += usize::from(!facts.phone_numbers.is_empty());
        stats.with_emails += usize::from(!facts.email_addresses.is_empty());
        stats.with_contact_pages += usize::from(!facts.contact_page_links.is_empty());
        stats.with_any += usize::from(facts.has_any());
        stats.phones += facts.phone_numbers.len();
        stats.emails += facts.email_addresses.len();
        stats.contact_pages += facts.contact_page_links.len();
    }
    stats
}

#[allow(clippy::cast_precision_loss)]
fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    ratio(part, whole) * 100.0
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
