use std::path::{Path, PathBuf};
use std::time::Duration;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use stationdb_core::{ContactFacts, RetryOn, Stage, StationRecord};
use stationdb_scraper::{FetchClient, FetchSettings};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::stages::SiteProcessor;

/// Regulator-shaped processor that never touches the network. Each call
/// records how many records the checkpoint held at that moment.
struct FakeProcessor {
    calls: AtomicUsize,
    checkpoint_sizes: Mutex<Vec<Option<usize>>>,
    checkpoint: PathBuf,
    fail_call_signs: Vec<&'static str>,
}

impl FakeProcessor {
    fn new(output: &Path) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            checkpoint_sizes: Mutex::new(Vec::new()),
            checkpoint: CheckpointStore::for_output(output).path().to_path_buf(),
            fail_call_signs: Vec::new(),
        }
    }
}

impl RecordProcessor for FakeProcessor {
    fn stage(&self) -> Stage {
        Stage::Regulator
    }

    fn is_eligible(&self, record: &EnhancedRecord) -> bool {
        record.station.fcc_url.is_some()
    }

    async fn process(&self, mut record: EnhancedRecord) -> EnhancedRecord {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let saved = std::fs::read_to_string(&self.checkpoint)
            .ok()
            .and_then(|s| serde_json::from_str::<Vec<serde_json::Value>>(&s).ok())
            .map(|v| v.len());
        self.checkpoint_sizes.lock().unwrap().push(saved);

        let call_sign = record.station.call_sign().unwrap_or_default();
        record.fcc_contact_info = Some(if self.fail_call_signs.iter().any(|c| *c == call_sign) {
            ContactFacts::failed("connection reset")
        } else {
            ContactFacts::fetched(record.station.fcc_url.clone().unwrap_or_default())
        });
        record
    }
}

fn station(i: usize) -> StationRecord {
    StationRecord {
        call_sign: Some(format!("K{i:03}")),
        state: Some("Texas".to_string()),
        city: Some("Austin".to_string()),
        wikipedia_url: None,
        fcc_url: Some(format!("https://publicfiles.fcc.gov/tv-profile/k{i:03}")),
    }
}

fn write_input(dir: &Path, stations: &[StationRecord]) -> PathBuf {
    let path = dir.join("input.json");
    std::fs::write(&path, serde_json::to_string(stations).unwrap()).unwrap();
    path
}

fn options(dir: &Path, count: usize) -> PassOptions {
    let stations: Vec<_> = (0..count).map(station).collect();
    PassOptions {
        input: write_input(dir, &stations),
        output: dir.join("fcc_contacts.json"),
        resume_from: None,
        limit: None,
    }
}

fn config() -> StageConfig {
    StageConfig {
        delay_ms: 0,
        ..StageConfig::defaults(Stage::Regulator)
    }
}

fn call_signs(records: &[EnhancedRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.station.call_sign().unwrap_or_default())
        .collect()
}

// ---------------------------------------------------------------------------
// checkpoint cadence and ordering
// ---------------------------------------------------------------------------

#[tokio::test]
async fn twenty_five_records_checkpoint_twice_and_keep_order() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(dir.path(), 25);
    let processor = FakeProcessor::new(&opts.output);

    let summary = run_pass(&processor, &config(), &opts).await.expect("pass succeeds");

    assert_eq!(summary.checkpoint_writes, 2);
    assert_eq!(summary.processed, 25);
    assert_eq!(summary.failed, 0);
    assert_eq!(
        call_signs(&summary.records),
        (0..25).map(|i| format!("K{i:03}")).collect::<Vec<_>>()
    );

    let sizes = processor.checkpoint_sizes.lock().unwrap().clone();
    assert_eq!(sizes[9], None, "no checkpoint before the tenth record");
    assert_eq!(sizes[10], Some(10));
    assert_eq!(sizes[20], Some(20));

    let written: Vec<EnhancedRecord> =
        serde_json::from_str(&std::fs::read_to_string(&opts.output).unwrap()).unwrap();
    assert_eq!(call_signs(&written), call_signs(&summary.records));
    assert!(
        !CheckpointStore::for_output(&opts.output).path().exists(),
        "checkpoint removed after final write"
    );
}

#[tokio::test]
async fn failed_record_does_not_stop_the_pass() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(dir.path(), 4);
    let mut processor = FakeProcessor::new(&opts.output);
    processor.fail_call_signs = vec!["K001"];

    let summary = run_pass(&processor, &config(), &opts).await.unwrap();

    assert_eq!(summary.processed, 4);
    assert_eq!(summary.failed, 1);
    let failed = summary.records[1].fcc_contact_info.as_ref().unwrap();
    assert!(!failed.success);
    assert_eq!(failed.error.as_deref(), Some("connection reset"));
}

#[tokio::test(start_paused = true)]
async fn delay_follows_every_record_but_the_last() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(dir.path(), 3);
    let mut processor = FakeProcessor::new(&opts.output);
    processor.fail_call_signs = vec!["K001"];
    let cfg = StageConfig {
        delay_ms: 250,
        ..StageConfig::defaults(Stage::Regulator)
    };

    let started = tokio::time::Instant::now();
    let summary = run_pass(&processor, &cfg, &opts).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(summary.failed, 1);
    assert!(
        elapsed >= Duration::from_millis(500) && elapsed < Duration::from_millis(510),
        "two delays expected, slept {elapsed:?}"
    );
}

#[tokio::test]
async fn ineligible_records_are_skipped_and_limit_applies() {
    let dir = tempfile::tempdir().unwrap();
    let mut stations: Vec<_> = (0..6).map(station).collect();
    stations[2].fcc_url = None;
    let opts = PassOptions {
        input: write_input(dir.path(), &stations),
        output: dir.path().join("out.json"),
        resume_from: None,
        limit: Some(3),
    };
    let processor = FakeProcessor::new(&opts.output);

    let summary = run_pass(&processor, &config(), &opts).await.unwrap();

    assert_eq!(summary.skipped, 1);
    assert_eq!(call_signs(&summary.records), vec!["K000", "K001", "K003"]);
    assert_eq!(processor.calls.load(Ordering::SeqCst), 3);
}

// ---------------------------------------------------------------------------
// resume
// ---------------------------------------------------------------------------

#[tokio::test]
async fn resume_processes_only_remaining_records() {
    let dir = tempfile::tempdir().unwrap();
    let mut opts = options(dir.path(), 25);
    opts.resume_from = Some("k012".to_string());

    // Three checkpointed records sit at or after the cursor and are redone.
    let prior: Vec<EnhancedRecord> = (0..15)
        .map(|i| {
            let mut record = EnhancedRecord::new(station(i));
            record
                .extra
                .insert("checkpointed".to_string(), serde_json::Value::Bool(true));
            record
        })
        .collect();
    CheckpointStore::for_output(&opts.output).save(&prior).unwrap();

    let processor = FakeProcessor::new(&opts.output);
    let summary = run_pass(&processor, &config(), &opts).await.unwrap();

    assert_eq!(processor.calls.load(Ordering::SeqCst), 13);
    assert_eq!(summary.resumed, 12);
    assert_eq!(summary.records.len(), 25);
    assert_eq!(
        call_signs(&summary.records),
        (0..25).map(|i| format!("K{i:03}")).collect::<Vec<_>>()
    );
    assert_eq!(&summary.records[..12], &prior[..12]);
    assert!(summary.records[12..]
        .iter()
        .all(|r| r.fcc_contact_info.is_some() && r.extra.is_empty()));
}

#[tokio::test]
async fn resume_without_checkpoint_carries_earlier_records_over() {
    let dir = tempfile::tempdir().unwrap();
    let mut opts = options(dir.path(), 5);
    opts.resume_from = Some("K003".to_string());
    let processor = FakeProcessor::new(&opts.output);

    let summary = run_pass(&processor, &config(), &opts).await.unwrap();

    assert_eq!(processor.calls.load(Ordering::SeqCst), 2);
    assert_eq!(summary.records.len(), 5);
    assert!(summary.records[..3].iter().all(|r| r.fcc_contact_info.is_none()));
}

#[tokio::test]
async fn unknown_resume_station_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut opts = options(dir.path(), 3);
    opts.resume_from = Some("WXYZ".to_string());
    let processor = FakeProcessor::new(&opts.output);

    let err = run_pass(&processor, &config(), &opts).await.unwrap_err();

    assert!(matches!(err, PipelineError::ResumeCursorNotFound { .. }));
    assert_eq!(processor.calls.load(Ordering::SeqCst), 0);
}

// ---------------------------------------------------------------------------
// fatal outcomes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validation_failure_processes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut stations = vec![station(0), station(1)];
    stations[0].call_sign = None;
    let opts = PassOptions {
        input: write_input(dir.path(), &stations),
        output: dir.path().join("out.json"),
        resume_from: None,
        limit: None,
    };
    let processor = FakeProcessor::new(&opts.output);

    let err = run_pass(&processor, &config(), &opts).await.unwrap_err();

    assert!(matches!(err, PipelineError::MissingField { field: "callSign", .. }));
    assert_eq!(processor.calls.load(Ordering::SeqCst), 0);
    assert!(!opts.output.exists());
}

#[tokio::test]
async fn final_write_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut opts = options(dir.path(), 2);
    opts.output = dir.path().join("missing-dir").join("out.json");
    let processor = FakeProcessor::new(&opts.output);

    let err = run_pass(&processor, &config(), &opts).await.unwrap_err();

    assert!(matches!(err, PipelineError::OutputWrite { .. }));
    assert_eq!(processor.calls.load(Ordering::SeqCst), 2);
}

// ---------------------------------------------------------------------------
// stage chaining
// ---------------------------------------------------------------------------

fn site_processor() -> SiteProcessor {
    let client = || {
        FetchClient::new(FetchSettings {
            timeout: Duration::from_secs(5),
            max_redirects: 5,
            max_retries: 0,
            retry_delay: Duration::ZERO,
            retry_on: RetryOn::AnyFailure,
            accept_redirect_status: false,
            user_agent: "stationdb-test/0.1".to_owned(),
        })
        .unwrap()
    };
    SiteProcessor::new(client(), client(), Duration::ZERO)
}

#[tokio::test]
async fn site_stage_reads_resolver_output_led_by_a_miss() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><p>Newsroom 205-583-4300</p></body></html>"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("websites.json");
    let resolved = serde_json::json!([
        {
            "wikipediaURL": "https://en.wikipedia.org/wiki/WXYZ",
            "state": "Alabama",
            "city": "Mobile",
            "officialWebsite": null,
            "status": "not_found"
        },
        {
            "wikipediaURL": "https://en.wikipedia.org/wiki/WBRC",
            "state": "Alabama",
            "city": "Birmingham",
            "officialWebsite": format!("{}/", server.uri()),
            "status": "found"
        }
    ]);
    std::fs::write(&input, resolved.to_string()).unwrap();
    let opts = PassOptions {
        input,
        output: dir.path().join("contacts.json"),
        resume_from: None,
        limit: None,
    };

    let summary = run_pass(&site_processor(), &config(), &opts)
        .await
        .expect("resolver output is valid site input");

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.processed, 1);
    assert_eq!(call_signs(&summary.records), vec!["WBRC"]);
    let facts = summary.records[0].contact_details.as_ref().unwrap();
    assert!(facts.phone_numbers.contains("(205) 583-4300"));
}
