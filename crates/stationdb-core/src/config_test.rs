use std::collections::HashMap;
use std::env::VarError;

use super::*;
use crate::app_config::RetryOn;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_uses_stage_defaults_when_env_is_empty() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();

    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);

    assert_eq!(cfg.resolve.delay_ms, 1_500);
    assert_eq!(cfg.resolve.timeout_ms, 20_000);
    assert_eq!(cfg.resolve.max_retries, 2);
    assert_eq!(cfg.resolve.retry_on, RetryOn::AnyFailure);

    assert_eq!(cfg.site.delay_ms, 2_500);
    assert_eq!(cfg.site.timeout_ms, 25_000);
    assert_eq!(cfg.site.contact_page_timeout_ms, 15_000);
    assert!(cfg.site.accept_redirect_status);

    assert_eq!(cfg.regulator.delay_ms, 2_000);
    assert_eq!(cfg.regulator.timeout_ms, 30_000);
    assert_eq!(cfg.regulator.max_retries, 3);
    assert_eq!(cfg.regulator.retry_on, RetryOn::TransportErrors);
}

#[test]
fn every_stage_checkpoints_every_ten_records() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    for stage in Stage::ALL {
        assert_eq!(cfg.stage(stage).checkpoint_every, 10, "stage {stage}");
    }
}

#[test]
fn stage_override_only_touches_that_stage() {
    let mut map = HashMap::new();
    map.insert("STATIONDB_SITE_DELAY_MS", "100");
    map.insert("STATIONDB_SITE_CONTACT_PAGE_TIMEOUT_MS", "5000");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();

    assert_eq!(cfg.site.delay_ms, 100);
    assert_eq!(cfg.site.contact_page_timeout_ms, 5_000);
    assert_eq!(cfg.resolve.delay_ms, 1_500);
    assert_eq!(cfg.regulator.delay_ms, 2_000);
}

#[test]
fn regulator_stage_reads_fcc_prefix() {
    let mut map = HashMap::new();
    map.insert("STATIONDB_FCC_MAX_RETRIES", "5");
    map.insert("STATIONDB_FCC_RETRY_DELAY_MS", "250");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();

    assert_eq!(cfg.regulator.max_retries, 5);
    assert_eq!(cfg.regulator.retry_delay_ms, 250);
}

#[test]
fn invalid_number_names_the_variable() {
    let mut map = HashMap::new();
    map.insert("STATIONDB_RESOLVE_TIMEOUT_MS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STATIONDB_RESOLVE_TIMEOUT_MS"),
        "expected InvalidEnvVar(STATIONDB_RESOLVE_TIMEOUT_MS), got: {result:?}"
    );
}

#[test]
fn zero_timeout_is_rejected() {
    let mut map = HashMap::new();
    map.insert("STATIONDB_SITE_TIMEOUT_MS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STATIONDB_SITE_TIMEOUT_MS"),
        "expected InvalidEnvVar(STATIONDB_SITE_TIMEOUT_MS), got: {result:?}"
    );
}

#[test]
fn retries_beyond_u32_are_rejected() {
    let mut map = HashMap::new();
    map.insert("STATIONDB_FCC_MAX_RETRIES", "99999999999");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(
        result,
        Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STATIONDB_FCC_MAX_RETRIES"
    ));
}

#[test]
fn log_level_and_user_agent_overrides() {
    let mut map = HashMap::new();
    map.insert("STATIONDB_LOG_LEVEL", "debug");
    map.insert("STATIONDB_USER_AGENT", "stationdb-test/0.1");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.user_agent, "stationdb-test/0.1");
}

#[test]
fn required_fields_per_stage() {
    assert_eq!(
        Stage::Resolve.required_fields(),
        &["wikipediaURL", "state", "city"]
    );
    assert!(Stage::Site.required_fields().contains(&"officialWebsite"));
    assert!(Stage::Regulator.required_fields().contains(&"fccURL"));
}
