use crate::app_config::{AppConfig, Stage, StageConfig};
use crate::ConfigError;

/// Desktop browser user agent; several station sites reject scripted clients.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric override cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric override cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every setting is optional; unset variables keep the stage defaults from
/// [`StageConfig::defaults`].
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let log_level = or_default("STATIONDB_LOG_LEVEL", "info");
    let user_agent = or_default("STATIONDB_USER_AGENT", DEFAULT_USER_AGENT);

    Ok(AppConfig {
        log_level,
        user_agent,
        resolve: build_stage_config(Stage::Resolve, &lookup)?,
        site: build_stage_config(Stage::Site, &lookup)?,
        regulator: build_stage_config(Stage::Regulator, &lookup)?,
    })
}

fn build_stage_config<F>(stage: Stage, lookup: &F) -> Result<StageConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let prefix = stage.env_prefix();
    let mut cfg = StageConfig::defaults(stage);

    let parse_u64 = |suffix: &str, current: u64| -> Result<u64, ConfigError> {
        let var = format!("STATIONDB_{prefix}_{suffix}");
        match lookup(&var) {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var,
                    reason: e.to_string(),
                }),
            Err(_) => Ok(current),
        }
    };

    cfg.delay_ms = parse_u64("DELAY_MS", cfg.delay_ms)?;
    cfg.timeout_ms = parse_u64("TIMEOUT_MS", cfg.timeout_ms)?;
    cfg.retry_delay_ms = parse_u64("RETRY_DELAY_MS", cfg.retry_delay_ms)?;
    cfg.contact_page_timeout_ms =
        parse_u64("CONTACT_PAGE_TIMEOUT_MS", cfg.contact_page_timeout_ms)?;

    let retries = parse_u64("MAX_RETRIES", u64::from(cfg.max_retries))?;
    cfg.max_retries = u32::try_from(retries).map_err(|e| ConfigError::InvalidEnvVar {
        var: format!("STATIONDB_{prefix}_MAX_RETRIES"),
        reason: e.to_string(),
    })?;

    if cfg.timeout_ms == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: format!("STATIONDB_{prefix}_TIMEOUT_MS"),
            reason: "timeout must be greater than zero".to_string(),
        });
    }

    Ok(cfg)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
