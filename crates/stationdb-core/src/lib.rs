pub mod app_config;
pub mod config;
pub mod contact;
pub mod seed;
pub mod station;

pub use app_config::{AppConfig, RetryOn, Stage, StageConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use contact::{ContactFacts, DetectionMethod};
pub use seed::{load_station_directory, SeedStation, StationDirectory};
pub use station::{call_sign_from_wikipedia_url, EnhancedRecord, ResolutionStatus, StationRecord};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read station directory {path}: {source}")]
    StationDirectoryIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse station directory: {0}")]
    StationDirectoryParse(#[from] serde_yaml::Error),

    #[error("station directory validation failed: {0}")]
    Validation(String),
}
