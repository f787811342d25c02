use std::time::Duration;

/// One pass of fetch + extract over a specific document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Encyclopedia article → official website.
    Resolve,
    /// Station website → contact facts.
    Site,
    /// Regulator filing → contact facts.
    Regulator,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Resolve, Stage::Site, Stage::Regulator];

    /// Segment used in `STATIONDB_<PREFIX>_*` environment variables.
    #[must_use]
    pub fn env_prefix(self) -> &'static str {
        match self {
            Stage::Resolve => "RESOLVE",
            Stage::Site => "SITE",
            Stage::Regulator => "FCC",
        }
    }

    /// Input fields the first record must carry before a pass may start.
    #[must_use]
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            Stage::Resolve => &["wikipediaURL", "state", "city"],
            Stage::Site => &["wikipediaURL", "state", "city", "officialWebsite", "status"],
            Stage::Regulator => &["fccURL", "callSign"],
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Resolve => write!(f, "resolve"),
            Stage::Site => write!(f, "site"),
            Stage::Regulator => write!(f, "regulator"),
        }
    }
}

/// Which failures a stage's fetch client retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOn {
    /// Timeouts, refused or reset connections only.
    TransportErrors,
    /// Every failure, including HTTP error statuses.
    AnyFailure,
}

/// Politeness, timeout, and retry settings for one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageConfig {
    /// Wait after each record except the last.
    pub delay_ms: u64,
    /// Per-attempt request timeout.
    pub timeout_ms: u64,
    /// Additional attempts after the first failure.
    pub max_retries: u32,
    /// Fixed wait before every retry.
    pub retry_delay_ms: u64,
    /// Timeout for the follow-up contact page fetch (site stage).
    pub contact_page_timeout_ms: u64,
    pub max_redirects: usize,
    pub retry_on: RetryOn,
    /// Treat 3xx responses as success.
    pub accept_redirect_status: bool,
    /// Persist a checkpoint after every N processed records.
    pub checkpoint_every: usize,
}

impl StageConfig {
    #[must_use]
    pub fn defaults(stage: Stage) -> Self {
        match stage {
            Stage::Resolve => Self {
                delay_ms: 1_500,
                timeout_ms: 20_000,
                max_retries: 2,
                retry_delay_ms: 3_000,
                contact_page_timeout_ms: 15_000,
                max_redirects: 5,
                retry_on: RetryOn::AnyFailure,
                accept_redirect_status: false,
                checkpoint_every: 10,
            },
            Stage::Site => Self {
                delay_ms: 2_500,
                timeout_ms: 25_000,
                max_retries: 2,
                retry_delay_ms: 3_000,
                contact_page_timeout_ms: 15_000,
                max_redirects: 5,
                retry_on: RetryOn::AnyFailure,
                accept_redirect_status: true,
                checkpoint_every: 10,
            },
            Stage::Regulator => Self {
                delay_ms: 2_000,
                timeout_ms: 30_000,
                max_retries: 3,
                retry_delay_ms: 2_000,
                contact_page_timeout_ms: 15_000,
                max_redirects: 5,
                retry_on: RetryOn::TransportErrors,
                accept_redirect_status: false,
                checkpoint_every: 10,
            },
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    #[must_use]
    pub fn contact_page_timeout(&self) -> Duration {
        Duration::from_millis(self.contact_page_timeout_ms)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub user_agent: String,
    pub resolve: StageConfig,
    pub site: StageConfig,
    pub regulator: StageConfig,
}

impl AppConfig {
    #[must_use]
    pub fn stage(&self, stage: Stage) -> &StageConfig {
        match stage {
            Stage::Resolve => &self.resolve,
            Stage::Site => &self.site,
            Stage::Regulator => &self.regulator,
        }
    }
}
