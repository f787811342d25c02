//! HTTP client for station documents: encyclopedia articles, station
//! websites, and regulator filings.

use std::time::Duration;

use reqwest::{redirect, Client};
use stationdb_core::{RetryOn, StageConfig};
use url::Url;

use crate::error::FetchError;
use crate::retry::retry_with_fixed_delay;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Redirect budget for the follow-up contact page fetch.
const CONTACT_PAGE_MAX_REDIRECTS: usize = 3;

/// Everything a [`FetchClient`] needs to know about one kind of fetch.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub max_redirects: usize,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub retry_on: RetryOn,
    /// Treat 3xx responses that were not followed as success.
    pub accept_redirect_status: bool,
    pub user_agent: String,
}

impl FetchSettings {
    /// Settings for a stage's primary document fetch.
    #[must_use]
    pub fn for_stage(cfg: &StageConfig, user_agent: &str) -> Self {
        Self {
            timeout: cfg.timeout(),
            max_redirects: cfg.max_redirects,
            max_retries: cfg.max_retries,
            retry_delay: cfg.retry_delay(),
            retry_on: cfg.retry_on,
            accept_redirect_status: cfg.accept_redirect_status,
            user_agent: user_agent.to_owned(),
        }
    }

    /// Settings for the single, unretried fetch of a discovered contact page.
    #[must_use]
    pub fn contact_page(cfg: &StageConfig, user_agent: &str) -> Self {
        Self {
            timeout: cfg.contact_page_timeout(),
            max_redirects: CONTACT_PAGE_MAX_REDIRECTS,
            max_retries: 0,
            retry_delay: Duration::ZERO,
            retry_on: cfg.retry_on,
            accept_redirect_status: true,
            user_agent: user_agent.to_owned(),
        }
    }
}

/// A fetched document.
#[derive(Debug, Clone)]
pub struct Document {
    /// URL after following redirects; relative links resolve against this.
    pub final_url: Url,
    pub status: u16,
    pub body: String,
    /// Attempts made, including the successful one.
    pub attempts: u32,
}

/// Single-GET client with a fixed timeout, browser-like headers, a bounded
/// redirect policy, and fixed-delay retries.
pub struct FetchClient {
    client: Client,
    settings: FetchSettings,
}

impl FetchClient {
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .connect_timeout(settings.timeout)
            .redirect(redirect::Policy::limited(settings.max_redirects))
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(Self { client, settings })
    }

    #[must_use]
    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// Fetches `url`, retrying per the configured policy.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidUrl`]: `url` is not an absolute http(s) URL (not retried).
    /// - [`FetchError::UnexpectedStatus`]: status outside the accepted range after retries.
    /// - [`FetchError::Http`]: transport failure after retries.
    pub async fn fetch(&self, url: &str) -> Result<Document, FetchError> {
        let parsed = parse_http_url(url)?;
        let settings = &self.settings;

        let (document, attempts) = retry_with_fixed_delay(
            settings.max_retries,
            settings.retry_delay,
            settings.retry_on,
            |attempt| {
                let parsed = parsed.clone();
                async move {
                    tracing::debug!(url = %parsed, attempt, "fetching document");
                    self.fetch_once(parsed).await
                }
            },
        )
        .await?;

        Ok(Document {
            attempts,
            ..document
        })
    }

    async fn fetch_once(&self, url: Url) -> Result<Document, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, ACCEPT_HTML)
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let status = response.status();
        let accepted = status.is_success()
            || (self.settings.accept_redirect_status && status.is_redirection());
        if !accepted {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let final_url = response.url().clone();
        let body = response.text().await?;

        Ok(Document {
            final_url,
            status: status.as_u16(),
            body,
            attempts: 1,
        })
    }
}

fn parse_http_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url.trim()).map_err(|e| FetchError::InvalidUrl {
        url: url.to_owned(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl {
            url: url.to_owned(),
            reason: format!("unsupported scheme \"{other}\""),
        }),
    }
}
