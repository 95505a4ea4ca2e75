//! Scraper configuration.
//!
//! Everything here is fixed once a [`crate::client::Lodestone`] is built; request
//! headers in particular are baked into the transport at construction.

use serde::Deserialize;

pub const DEFAULT_DOMAIN: &str = "na.finalfantasyxiv.com";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-us,en;q=0.5";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum concurrent page fetches during pagination
pub const DEFAULT_PAGE_WORKERS: usize = 5;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Host used when absolutising links (`//{domain}/...`).
    pub domain: String,
    /// Root that every Lodestone path is appended to.
    pub base_url: String,
    pub accept_language: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub page_workers: usize,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self::for_domain(DEFAULT_DOMAIN)
    }
}

impl ScraperConfig {
    pub fn for_domain(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            base_url: format!("http://{}/lodestone", domain),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            page_workers: DEFAULT_PAGE_WORKERS,
        }
    }

    /// Defaults overlaid with `LODESTONE_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = match std::env::var("LODESTONE_DOMAIN") {
            Ok(domain) if !domain.trim().is_empty() => Self::for_domain(domain.trim()),
            _ => Self::default(),
        };

        if let Ok(base) = std::env::var("LODESTONE_BASE_URL") {
            if !base.trim().is_empty() {
                config.base_url = base.trim().to_string();
            }
        }
        if let Ok(lang) = std::env::var("LODESTONE_ACCEPT_LANGUAGE") {
            config.accept_language = lang;
        }
        if let Ok(ua) = std::env::var("LODESTONE_USER_AGENT") {
            config.user_agent = ua;
        }
        if let Some(secs) = std::env::var("LODESTONE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.timeout_secs = secs;
        }
        if let Some(workers) = std::env::var("LODESTONE_PAGE_WORKERS")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
        {
            config.page_workers = workers;
        }

        config
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Page worker ceiling, never below one.
    pub fn workers(&self) -> usize {
        self.page_workers.max(1)
    }

    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
