//! Blocking Lodestone client.
//!
//! Wraps [`crate::client::Lodestone`] with a private current-thread runtime so
//! callers without an async runtime get plain blocking calls. Page fetches for
//! paginated listings still run concurrently inside each call.
//!
//! Like other blocking facades over async clients, this must not be used from
//! within an async runtime; use [`crate::client::Lodestone`] there.

use std::collections::BTreeMap;

use tokio::runtime::{Builder, Runtime};

use crate::client;
use crate::config::ScraperConfig;
use crate::error::Result;
use crate::http::{HttpClient, Transport};
use crate::model::{Achievement, Candidate, CharacterProfile, FreeCompanyProfile, NewsTopic};

pub struct Lodestone<T: Transport = HttpClient> {
    inner: client::Lodestone<T>,
    runtime: Runtime,
}

impl Lodestone<HttpClient> {
    pub fn new() -> Result<Self> {
        Self::with_config(ScraperConfig::default())
    }

    pub fn with_config(config: ScraperConfig) -> Result<Self> {
        let runtime = runtime()?;
        let inner = client::Lodestone::with_config(config)?;
        Ok(Self { inner, runtime })
    }
}

impl<T: Transport> Lodestone<T> {
    pub fn with_transport(transport: T, config: ScraperConfig) -> Result<Self> {
        Ok(Self {
            inner: client::Lodestone::with_transport(transport, config),
            runtime: runtime()?,
        })
    }

    pub fn config(&self) -> &ScraperConfig {
        self.inner.config()
    }

    pub fn scrape_topics(&self) -> Result<Vec<NewsTopic>> {
        self.runtime.block_on(self.inner.scrape_topics())
    }

    pub fn validate_character(&self, server: &str, name: &str) -> Result<Option<Candidate>> {
        self.runtime
            .block_on(self.inner.validate_character(server, name))
    }

    pub fn verify_character(
        &self,
        server: &str,
        name: &str,
        code: &str,
        lodestone_id: Option<&str>,
    ) -> Result<Option<String>> {
        self.runtime
            .block_on(self.inner.verify_character(server, name, code, lodestone_id))
    }

    pub fn scrape_character(&self, lodestone_id: &str) -> Result<CharacterProfile> {
        self.runtime.block_on(self.inner.scrape_character(lodestone_id))
    }

    pub fn scrape_achievements(&self, lodestone_id: &str) -> Result<BTreeMap<u32, Achievement>> {
        self.runtime
            .block_on(self.inner.scrape_achievements(lodestone_id))
    }

    pub fn scrape_free_company(&self, lodestone_id: &str) -> Result<FreeCompanyProfile> {
        self.runtime
            .block_on(self.inner.scrape_free_company(lodestone_id))
    }
}

fn runtime() -> Result<Runtime> {
    Ok(Builder::new_current_thread().enable_all().build()?)
}
