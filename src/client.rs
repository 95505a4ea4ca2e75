//! Lodestone client: the public scraping operations.
//!
//! Every operation fetches its page bodies through the [`Transport`], hands each
//! body to a synchronous assembler and returns a freshly built record. Nothing is
//! cached between calls.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};
use url::form_urlencoded;

use crate::assemble::{achievements, character, free_company, search, topics};
use crate::config::ScraperConfig;
use crate::error::{LodestoneError, Result};
use crate::http::{HttpClient, Transport};
use crate::model::{
    Achievement, Candidate, CharacterProfile, FreeCompanyProfile, NewsTopic, RosterMember,
};
use crate::paginate::{FailurePolicy, Pagination};

pub struct Lodestone<T: Transport = HttpClient> {
    transport: T,
    config: ScraperConfig,
}

impl Lodestone<HttpClient> {
    /// Client for the default region with the default request headers.
    pub fn new() -> Result<Self> {
        Self::with_config(ScraperConfig::default())
    }

    pub fn with_config(config: ScraperConfig) -> Result<Self> {
        let transport = HttpClient::with_config(&config)?;
        Ok(Self { transport, config })
    }
}

impl<T: Transport> Lodestone<T> {
    pub fn with_transport(transport: T, config: ScraperConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch a page an id depends on. Any failure means the id cannot be served.
    async fn fetch_primary(&self, url: &str, what: &str) -> Result<String> {
        self.transport.get(url).await.map_err(|e| {
            warn!(url = %url, error = %e, "primary document unavailable");
            match e {
                LodestoneError::DoesNotExist(_) => e,
                other => LodestoneError::DoesNotExist(format!("{}: {}", what, other)),
            }
        })
    }

    /// Latest news topics in listing order.
    pub async fn scrape_topics(&self) -> Result<Vec<NewsTopic>> {
        let url = self.config.url("topics/");
        let body = self.transport.get(&url).await?;
        let topics = topics::parse_topics(&body, &self.config.domain);
        info!(count = topics.len(), "scraped topics");
        Ok(topics)
    }

    /// Look a character up by world and exact (case-insensitive) name.
    ///
    /// No match is `Ok(None)`. A failed search request is also treated as no
    /// match.
    pub async fn validate_character(&self, server: &str, name: &str) -> Result<Option<Candidate>> {
        let url = self.config.url(&format!(
            "character/?q={}&worldname={}",
            form_urlencoded::byte_serialize(name.as_bytes()).collect::<String>(),
            form_urlencoded::byte_serialize(server.as_bytes()).collect::<String>(),
        ));

        let body = match self.transport.get(&url).await {
            Ok(body) => body,
            Err(e) => {
                warn!(server, name, error = %e, "character search failed");
                return Ok(None);
            }
        };

        let candidate = search::find_candidate(search::parse_candidates(&body), name);
        debug!(server, name, found = candidate.is_some(), "character search");
        Ok(candidate)
    }

    /// Fetch the profile page of `lodestone_id` and make sure it is that
    /// character's. Returns the page body.
    pub async fn resolve_and_validate(&self, lodestone_id: &str) -> Result<String> {
        let url = self.character_url(lodestone_id);
        let body = self
            .fetch_primary(&url, &format!("character {}", lodestone_id))
            .await?;
        character::confirm_identity(&body, lodestone_id)?;
        Ok(body)
    }

    /// Prove ownership of a character: its self-introduction must read `code`.
    ///
    /// Returns the character id on success and `Ok(None)` for any mismatch,
    /// including a blank code or a profile without a self-introduction. A
    /// name that cannot be resolved to an id is `DoesNotExist`.
    pub async fn verify_character(
        &self,
        server: &str,
        name: &str,
        code: &str,
        lodestone_id: Option<&str>,
    ) -> Result<Option<String>> {
        let code = code.trim();
        if code.is_empty() {
            info!(name = %name, server = %server, "blank verification code");
            return Ok(None);
        }

        let lodestone_id = match lodestone_id {
            Some(id) => id.to_string(),
            None => match self.validate_character(server, name).await? {
                Some(candidate) => candidate.lodestone_id,
                None => {
                    return Err(LodestoneError::DoesNotExist(format!(
                        "no character {} on {}",
                        name, server
                    )))
                }
            },
        };

        let body = match self.transport.get(&self.character_url(&lodestone_id)).await {
            Ok(body) => body,
            Err(e) => {
                warn!(lodestone_id = %lodestone_id, error = %e, "verification fetch failed");
                return Ok(None);
            }
        };

        let header = match character::parse_header(&body) {
            Ok(header) => header,
            Err(e) => {
                warn!(lodestone_id = %lodestone_id, error = %e, "verification page unreadable");
                return Ok(None);
            }
        };

        if header.name != name || header.server != server {
            info!(
                lodestone_id = %lodestone_id,
                page_name = %header.name,
                page_server = %header.server,
                "verification name mismatch"
            );
            return Ok(None);
        }

        let Some(introduction) = header.introduction else {
            info!(lodestone_id = %lodestone_id, "profile has no self-introduction");
            return Ok(None);
        };
        if introduction.trim() == code {
            info!(lodestone_id = %lodestone_id, "character verified");
            Ok(Some(lodestone_id))
        } else {
            info!(lodestone_id = %lodestone_id, "verification code mismatch");
            Ok(None)
        }
    }

    /// Full character profile, achievements included.
    pub async fn scrape_character(&self, lodestone_id: &str) -> Result<CharacterProfile> {
        let body = self.resolve_and_validate(lodestone_id).await?;
        let mut profile = character::parse_character(&body, lodestone_id)?;
        profile.achievements = self.scrape_achievements(lodestone_id).await?;

        info!(
            lodestone_id = %lodestone_id,
            achievements = profile.achievements.len(),
            "scraped character"
        );
        Ok(profile)
    }

    /// Earned achievements keyed by id. Best-effort: unreachable pages
    /// contribute nothing.
    pub async fn scrape_achievements(&self, lodestone_id: &str) -> Result<BTreeMap<u32, Achievement>> {
        let url = self.config.url(&format!(
            "character/{}/achievement/kind/13/?filter=2",
            lodestone_id
        ));

        let first = match self.transport.get(&url).await {
            Ok(body) => body,
            Err(e) => {
                warn!(lodestone_id = %lodestone_id, error = %e, "achievements unavailable");
                return Ok(BTreeMap::new());
            }
        };

        let entries = Pagination::new(self.config.workers(), FailurePolicy::Degrade)
            .aggregate(
                &self.transport,
                &first,
                |page| format!("{}&page={}", url, page),
                achievements::parse_achievement_page,
                |a: &Achievement| a.id,
            )
            .await?;

        Ok(entries.into_iter().map(|a| (a.id, a)).collect())
    }

    /// Free company profile with its complete roster.
    ///
    /// Unlike achievements, every roster page must load: a failed page fails the
    /// whole call.
    pub async fn scrape_free_company(&self, lodestone_id: &str) -> Result<FreeCompanyProfile> {
        let what = format!("free company {}", lodestone_id);

        let profile_url = self.config.url(&format!("freecompany/{}/", lodestone_id));
        let body = self.fetch_primary(&profile_url, &what).await?;
        let details = free_company::parse_company_page(&body, lodestone_id)?;

        let member_url = self.config.url(&format!("freecompany/{}/member/", lodestone_id));
        let first = self.fetch_primary(&member_url, &what).await?;
        let header = free_company::parse_roster_header(&first, lodestone_id)?;

        let roster = Pagination::new(self.config.workers(), FailurePolicy::Fatal)
            .aggregate(
                &self.transport,
                &first,
                |page| format!("{}?page={}", member_url, page),
                free_company::parse_roster_page,
                |m: &RosterMember| m.lodestone_id.clone(),
            )
            .await?;

        info!(
            lodestone_id = %lodestone_id,
            members = roster.len(),
            "scraped free company"
        );
        Ok(free_company::assemble(lodestone_id, header, details, roster))
    }

    fn character_url(&self, lodestone_id: &str) -> String {
        self.config.url(&format!("character/{}/", lodestone_id))
    }
}
