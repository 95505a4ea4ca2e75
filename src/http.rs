use async_trait::async_trait;
use regex::Regex;
use std::time::Duration;
use strum::VariantArray;
use tracing::debug;
use wreq::{
    header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT},
    Client,
};
use wreq_util::{Emulation, EmulationOS, EmulationOption};

use crate::config::ScraperConfig;
use crate::error::{LodestoneError, Result};

/// Transport collaborator: one GET, body or failure.
///
/// Implementations must report non-success statuses and empty bodies as `Err`
/// so callers can short-circuit before attempting extraction.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<String>;
}

pub struct HttpClient {
    client: Client,
}

/// Extract version number from Emulation variant name (e.g., "Chrome131" -> Some(("Chrome", 131)))
fn parse_emulation_variant(emulation: Emulation) -> Option<(&'static str, u32)> {
    let name = format!("{:?}", emulation);

    for browser in ["Chrome", "Edge", "Firefox", "Safari", "Opera"] {
        if let Some(version_str) = name.strip_prefix(browser) {
            let version: String = version_str
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            if let Ok(ver) = version.parse::<u32>() {
                return Some((browser, ver));
            }
        }
    }
    None
}

/// Closest Emulation variant for a browser family, falling back to the newest Chrome.
fn find_closest_emulation(browser_type: &str, target_version: u32) -> Emulation {
    let closest = Emulation::VARIANTS
        .iter()
        .filter_map(|&e| {
            parse_emulation_variant(e)
                .filter(|(browser, _)| *browser == browser_type)
                .map(|(_, ver)| (e, ver.abs_diff(target_version)))
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(e, _)| e);

    closest.unwrap_or_else(|| {
        Emulation::VARIANTS
            .iter()
            .filter_map(|&e| {
                parse_emulation_variant(e)
                    .filter(|(browser, _)| *browser == "Chrome")
                    .map(|(_, ver)| (e, ver))
            })
            .max_by_key(|(_, ver)| *ver)
            .map(|(e, _)| e)
            .unwrap_or(Emulation::VARIANTS[0])
    })
}

pub fn parse_user_agent(ua: &str) -> (Emulation, EmulationOS) {
    let os = if ua.contains("Macintosh") || ua.contains("Mac OS") {
        EmulationOS::MacOS
    } else if ua.contains("Linux") && !ua.contains("Android") {
        EmulationOS::Linux
    } else {
        EmulationOS::Windows
    };

    // Edge UA contains both "Chrome" and "Edg", so it goes first
    let families = [
        ("Edge", r"Edg/(\d+)"),
        ("Chrome", r"Chrome/(\d+)"),
        ("Firefox", r"Firefox/(\d+)"),
    ];
    for (browser, pattern) in families {
        if let Ok(re) = Regex::new(pattern) {
            if let Some(ver) = re
                .captures(ua)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<u32>().ok())
            {
                return (find_closest_emulation(browser, ver), os);
            }
        }
    }

    if ua.contains("Safari") {
        return (find_closest_emulation("Safari", 999), os);
    }

    (find_closest_emulation("Chrome", 999), os)
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        Self::with_config(&ScraperConfig::default())
    }

    pub fn with_config(config: &ScraperConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();

        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language).map_err(|_| {
                LodestoneError::ValidationError("Invalid accept_language".to_string())
            })?,
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|_| LodestoneError::ValidationError("Invalid user_agent".to_string()))?,
        );

        let (emulation, os) = parse_user_agent(&config.user_agent);
        let emulation_opt = EmulationOption::builder()
            .emulation(emulation)
            .emulation_os(os)
            .build();

        let client = Client::builder()
            .emulation(emulation_opt)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LodestoneError::NetworkError(e.to_string()))?;

        Ok(Self { client })
    }

    pub async fn get_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify_error(e))?;

        self.handle_response_text(url, response).await
    }

    async fn handle_response_text(&self, url: &str, response: wreq::Response) -> Result<String> {
        let status = response.status();

        let body = response
            .text()
            .await
            .map_err(|e| LodestoneError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            return Err(self.status_to_error(url, status, &body));
        }
        if body.trim().is_empty() {
            return Err(LodestoneError::EmptyResponse(url.to_string()));
        }

        debug!(url = %url, len = body.len(), "fetched document");
        Ok(body)
    }

    fn classify_error(&self, error: wreq::Error) -> LodestoneError {
        if error.is_timeout() {
            LodestoneError::Timeout(error.to_string())
        } else if error.is_connect() {
            LodestoneError::NetworkError(format!("Connection failed: {}", error))
        } else {
            LodestoneError::NetworkError(error.to_string())
        }
    }

    fn status_to_error(&self, url: &str, status: wreq::StatusCode, body: &str) -> LodestoneError {
        match status.as_u16() {
            404 | 410 => LodestoneError::DoesNotExist(format!("HTTP {} for {}", status, url)),
            429 => LodestoneError::RateLimited(60),
            _ => {
                let snippet: String = body.trim().chars().take(200).collect();
                LodestoneError::NetworkError(format!("HTTP {} for {}: {}", status, url, snippet))
            }
        }
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn get(&self, url: &str) -> Result<String> {
        self.get_text(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_to_error_not_found_is_does_not_exist() {
        let client = HttpClient::new().unwrap();
        match client.status_to_error("http://x/", wreq::StatusCode::from_u16(404).unwrap(), "") {
            LodestoneError::DoesNotExist(msg) => assert!(msg.contains("404")),
            other => panic!("expected DoesNotExist, got: {:?}", other),
        }
    }

    #[test]
    fn test_status_to_error_rate_limited() {
        let client = HttpClient::new().unwrap();
        match client.status_to_error("http://x/", wreq::StatusCode::from_u16(429).unwrap(), "") {
            LodestoneError::RateLimited(60) => {}
            other => panic!("expected RateLimited, got: {:?}", other),
        }
    }

    #[test]
    fn test_status_to_error_server_error_keeps_snippet() {
        let client = HttpClient::new().unwrap();
        match client.status_to_error(
            "http://x/",
            wreq::StatusCode::from_u16(503).unwrap(),
            "maintenance",
        ) {
            LodestoneError::NetworkError(msg) => assert!(msg.contains("maintenance")),
            other => panic!("expected NetworkError, got: {:?}", other),
        }
    }

    #[test]
    fn test_parse_user_agent_detects_os() {
        let (_, os) = parse_user_agent(crate::config::DEFAULT_USER_AGENT);
        assert!(matches!(os, EmulationOS::MacOS));
        let (_, os) = parse_user_agent("Mozilla/5.0 (X11; Linux x86_64) Firefox/120.0");
        assert!(matches!(os, EmulationOS::Linux));
    }
}
