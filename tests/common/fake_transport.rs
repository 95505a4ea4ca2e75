#![allow(dead_code)]

use async_trait::async_trait;
use ffxiv_scraper::{LodestoneError, Result, ScraperConfig, Transport};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub const BASE: &str = "http://lodestone.test/lodestone";

pub fn test_config() -> ScraperConfig {
    ScraperConfig::default().with_base_url(BASE)
}

pub fn url(path: &str) -> String {
    format!("{}/{}", BASE, path)
}

enum Reply {
    Body(String),
    Fail,
}

/// In-memory Lodestone: exact URL to canned body or failure. Unknown URLs
/// answer like a 404.
#[derive(Default)]
pub struct FakeTransport {
    replies: HashMap<String, Reply>,
    delays: HashMap<String, Duration>,
    requested: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, path: &str, body: impl Into<String>) -> Self {
        self.replies.insert(url(path), Reply::Body(body.into()));
        self
    }

    pub fn failing(mut self, path: &str) -> Self {
        self.replies.insert(url(path), Reply::Fail);
        self
    }

    pub fn delayed(mut self, path: &str, delay: Duration) -> Self {
        self.delays.insert(url(path), delay);
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, url: &str) -> Result<String> {
        self.requested.lock().unwrap().push(url.to_string());
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        match self.replies.get(url) {
            Some(Reply::Body(body)) => Ok(body.clone()),
            Some(Reply::Fail) => Err(LodestoneError::NetworkError(format!(
                "HTTP 503 Service Unavailable for {}",
                url
            ))),
            None => Err(LodestoneError::DoesNotExist(format!("HTTP 404 Not Found for {}", url))),
        }
    }
}
