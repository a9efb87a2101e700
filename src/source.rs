//! Fact sources
//!
//! A [`FactSource`] hands the collector one piece of raw fact text per call.
//! Failures are reported uniformly as [`Error::Fetch`]; callers never retry.

use std::time::Duration;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use crate::{Error, Result};

pub const DEFAULT_SOURCE_URL: &str = "https://uselessfacts.jsph.pl/api/v2/facts/random";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Anything that can produce fact text
#[async_trait]
pub trait FactSource: Send + Sync {
    /// Fetch one fact. The returned text is trimmed and may be empty.
    async fn fetch_fact(&self) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct FactResponse {
    #[serde(default)]
    text: String,
}

/// Fact source backed by a JSON HTTP endpoint returning `{"text": "..."}`
pub struct HttpFactSource {
    url: String,
    http: reqwest::Client,
}

impl HttpFactSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("factcollector/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Fetch(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { url: url.into(), http })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FactSource for HttpFactSource {
    async fn fetch_fact(&self) -> Result<String> {
        debug!("Fetching fact from {}", self.url);

        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Fetch(format!("HTTP {}", response.status())));
        }

        let body: FactResponse = response
            .json()
            .await
            .map_err(|e| Error::Fetch(format!("Invalid response body: {}", e)))?;

        Ok(body.text.trim().to_string())
    }
}
