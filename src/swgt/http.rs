//! swgt HTTP source
//!
//! Talks to the swgt JSON endpoints with `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info};

use super::models::{Defense, DefenseQuery, Monster, MonsterCounter, TrendingDefense, VoteDirection};
use super::source::DefenseSource;
use crate::error::{CacheError, Result};

/// User agent sent with every request
pub const USER_AGENT: &str = "SwArifaAssistant/1.0";

// == Http Source ==
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    client: Client,
}

impl HttpSource {
    /// Creates a source rooted at `base_url` (no trailing slash needed).
    ///
    /// # Arguments
    /// * `base_url` - e.g. `https://swgt.io`
    /// * `timeout` - Per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `base/api/monsters/<name>/counters` with `name` percent-encoded as one
    /// path segment.
    fn counters_url(&self, name: &str) -> Result<Url> {
        let mut url = Url::parse(&self.url("/api/monsters"))
            .map_err(|e| CacheError::Upstream(format!("Invalid swgt URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| CacheError::Upstream(format!("swgt URL {} cannot have a path", self.base_url)))?
            .push(name)
            .push("counters");
        Ok(url)
    }

    /// Sends `request` and decodes a JSON body. Non-2xx is an upstream error.
    async fn fetch_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CacheError::Upstream(format!("swgt returned HTTP {}", status)));
        }

        resp.json()
            .await
            .map_err(|e| CacheError::Upstream(format!("Invalid swgt payload: {}", e)))
    }
}

#[async_trait]
impl DefenseSource for HttpSource {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn search_defenses(&self, query: &DefenseQuery) -> Result<Vec<Defense>> {
        debug!(query = %query, "Searching swgt defenses");
        let request = self
            .client
            .get(self.url("/api/search"))
            .query(&[("q", query.cache_suffix())]);
        self.fetch_json(request).await
    }

    async fn search_monsters(&self, query: &str) -> Result<Vec<Monster>> {
        let request = self
            .client
            .get(self.url("/api/monsters"))
            .query(&[("q", query)]);
        self.fetch_json(request).await
    }

    async fn trending(&self) -> Result<Vec<TrendingDefense>> {
        self.fetch_json(self.client.get(self.url("/api/trending"))).await
    }

    async fn monster_counters(&self, name: &str) -> Result<Vec<MonsterCounter>> {
        let request = self.client.get(self.counters_url(name)?);
        self.fetch_json(request).await
    }

    async fn vote(&self, counter_id: &str, direction: VoteDirection) -> Result<()> {
        let resp = self
            .client
            .post(self.url("/api/vote"))
            .json(&json!({ "counterId": counter_id, "direction": direction }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CacheError::Upstream(format!("Vote rejected with HTTP {}", status)));
        }

        info!(counter_id, direction = %direction, "Vote registered");
        Ok(())
    }

    /// `HEAD` on the base URL; any transport error or non-2xx is unreachable.
    async fn check_health(&self) -> bool {
        match self.client.head(&self.base_url).send().await {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                debug!(status = %resp.status(), "swgt health check refused");
                false
            }
            Err(e) => {
                debug!(error = %e, "swgt health check failed");
                false
            }
        }
    }
}
