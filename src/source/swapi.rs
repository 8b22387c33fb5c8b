//! SWAPI planet source.
//!
//! Talks to `https://swapi.dev/api` (or any server with the same shape) over
//! HTTP using an async [`reqwest::Client`].  Each call is a single attempt:
//! retries belong to whoever triggers the fetch.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::{Page, Planet, PlanetSource};
use crate::error::{Error, Result};

/// A planet source backed by the SWAPI REST endpoint.
pub struct SwapiClient {
    /// API root without the trailing slash, e.g. `https://swapi.dev/api`.
    base_url: String,
    http: Client,
}

impl SwapiClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` — API root (e.g. `https://swapi.dev/api`).  A trailing
    ///   slash is tolerated.
    /// * `timeout` — per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Canonical URL of a single planet.
    pub fn planet_url(&self, id: &str) -> String {
        format!("{}/planets/{}/", self.base_url, id)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!(url, "GET");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl PlanetSource for SwapiClient {
    fn root_cursor(&self) -> String {
        format!("{}/planets/", self.base_url)
    }

    async fn fetch_page(&self, cursor: &str) -> Result<Page> {
        self.get_json(cursor).await
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Planet> {
        let url = self.planet_url(id);
        self.get_json(&url).await
    }
}
