use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::{CatalogError, Result};

/// The engine's only view of the network: fetch one JSON document from a URL.
/// Caching, retries, and offline behavior belong to the implementor.
pub trait Fetcher: Send + Sync {
    fn fetch_json(&self, url: &str) -> Result<serde_json::Value>;
}

/// Blocking HTTP implementation of [`Fetcher`].
#[derive(Clone)]
pub struct HttpFetcher {
    http: Client,
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher").finish_non_exhaustive()
    }
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_json(&self, url: &str) -> Result<serde_json::Value> {
        let resp = self.http.get(url).send()?;
        if !resp.status().is_success() {
            return Err(CatalogError::FetchStatus {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }
        Ok(resp.json()?)
    }
}
