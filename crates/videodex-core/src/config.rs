use crate::error::{CatalogError, Result};

pub const DATA_URL_ENV: &str = "VIDEODEX_DATA_URL";
pub const FETCH_TIMEOUT_ENV: &str = "VIDEODEX_FETCH_TIMEOUT_MS";

const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;
const CATEGORIES_FILE: &str = "categories.json";
const VIDEOS_FILE: &str = "videos.json";

/// Where the engine fetches its two catalog documents from, and how long it
/// is willing to wait for each fetch.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub data_base_url: String,
    pub fetch_timeout_ms: u64,
}

impl CatalogConfig {
    pub fn new(data_base_url: impl Into<String>) -> Result<Self> {
        let data_base_url = normalize_base_url(data_base_url.into())?;
        Ok(Self {
            data_base_url,
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
        })
    }

    #[must_use]
    pub fn with_fetch_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.fetch_timeout_ms = timeout_ms;
        self
    }

    /// Reads `VIDEODEX_DATA_URL` (required) and `VIDEODEX_FETCH_TIMEOUT_MS`
    /// (optional) from the environment.
    pub fn from_env() -> Result<Self> {
        let base = read_non_empty_env(DATA_URL_ENV).ok_or_else(|| {
            CatalogError::InvalidConfig(format!("{DATA_URL_ENV} is not set"))
        })?;
        let timeout_ms = read_env_u64(FETCH_TIMEOUT_ENV).unwrap_or(DEFAULT_FETCH_TIMEOUT_MS);
        Ok(Self::new(base)?.with_fetch_timeout_ms(timeout_ms))
    }

    #[must_use]
    pub fn categories_url(&self) -> String {
        format!("{}/{CATEGORIES_FILE}", self.data_base_url)
    }

    #[must_use]
    pub fn videos_url(&self) -> String {
        format!("{}/{VIDEOS_FILE}", self.data_base_url)
    }
}

fn normalize_base_url(raw: String) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(CatalogError::InvalidConfig(
            "data base URL must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

fn read_non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn read_env_u64(name: &str) -> Option<u64> {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_urls_join_base_without_double_slash() {
        let config = CatalogConfig::new("https://cdn.example.test/data/").expect("config");
        assert_eq!(
            config.categories_url(),
            "https://cdn.example.test/data/categories.json"
        );
        assert_eq!(
            config.videos_url(),
            "https://cdn.example.test/data/videos.json"
        );
    }

    #[test]
    fn blank_base_url_is_rejected() {
        let err = CatalogConfig::new("   ").expect_err("must reject blank base");
        assert_eq!(err.code(), "INVALID_CONFIG");
    }

    #[test]
    fn default_timeout_applies_until_overridden() {
        let config = CatalogConfig::new("https://cdn.example.test").expect("config");
        assert_eq!(config.fetch_timeout_ms, DEFAULT_FETCH_TIMEOUT_MS);
        let config = config.with_fetch_timeout_ms(250);
        assert_eq!(config.fetch_timeout_ms, 250);
    }
}
