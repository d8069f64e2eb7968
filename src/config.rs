//! Environment driven configuration

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_DATABASE_URL: &str = "sqlite:database/products.db";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `DATABASE_URL`
    pub database_url: String,
    /// `FETCH_TIMEOUT_SECS`, the bound on every page fetch
    pub fetch_timeout: Duration,
    /// `INGEST_URLS_FILE`, affiliate links ingested automatically
    pub ingest_urls_file: Option<PathBuf>,
    /// `INGEST_SCHEDULE`, cron expression for re-running ingestion
    pub ingest_schedule: Option<String>,
}

impl AppConfig {
    /// Reads the configuration from the process environment (after `.env`
    /// has been loaded by the caller)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let fetch_timeout_secs = match get("FETCH_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .with_context(|| format!("FETCH_TIMEOUT_SECS must be a positive integer, got {raw:?}"))?,
            None => DEFAULT_FETCH_TIMEOUT_SECS,
        };

        Ok(Self {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            ingest_urls_file: get("INGEST_URLS_FILE").map(PathBuf::from),
            ingest_schedule: get("INGEST_SCHEDULE"),
        })
    }
}

/// Links listed one per line; blank lines and `#` comments are ignored
pub fn read_url_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.fetch_timeout, Duration::from_secs(15));
        assert_eq!(config.ingest_urls_file, None);
        assert_eq!(config.ingest_schedule, None);
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("FETCH_TIMEOUT_SECS", " 4 "),
            ("INGEST_URLS_FILE", "links.txt"),
            ("INGEST_SCHEDULE", "0 0 * * * *"),
        ])
        .unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.fetch_timeout, Duration::from_secs(4));
        assert_eq!(config.ingest_urls_file, Some(PathBuf::from("links.txt")));
        assert_eq!(config.ingest_schedule.as_deref(), Some("0 0 * * * *"));
    }

    #[test]
    fn rejects_bad_timeouts() {
        assert!(config(&[("FETCH_TIMEOUT_SECS", "soon")]).is_err());
        assert!(config(&[("FETCH_TIMEOUT_SECS", "0")]).is_err());
    }

    #[test]
    fn url_list_skips_comments_and_blanks() {
        let links = read_url_list("# deals\nhttps://www.ebay.com/itm/1\n\n  https://amzn.to/x  \n");
        assert_eq!(links, vec!["https://www.ebay.com/itm/1", "https://amzn.to/x"]);
    }
}
