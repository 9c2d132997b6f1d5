//! Engine configuration
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `UPM_*` environment variables. Call [`MapperConfig::validate`] once the
//! layers are applied.

use crate::error::{MapperError, Result};
use crate::types::{ResultFormat, DEFAULT_BATCH_SIZE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://rest.uniprot.org";

/// Backoff for transient failures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles on each further attempt
    pub base_delay_ms: u64,
    /// Upper bound of the random delay added to each backoff
    pub max_jitter_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            max_jitter_ms: 250,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Base URL of the UniProt REST service
    pub api_url: String,
    pub poll_interval_secs: u64,
    /// Longest time to wait for one job before giving up on its batch
    pub max_wait_secs: u64,
    pub batch_size: usize,
    /// Server-imposed ceiling on `batch_size`
    pub max_batch_size: usize,
    /// Number of batch lifecycles allowed in flight at once
    pub concurrency: usize,
    pub page_size: usize,
    pub format: ResultFormat,
    /// Ask the service for gzip-compressed result pages
    pub compressed: bool,
    pub request_timeout_secs: u64,
    pub retry: RetryConfig,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            poll_interval_secs: 3,
            max_wait_secs: 300,
            batch_size: DEFAULT_BATCH_SIZE,
            max_batch_size: DEFAULT_BATCH_SIZE,
            concurrency: 1,
            page_size: 500,
            format: ResultFormat::Json,
            compressed: false,
            request_timeout_secs: 300,
            retry: RetryConfig::default(),
        }
    }
}

impl MapperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a TOML file; keys missing from the file keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            MapperError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        toml::from_str(&text)
            .map_err(|e| MapperError::config(format!("invalid {}: {}", path.display(), e)))
    }

    /// Defaults overridden by the environment
    pub fn from_env() -> Result<Self> {
        Self::default().merge_env()
    }

    /// Override fields with any `UPM_*` variables that are set
    pub fn merge_env(mut self) -> Result<Self> {
        if let Ok(url) = std::env::var("UPM_API_URL") {
            self.api_url = url;
        }
        if let Some(v) = env_parse("UPM_POLL_INTERVAL_SECS")? {
            self.poll_interval_secs = v;
        }
        if let Some(v) = env_parse("UPM_MAX_WAIT_SECS")? {
            self.max_wait_secs = v;
        }
        if let Some(v) = env_parse("UPM_BATCH_SIZE")? {
            self.batch_size = v;
        }
        if let Some(v) = env_parse("UPM_CONCURRENCY")? {
            self.concurrency = v;
        }
        if let Some(v) = env_parse("UPM_PAGE_SIZE")? {
            self.page_size = v;
        }
        if let Ok(format) = std::env::var("UPM_FORMAT") {
            self.format = format.parse()?;
        }
        if let Some(v) = env_parse("UPM_COMPRESSED")? {
            self.compressed = v;
        }
        if let Some(v) = env_parse("UPM_REQUEST_TIMEOUT_SECS")? {
            self.request_timeout_secs = v;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api_url)
            .map_err(|e| MapperError::config(format!("invalid api_url '{}': {}", self.api_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(MapperError::config(format!(
                "api_url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.poll_interval_secs == 0 {
            return Err(MapperError::config("poll_interval_secs must be positive"));
        }
        if self.max_wait_secs < self.poll_interval_secs {
            return Err(MapperError::config(
                "max_wait_secs must be at least poll_interval_secs",
            ));
        }
        if self.max_batch_size == 0 {
            return Err(MapperError::config("max_batch_size must be positive"));
        }
        if self.batch_size == 0 || self.batch_size > self.max_batch_size {
            return Err(MapperError::config(format!(
                "batch_size must be between 1 and {}",
                self.max_batch_size
            )));
        }
        if self.concurrency == 0 {
            return Err(MapperError::config("concurrency must be at least 1"));
        }
        if self.page_size == 0 {
            return Err(MapperError::config("page_size must be positive"));
        }
        if self.retry.max_attempts == 0 {
            return Err(MapperError::config("retry.max_attempts must be at least 1"));
        }
        Ok(())
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_poll_interval(mut self, secs: u64) -> Self {
        self.poll_interval_secs = secs;
        self
    }

    pub fn with_max_wait(mut self, secs: u64) -> Self {
        self.max_wait_secs = secs;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_format(mut self, format: ResultFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_compressed(mut self, compressed: bool) -> Self {
        self.compressed = compressed;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// API base without a trailing slash
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| MapperError::config(format!("{}='{}': {}", key, raw, e))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = MapperConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.poll_interval(), Duration::from_secs(3));
        assert_eq!(config.max_wait(), Duration::from_secs(300));
        assert_eq!(config.batch_size, 500);
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn test_validate_rejects_oversized_batch() {
        let config = MapperConfig::default().with_batch_size(501);
        assert!(matches!(config.validate(), Err(MapperError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = MapperConfig::default().with_api_url("ftp://rest.uniprot.org");
        assert!(config.validate().is_err());

        let config = MapperConfig::default().with_api_url("not a url");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let config = MapperConfig::default().with_concurrency(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_base_url_trims_trailing_slash() {
        let config = MapperConfig::default().with_api_url("http://localhost:8080/");
        assert_eq!(config.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "poll_interval_secs = 1\nformat = \"tsv\"\n\n[retry]\nmax_attempts = 5"
        )
        .unwrap();

        let config = MapperConfig::from_file(file.path()).unwrap();
        assert_eq!(config.poll_interval_secs, 1);
        assert_eq!(config.format, ResultFormat::Tsv);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.base_delay_ms, 1000);
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_from_file_reports_syntax_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "poll_interval_secs = \"soon\"").unwrap();
        assert!(matches!(
            MapperConfig::from_file(file.path()),
            Err(MapperError::Config(_))
        ));
    }
}
