use crate::config::CachingConfig;
use crate::error::{LensError, Result};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Where the raw CSV payload comes from.
#[async_trait]
pub trait PayloadSource: Send + Sync {
    /// Human-readable location, used in logs and load-failure messages.
    fn origin(&self) -> &str;

    async fn fetch(&self) -> Result<String>;
}

/// Fetches the payload with a single HTTP GET. Non-2xx responses are errors.
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        HttpSource {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PayloadSource for HttpSource {
    fn origin(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<String> {
        debug!(url = %self.url, "Fetching payload over HTTP");
        let response = self.client.get(&self.url).send().await?.error_for_status()?;
        let text = response.text().await?;
        Ok(text)
    }
}

/// Reads the payload from a local file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    origin: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let origin = path.display().to_string();
        FileSource { path, origin }
    }
}

#[async_trait]
impl PayloadSource for FileSource {
    fn origin(&self) -> &str {
        &self.origin
    }

    async fn fetch(&self) -> Result<String> {
        debug!(path = %self.origin, "Reading payload from file");
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }
}

/// `http(s)://` locations are fetched over the network; `file://` and bare paths are read from disk.
pub fn source_for(location: &str) -> Result<Box<dyn PayloadSource>> {
    let location = location.trim();
    if location.is_empty() {
        return Err(LensError::ConfigError(
            "No data source configured (data.source.url is empty)".to_string(),
        ));
    }
    let lower = location.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Ok(Box::new(HttpSource::new(location)))
    } else if let Some(path) = location.strip_prefix("file://") {
        Ok(Box::new(FileSource::new(path)))
    } else {
        Ok(Box::new(FileSource::new(location)))
    }
}

/// On-disk cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedPayload {
    /// The source the payload was fetched from.
    #[serde(default)]
    pub origin: String,
    pub data: String,
    /// Milliseconds since the Unix epoch at write time.
    pub timestamp: i64,
}

/// Session cache for the raw payload.
///
/// Every failure is logged and treated as a miss; the cache never fails a load.
#[derive(Debug, Clone)]
pub struct PayloadCache {
    path: PathBuf,
    ttl: Duration,
}

impl PayloadCache {
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        PayloadCache {
            path: path.into(),
            ttl,
        }
    }

    pub fn from_config(config: &CachingConfig) -> Self {
        PayloadCache::new(config.cache_path(), Duration::from_secs(config.duration_secs))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The cached payload for `origin` if it is younger than the TTL.
    /// Expired entries and entries from another origin are removed.
    pub async fn get(&self, origin: &str) -> Option<String> {
        self.get_at(origin, Utc::now().timestamp_millis()).await
    }

    async fn get_at(&self, origin: &str, now_millis: i64) -> Option<String> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Cache read error");
                return None;
            }
        };
        let cached: CachedPayload = match serde_json::from_str(&raw) {
            Ok(cached) => cached,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Cache read error");
                return None;
            }
        };

        if cached.origin != origin {
            info!(cached = %cached.origin, requested = %origin, "Payload cache holds another source");
            self.clear().await;
            return None;
        }

        let age = now_millis.saturating_sub(cached.timestamp);
        if age < self.ttl_millis() {
            debug!(age_ms = age, "Payload cache hit");
            return Some(cached.data);
        }

        info!(age_ms = age, "Payload cache expired");
        self.clear().await;
        None
    }

    /// Best effort.
    pub async fn set(&self, origin: &str, data: &str) {
        self.set_at(origin, data, Utc::now().timestamp_millis()).await
    }

    async fn set_at(&self, origin: &str, data: &str, now_millis: i64) {
        let entry = CachedPayload {
            origin: origin.to_string(),
            data: data.to_string(),
            timestamp: now_millis,
        };
        if let Err(e) = self.write_entry(&entry).await {
            warn!(path = %self.path.display(), error = %e, "Cache write error");
        }
    }

    async fn write_entry(&self, entry: &CachedPayload) -> Result<()> {
        let json = serde_json::to_string(entry)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }

    pub async fn clear(&self) {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => debug!(path = %self.path.display(), "Payload cache cleared"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Cache clear error"),
        }
    }

    fn ttl_millis(&self) -> i64 {
        i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX)
    }
}
