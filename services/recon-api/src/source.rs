//! Where observation and catalog documents come from.
//!
//! Paths are site-relative (`static/json/Alberto/AL012024_01.json`). The
//! filesystem source maps the `static/` prefix onto the configured static
//! directory; the HTTP source appends the path to a base URL. There are no
//! retries: a failed fetch is reported once and left to the caller.

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use recon_common::ReconError;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Path not allowed: {0}")]
    InvalidPath(String),

    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("Request for {path} failed: {message}")]
    Request { path: String, message: String },

    #[error("Failed to load {path}: HTTP {status}")]
    Status { path: String, status: u16 },

    #[error("Invalid JSON in {path}: {message}")]
    Parse { path: String, message: String },
}

impl From<SourceError> for ReconError {
    fn from(err: SourceError) -> Self {
        match &err {
            SourceError::InvalidPath(p) => ReconError::InvalidParameter {
                param: "path".to_string(),
                message: format!("not allowed: {}", p),
            },
            SourceError::Io { path, .. }
            | SourceError::Request { path, .. }
            | SourceError::Status { path, .. }
            | SourceError::Parse { path, .. } => ReconError::FetchFailed {
                path: path.clone(),
                message: err.to_string(),
            },
        }
    }
}

/// A read-only store of JSON documents.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch and parse one document.
    async fn fetch_json(&self, path: &str) -> Result<Value, SourceError>;

    /// Short description for logs.
    fn describe(&self) -> String;
}

/// Documents on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsSource {
    static_dir: PathBuf,
}

impl FsSource {
    pub fn new(static_dir: impl Into<PathBuf>) -> Self {
        Self {
            static_dir: static_dir.into(),
        }
    }

    /// Map a site path onto the static directory, refusing anything that
    /// could escape it.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, SourceError> {
        let relative = path
            .trim_start_matches('/')
            .strip_prefix("static/")
            .unwrap_or(path.trim_start_matches('/'));
        let relative = Path::new(relative);
        if relative.as_os_str().is_empty()
            || !relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(SourceError::InvalidPath(path.to_string()));
        }
        Ok(self.static_dir.join(relative))
    }
}

#[async_trait]
impl DataSource for FsSource {
    async fn fetch_json(&self, path: &str) -> Result<Value, SourceError> {
        let file = self.resolve(path)?;
        debug!(path = %path, file = %file.display(), "Reading document");
        let content = tokio::fs::read_to_string(&file)
            .await
            .map_err(|e| SourceError::Io {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        serde_json::from_str(&content).map_err(|e| SourceError::Parse {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    fn describe(&self) -> String {
        format!("fs:{}", self.static_dir.display())
    }
}

/// Documents served by a remote site.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch_json(&self, path: &str) -> Result<Value, SourceError> {
        let url = self.url_for(path);
        debug!(url = %url, "Fetching document");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Request {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<Value>().await.map_err(|e| SourceError::Parse {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    fn describe(&self) -> String {
        format!("http:{}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_strips_static_prefix() {
        let source = FsSource::new("/srv/site/static");
        assert_eq!(
            source.resolve("static/json/Alberto/a.json").unwrap(),
            PathBuf::from("/srv/site/static/json/Alberto/a.json")
        );
        assert_eq!(
            source.resolve("/json/storm_catalog.json").unwrap(),
            PathBuf::from("/srv/site/static/json/storm_catalog.json")
        );
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let source = FsSource::new("/srv/site/static");
        assert!(source.resolve("static/../secret.json").is_err());
        assert!(source.resolve("static/").is_err());
    }

    #[test]
    fn test_http_url_joining() {
        let source = HttpSource::new("https://example.org/recon/").unwrap();
        assert_eq!(
            source.url_for("static/json/storm_catalog.json"),
            "https://example.org/recon/static/json/storm_catalog.json"
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FsSource::new(dir.path());
        let err = source.fetch_json("static/json/none.json").await.unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
        let recon: ReconError = err.into();
        assert_eq!(recon.http_status_code(), 502);
    }
}
