//! Local filesystem source.

use std::path::PathBuf;

use bytes::Bytes;
use url::Url;

use super::{decoded_path, ConfigSource, FetchError, SourceError};

/// Reads the document from a local path on every fetch.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Join the URL host and decoded path: `file:///etc/b.toml` is absolute,
    /// `file://conf/b.toml` is relative to the working directory.
    pub fn from_url(url: &Url) -> Result<Self, SourceError> {
        let decoded = decoded_path(url)?;
        let path = match url.host_str() {
            Some(host) if !host.is_empty() => {
                PathBuf::from(host).join(decoded.trim_start_matches('/'))
            }
            _ => PathBuf::from(decoded),
        };
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl ConfigSource for FileSource {
    async fn fetch(&self) -> Result<Bytes, FetchError> {
        let contents = tokio::fs::read(&self.path)
            .await
            .map_err(|source| FetchError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        Ok(Bytes::from(contents))
    }

    fn describe(&self) -> String {
        format!("file://{}", self.path.display())
    }
}
