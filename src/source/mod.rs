//! Routing document sources.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     source URL (e.g. s3://bucket/bounce.toml)
//!     → Scheme::from_str (registry lookup)
//!     → Source::from_url (build exactly one fetcher + its client)
//!
//! Per request:
//!     Source::fetch → Bytes (or FetchError)
//! ```
//!
//! # Supported URLs
//! ```text
//! https://{path...}               HTTPS GET
//! http://{path...}                HTTP GET
//! file://{path...}                local filesystem
//! s3://{bucket}/{key...}          S3 GetObject over HTTPS
//! s3+nossl://{bucket}/{key...}    S3 GetObject over HTTP
//! ```
//!
//! # Design Decisions
//! - Scheme resolved once; an unknown scheme is a startup error, not a request error
//! - Clients are built once and shared read-only across requests
//! - Timeouts live on the client, never in process-global state
//! - Cancellation is future drop; in-flight I/O is aborted with it

pub mod file;
pub mod http;
pub mod s3;

use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use bytes::Bytes;
use thiserror::Error;
use url::Url;

use crate::routing::{ConfigDocument, ParseError};

pub use self::file::FileSource;
pub use self::http::HttpSource;
pub use self::s3::S3Source;

/// Capability to produce the raw bytes of the routing document.
pub trait ConfigSource: Send + Sync + std::fmt::Debug {
    /// Fetch a fresh copy of the document.
    fn fetch(&self) -> impl Future<Output = Result<Bytes, FetchError>> + Send;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// Error building a source from its URL. Fatal at startup.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("config URL not provided")]
    MissingUrl,

    #[error("invalid config URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unknown config URL scheme {0:?}")]
    UnknownScheme(String),

    #[error("config URL {url:?} has a path that is not UTF-8 once decoded: {source}")]
    InvalidPath {
        url: String,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("config URL {0:?} has no bucket")]
    MissingBucket(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Error fetching the document. Fatal for the current request only.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("opening config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("fetching config: {0}")]
    Http(#[source] reqwest::Error),

    #[error("fetching config from s3: {0}")]
    S3(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("fetching config timed out after {0:?}")]
    TimedOut(Duration),
}

/// Error producing a usable document for a request.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("decoding config: {0}")]
    Parse(#[from] ParseError),
}

/// Fetch and parse a fresh document. One attempt, no retry.
pub async fn load_document<S: ConfigSource>(
    source: &S,
    timeout: Duration,
) -> Result<ConfigDocument, LoadError> {
    let bytes = tokio::time::timeout(timeout, source.fetch())
        .await
        .map_err(|_| FetchError::TimedOut(timeout))??;

    Ok(ConfigDocument::parse(&bytes)?)
}

/// Percent-decoded URL path, as the filesystem and S3 expect it.
pub(crate) fn decoded_path(url: &Url) -> Result<String, SourceError> {
    percent_encoding::percent_decode_str(url.path())
        .decode_utf8()
        .map(|path| path.into_owned())
        .map_err(|source| SourceError::InvalidPath {
            url: url.to_string(),
            source,
        })
}

/// Settings shared by every source kind.
#[derive(Debug, Clone)]
pub struct SourceOptions {
    /// Upper bound on a single fetch.
    pub fetch_timeout: Duration,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

/// URL schemes with a registered fetcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    File,
    Http,
    Https,
    S3,
    S3NoSsl,
}

impl FromStr for Scheme {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(Scheme::File),
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            "s3" => Ok(Scheme::S3),
            "s3+nossl" => Ok(Scheme::S3NoSsl),
            other => Err(SourceError::UnknownScheme(other.to_string())),
        }
    }
}

/// The one fetcher selected at startup.
#[derive(Debug)]
pub enum Source {
    File(FileSource),
    Http(HttpSource),
    S3(S3Source),
}

impl Source {
    /// Resolve `config_url` to a concrete fetcher.
    pub async fn from_url(config_url: &str, options: &SourceOptions) -> Result<Self, SourceError> {
        if config_url.is_empty() {
            return Err(SourceError::MissingUrl);
        }

        let url = Url::parse(config_url).map_err(|source| SourceError::InvalidUrl {
            url: config_url.to_string(),
            source,
        })?;

        let source = match url.scheme().parse::<Scheme>()? {
            Scheme::File => Source::File(FileSource::from_url(&url)?),
            Scheme::Http | Scheme::Https => Source::Http(HttpSource::new(url, options)?),
            Scheme::S3 => Source::S3(S3Source::from_url(&url, false, options).await?),
            Scheme::S3NoSsl => Source::S3(S3Source::from_url(&url, true, options).await?),
        };

        tracing::info!(source = %source.describe(), "Config source ready");
        Ok(source)
    }
}

impl ConfigSource for Source {
    async fn fetch(&self) -> Result<Bytes, FetchError> {
        match self {
            Source::File(s) => s.fetch().await,
            Source::Http(s) => s.fetch().await,
            Source::S3(s) => s.fetch().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            Source::File(s) => s.describe(),
            Source::Http(s) => s.describe(),
            Source::S3(s) => s.describe(),
        }
    }
}
