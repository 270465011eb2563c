//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve the routing document source from validated settings
//! - Build the HTTP front end
//!
//! # Design Decisions
//! - Fail fast: a bad source URL is fatal, the process never serves traffic
//! - The routing document is not fetched at startup

use std::time::Duration;

use thiserror::Error;

use crate::config::ServiceConfig;
use crate::http::HttpServer;
use crate::source::{Source, SourceError, SourceOptions};

/// Fatal startup failure.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("config source: {0}")]
    Source(#[from] SourceError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Source options derived from settings.
pub fn source_options(config: &ServiceConfig) -> SourceOptions {
    SourceOptions {
        fetch_timeout: Duration::from_secs(config.source.fetch_timeout_secs),
    }
}

/// Resolve the configured source URL.
pub async fn build_source(config: &ServiceConfig) -> Result<Source, StartupError> {
    Ok(Source::from_url(&config.source.url, &source_options(config)).await?)
}

/// Build the HTTP server for the given settings.
pub async fn build_server(config: &ServiceConfig) -> Result<HttpServer, StartupError> {
    let source = build_source(config).await?;
    Ok(HttpServer::new(config, source))
}
