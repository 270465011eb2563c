//! importbounce
//!
//! Answers `go get` vanity import requests from a routing document that is
//! fetched fresh on every request.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ http::request (method, host+path, go-get)
//!                          │
//!                          ▼
//!                      source::load_document ──▶ file | http(s) | s3
//!                          │
//!                          ▼
//!                      routing (parse TOML, ordered prefix match)
//!                          │
//!     Client Response      ▼
//!     ◀────────────── http::response (metadata page | 302 | 404 | 500)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::net::TcpListener;

use importbounce::config::{load_config, Overrides, ServiceConfig};
use importbounce::http::Resolution;
use importbounce::lifecycle::{signals, startup, Shutdown, StartupError};
use importbounce::observability::logging;
use importbounce::routing::ConfigDocument;
use importbounce::source::{load_document, ConfigSource};

#[derive(Parser)]
#[command(name = "importbounce", version)]
#[command(about = "Serve go-import redirects from a remote routing document", long_about = None)]
struct Cli {
    /// Settings file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Routing document URL (file://, http(s)://, s3://, s3+nossl://).
    #[arg(long, env = "IMPORTBOUNCE_CONFIG_URL")]
    config_url: Option<String>,

    /// Log level when RUST_LOG is unset.
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve HTTP on a local address (default)
    Serve {
        /// Address to listen on, overriding the settings file.
        #[arg(long)]
        http: Option<String>,
    },
    /// Serve requests as an AWS Lambda function
    #[cfg(feature = "lambda")]
    Lambda,
    /// Fetch and parse the routing document once, then report on it
    Check {
        /// Host + path to resolve, e.g. go.example.com/foo/cmd/tool.
        path: Option<String>,

        /// Resolve as a `go get` request.
        #[arg(long)]
        go_get: bool,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct CheckReport<'a> {
    source: String,
    document: &'a ConfigDocument,
    #[serde(skip_serializing_if = "Option::is_none")]
    resolution: Option<Resolution>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Serve { http: None });

    let bind_address = match &command {
        Commands::Serve { http } => http.clone(),
        _ => None,
    };
    let config = load_config(
        cli.config.as_deref(),
        Overrides {
            source_url: cli.config_url,
            bind_address,
            log_level: cli.log_level,
        },
    )?;

    logging::init(&config.observability.log_level);

    match command {
        Commands::Serve { .. } => serve(config).await?,
        #[cfg(feature = "lambda")]
        Commands::Lambda => {
            tracing::info!("Starting AWS Lambda listener");
            let server = startup::build_server(&config).await?;
            lambda_http::run(server.router())
                .await
                .map_err(|e| -> Box<dyn std::error::Error> { e })?;
        }
        Commands::Check { path, go_get, json } => check(&config, path, go_get, json).await?,
    }

    Ok(())
}

async fn serve(config: ServiceConfig) -> Result<(), StartupError> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        source_url = %config.source.url,
        fetch_timeout_secs = config.source.fetch_timeout_secs,
        request_timeout_secs = config.timeouts.request_secs,
        "importbounce v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let server = startup::build_server(&config).await?;

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    let shutdown = Arc::new(Shutdown::new());
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    if let Err(e) = server.run(listener, server_shutdown).await {
        tracing::error!(error = %e, "Server error");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn check(
    config: &ServiceConfig,
    path: Option<String>,
    go_get: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = startup::build_source(config).await?;
    let timeout = startup::source_options(config).fetch_timeout;
    let document = load_document(&source, timeout).await?;

    let report = CheckReport {
        source: source.describe(),
        document: &document,
        resolution: path
            .as_deref()
            .map(|p| Resolution::compose(&document, p, go_get)),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("source: {}", report.source);
    println!(
        "default_redirect: {}",
        document.default_redirect.as_deref().unwrap_or("(none)")
    );
    for (i, rule) in document.packages.iter().enumerate() {
        println!("[{i}] {} -> {} ({})", rule.prefix, rule.redirect, rule.import);
    }

    if let (Some(path), Some(resolution)) = (path, report.resolution) {
        match resolution {
            Resolution::Metadata(rule) => {
                println!("{path}: 200 go-import \"{} {}\"", rule.prefix, rule.import)
            }
            Resolution::Redirect(url) => println!("{path}: 302 {url}"),
            Resolution::NotFound => println!("{path}: 404"),
        }
    }

    Ok(())
}
