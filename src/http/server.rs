//! HTTP server setup and request handling.
//!
//! # Responsibilities
//! - Create the Axum Router with the bounce handler on every path
//! - Wire up middleware (tracing, request ID, request timeout)
//! - Per request: method gate → fetch → parse → resolve → respond
//! - Serve on a listener until shutdown

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::request::{allow_header, is_allowed, BounceRequest};
use crate::http::response::Resolution;
use crate::source::{load_document, ConfigSource, Source};

/// Application state injected into handlers. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<Source>,
    pub fetch_timeout: Duration,
}

/// HTTP front end for the bouncer.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server around an already-resolved source.
    pub fn new(config: &ServiceConfig, source: Source) -> Self {
        let state = AppState {
            source: Arc::new(source),
            fetch_timeout: Duration::from_secs(config.source.fetch_timeout_secs),
        };

        let router = Self::build_router(config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// A request that outlives `timeouts.request_secs` gets an empty 500,
    /// the same answer as a failed fetch.
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(bounce_handler))
            .route("/", any(bounce_handler))
            .with_state(state)
            .layer(TimeoutLayer::with_status_code(
                StatusCode::INTERNAL_SERVER_ERROR,
                Duration::from_secs(config.timeouts.request_secs),
            ))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The router, for hosting under another adapter.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on the given listener until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Serves one bounce: a fresh document fetch per request, no caching.
async fn bounce_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    if !is_allowed(request.method()) {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, allow_header())],
        )
            .into_response();
    }

    let bounce = BounceRequest::from_request(&request);

    tracing::debug!(
        path = %bounce.lookup_path,
        tool_intent = bounce.tool_intent,
        "Resolving package"
    );

    let document = match load_document(state.source.as_ref(), state.fetch_timeout).await {
        Ok(document) => document,
        Err(e) => {
            tracing::error!(
                path = %bounce.lookup_path,
                source = %state.source.describe(),
                error = %e,
                "Failed to load config"
            );
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let resolution = Resolution::compose(&document, &bounce.lookup_path, bounce.tool_intent);
    if resolution == Resolution::NotFound {
        tracing::debug!(path = %bounce.lookup_path, "No package matched");
    }
    resolution.into_response()
}
