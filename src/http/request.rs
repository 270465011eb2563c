//! Request inspection.
//!
//! # Responsibilities
//! - Gate methods (GET and HEAD only)
//! - Build the lookup key: `Host` + URL path
//! - Detect the `go-get` tool-intent marker
//!
//! # Design Decisions
//! - `go-get` is detected by presence alone; `?go-get`, `?go-get=` and
//!   `?go-get=1` are all tool requests
//! - Host falls back to the URI authority (HTTP/2 `:authority`)
//! - The path is percent-decoded before lookup so escaped non-ASCII paths
//!   match prefixes written in plain text; invalid UTF-8 is replaced with
//!   U+FFFD and simply fails to match

use axum::http::{header, HeaderValue, Method, Request};

/// Query parameter that marks a request from import-aware tooling.
pub const TOOL_INTENT_PARAM: &str = "go-get";

/// Methods this service answers.
pub const ALLOWED_METHODS: [Method; 2] = [Method::GET, Method::HEAD];

/// `Allow` header value for 405 responses.
pub fn allow_header() -> HeaderValue {
    HeaderValue::from_static("GET, HEAD")
}

pub fn is_allowed(method: &Method) -> bool {
    ALLOWED_METHODS.contains(method)
}

/// The parts of a request that drive resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BounceRequest {
    /// `host + path`, e.g. `go.example.com/foo/cmd/tool`.
    pub lookup_path: String,

    /// Whether `go-get` was present in the query.
    pub tool_intent: bool,
}

impl BounceRequest {
    pub fn from_request<B>(req: &Request<B>) -> Self {
        let host = req
            .headers()
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .or_else(|| req.uri().authority().map(|a| a.as_str()))
            .unwrap_or_default();

        let path = percent_encoding::percent_decode_str(req.uri().path()).decode_utf8_lossy();

        Self {
            lookup_path: format!("{host}{path}"),
            tool_intent: has_tool_intent(req.uri().query()),
        }
    }
}

/// True when the query string carries `go-get`, whatever its value.
pub fn has_tool_intent(query: Option<&str>) -> bool {
    query
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes()).any(|(key, _)| key == TOOL_INTENT_PARAM)
        })
        .unwrap_or(false)
}
