//! Response composition.
//!
//! # Responsibilities
//! - Pick the response variant for a resolved (or unresolved) request
//! - Render the `go-import` metadata page
//! - Map variants to HTTP responses
//!
//! # Design Decisions
//! - The metadata page is rendered into memory before any header is sent,
//!   so a render failure still yields a clean 500
//! - Attribute values are HTML-escaped
//! - Error responses never carry internal detail

use std::fmt::Write;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use html_escape::encode_double_quoted_attribute;
use serde::Serialize;
use thiserror::Error;

use crate::routing::{ConfigDocument, RoutingRule};

pub const NOT_FOUND_BODY: &str = "Package not found\n";

/// Error rendering the metadata page.
#[derive(Debug, Error)]
#[error("rendering metadata page: {0}")]
pub struct RenderError(#[from] std::fmt::Error);

/// What to answer for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "target", rename_all = "snake_case")]
pub enum Resolution {
    /// 200 with the metadata page for this rule.
    Metadata(RoutingRule),
    /// 302 to this URL.
    Redirect(String),
    /// 404 `Package not found`.
    NotFound,
}

impl Resolution {
    /// Resolve `lookup_path` against `document`.
    ///
    /// | match | default redirect | tool intent | result |
    /// |-------|------------------|-------------|--------|
    /// | no    | set              | no          | redirect to default |
    /// | no    | any              | yes         | not found |
    /// | no    | unset            | any         | not found |
    /// | yes   | any              | no          | redirect to rule |
    /// | yes   | any              | yes         | metadata page |
    pub fn compose(document: &ConfigDocument, lookup_path: &str, tool_intent: bool) -> Self {
        match document.find_rule(lookup_path) {
            Some(rule) if tool_intent => Resolution::Metadata(rule.clone()),
            Some(rule) => Resolution::Redirect(rule.redirect.clone()),
            None => match &document.default_redirect {
                Some(url) if !tool_intent => Resolution::Redirect(url.clone()),
                _ => Resolution::NotFound,
            },
        }
    }
}

impl IntoResponse for Resolution {
    fn into_response(self) -> Response {
        match self {
            Resolution::Metadata(rule) => match render_metadata_page(&rule) {
                Ok(page) => (
                    StatusCode::OK,
                    [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                    page,
                )
                    .into_response(),
                Err(e) => {
                    tracing::error!(prefix = %rule.prefix, error = %e, "Failed to render metadata page");
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
            },
            Resolution::Redirect(url) => redirect(&url),
            Resolution::NotFound => (
                StatusCode::NOT_FOUND,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                NOT_FOUND_BODY,
            )
                .into_response(),
        }
    }
}

/// 302 Found. `axum::response::Redirect` only offers 303/307/308.
fn redirect(url: &str) -> Response {
    match header::HeaderValue::from_str(url) {
        Ok(location) => (StatusCode::FOUND, [(header::LOCATION, location)]).into_response(),
        Err(e) => {
            tracing::error!(url = %url, error = %e, "Redirect target is not a valid header value");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Render the HTML page consumed by `go get`.
pub fn render_metadata_page(rule: &RoutingRule) -> Result<String, RenderError> {
    let mut page = String::with_capacity(256);
    writeln!(page, "<html>")?;
    writeln!(page, "<head>")?;
    writeln!(
        page,
        r#"<meta name="go-import" content="{} {}">"#,
        encode_double_quoted_attribute(&rule.prefix),
        encode_double_quoted_attribute(&rule.import),
    )?;
    writeln!(
        page,
        r#"<meta http-equiv="refresh" content="0; url={}">"#,
        encode_double_quoted_attribute(&rule.redirect),
    )?;
    writeln!(page, "</head>")?;
    writeln!(page, "<body>Redirecting…</body>")?;
    write!(page, "</html>")?;
    Ok(page)
}
