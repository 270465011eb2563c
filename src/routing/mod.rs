//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Fetched document bytes
//!     → document.rs (TOML → ConfigDocument, order preserved)
//!
//! Incoming request (host + path)
//!     → ConfigDocument::find_rule (ordered scan)
//!     → matcher.rs (prefix + segment boundary test)
//!     → Return: Some(&RoutingRule) or None
//! ```
//!
//! # Design Decisions
//! - Document rebuilt per request, never cached or mutated
//! - First declared match wins; specific rules must come before general ones
//! - No-match is `None`, never a sentinel rule

pub mod document;
pub mod matcher;

pub use document::{ConfigDocument, ParseError, RoutingRule};
