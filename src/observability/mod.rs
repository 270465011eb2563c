//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request handling, sources, startup:
//!     → tracing events (structured fields: path, source, error)
//!     → logging.rs subscriber (stdout, filtered)
//! ```
//!
//! # Design Decisions
//! - Structured logging only; no metrics pipeline
//! - Request ID (`x-request-id`) attached by middleware and echoed back
//! - Failure causes are logged here, never written to responses

pub mod logging;
