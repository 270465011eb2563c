//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → server.rs (middleware: request ID, trace, timeout)
//!     → request.rs (method gate, host + path, go-get marker)
//!     → source (fetch) → routing (parse, match)
//!     → response.rs (metadata page | 302 | 404)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::BounceRequest;
pub use response::Resolution;
pub use server::HttpServer;
