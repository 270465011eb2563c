//! Go vanity import redirector library.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod source;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{ConfigDocument, RoutingRule};
pub use source::{ConfigSource, Source};
