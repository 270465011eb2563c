//! Settings validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, bind address parses)
//! - Keep the request deadline above the fetch deadline so a slow source
//!   surfaces as a logged fetch timeout rather than a silent request timeout
//! - Require a routing document location
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - URL scheme is checked when the source is built, not here

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem in the settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("source.url is empty (set IMPORTBOUNCE_CONFIG_URL)")]
    MissingSourceUrl,

    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error(
        "timeouts.request_secs ({request_secs}) must be greater than \
         source.fetch_timeout_secs ({fetch_secs})"
    )]
    RequestTimeoutNotAboveFetch { request_secs: u64, fetch_secs: u64 },

    #[error("listener.bind_address {0:?} is not a socket address")]
    InvalidBindAddress(String),
}

/// Check settings, collecting every problem.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.source.url.trim().is_empty() {
        errors.push(ValidationError::MissingSourceUrl);
    }

    if config.source.fetch_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "source.fetch_timeout_secs",
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "timeouts.request_secs",
        });
    }

    let (request_secs, fetch_secs) = (
        config.timeouts.request_secs,
        config.source.fetch_timeout_secs,
    );
    // Zero values are already reported above.
    if request_secs > 0 && fetch_secs > 0 && request_secs <= fetch_secs {
        errors.push(ValidationError::RequestTimeoutNotAboveFetch {
            request_secs,
            fetch_secs,
        });
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let mut config = ServiceConfig::default();
        config.source.url = "file:///etc/importbounce.toml".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_reports_all_errors() {
        let mut config = ServiceConfig::default();
        config.source.fetch_timeout_secs = 0;
        config.timeouts.request_secs = 0;
        config.listener.bind_address = "localhost".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::MissingSourceUrl,
                ValidationError::ZeroTimeout {
                    field: "source.fetch_timeout_secs"
                },
                ValidationError::ZeroTimeout {
                    field: "timeouts.request_secs"
                },
                ValidationError::InvalidBindAddress("localhost".into()),
            ]
        );
    }

    #[test]
    fn test_request_timeout_must_exceed_fetch_timeout() {
        let mut config = ServiceConfig::default();
        config.source.url = "file:///etc/importbounce.toml".into();
        config.source.fetch_timeout_secs = 10;

        config.timeouts.request_secs = 10;
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::RequestTimeoutNotAboveFetch {
                request_secs: 10,
                fetch_secs: 10
            }]
        );

        config.timeouts.request_secs = 5;
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::RequestTimeoutNotAboveFetch {
                request_secs: 5,
                fetch_secs: 10
            }]
        );

        config.timeouts.request_secs = 11;
        assert!(validate_config(&config).is_ok());
    }
}
