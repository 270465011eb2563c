//! Settings loading from disk and overrides.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for settings loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values that take precedence over the settings file (CLI flags, env).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub source_url: Option<String>,
    pub bind_address: Option<String>,
    pub log_level: Option<String>,
}

/// Read settings from a TOML file without validating.
pub fn read_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load settings (file if given, else defaults), apply overrides, validate.
pub fn load_config(path: Option<&Path>, overrides: Overrides) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => ServiceConfig::default(),
    };

    if let Some(url) = overrides.source_url {
        config.source.url = url;
    }
    if let Some(addr) = overrides.bind_address {
        config.listener.bind_address = addr;
    }
    if let Some(level) = overrides.log_level {
        config.observability.log_level = level;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
