//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid environment variable {name}: {message}")]
    Env { name: &'static str, message: String },

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

/// Load configuration from an optional TOML file, apply process environment
/// overrides, then validate.
pub fn load(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => parse_file(path)?,
        None => ServiceConfig::default(),
    };
    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file, without environment overrides.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let config = parse_file(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn parse_file(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Overlay environment variables onto `config`.
///
/// The `POSTGRES_*` names match the deployment environment the service has
/// always been run in; `lookup` is injected so tests need not touch the
/// process environment.
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("POSTGRES_USERNAME") {
        config.database.username = v;
    }
    if let Some(v) = lookup("POSTGRES_PASSWORD") {
        config.database.password = v;
    }
    if let Some(v) = lookup("POSTGRES_HOST") {
        config.database.host = v;
    }
    if let Some(v) = lookup("POSTGRES_PORT") {
        config.database.port = v.trim().parse().map_err(|_| ConfigError::Env {
            name: "POSTGRES_PORT",
            message: format!("'{}' is not a port number", v),
        })?;
    }
    if let Some(v) = lookup("POSTGRES_DATABASE") {
        config.database.database = v;
    }
    if let Some(v) = lookup("BOOKS_API_BIND") {
        config.listener.bind_address = v;
    }
    if let Some(v) = lookup("BOOKS_API_STORAGE") {
        config.storage.backend = v.parse().map_err(|message| ConfigError::Env {
            name: "BOOKS_API_STORAGE",
            message,
        })?;
    }
    Ok(())
}
