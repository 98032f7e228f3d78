//! Configuration validation.
//!
//! Serde handles syntax; this module checks values that parse but cannot
//! work (unparseable addresses, zero timeouts, bad origins). All problems
//! are reported together rather than stopping at the first.

use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;

use crate::config::schema::{ServiceConfig, StorageBackend};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// A socket address, or `host:port` with a name to resolve at bind time.
fn is_bind_address(addr: &str) -> bool {
    if addr.parse::<SocketAddr>().is_ok() {
        return true;
    }
    match addr.rsplit_once(':') {
        Some((host, port)) => {
            !host.is_empty() && !host.contains(':') && port.parse::<u16>().is_ok()
        }
        None => false,
    }
}

/// Validate a configuration, returning every error found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !is_bind_address(&config.listener.bind_address) {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a host:port address", config.listener.bind_address),
        ));
    }

    let base = &config.listener.base_path;
    if !base.is_empty() && (!base.starts_with('/') || base.ends_with('/')) {
        errors.push(ValidationError::new(
            "listener.base_path",
            "must be empty or start with '/' and not end with '/'",
        ));
    }

    if config.storage.backend == StorageBackend::Postgres {
        let db = &config.database;
        if db.host.is_empty() {
            errors.push(ValidationError::new("database.host", "must not be empty"));
        }
        if db.port == 0 {
            errors.push(ValidationError::new("database.port", "must be > 0"));
        }
        if db.database.is_empty() {
            errors.push(ValidationError::new("database.database", "must not be empty"));
        }
        if db.max_connections == 0 {
            errors.push(ValidationError::new("database.max_connections", "must be > 0"));
        }
        if db.connect_retries == 0 {
            errors.push(ValidationError::new("database.connect_retries", "must be > 0"));
        }
    }

    for origin in &config.cors.allowed_origins {
        if origin == "*" && config.cors.allow_credentials {
            errors.push(ValidationError::new(
                "cors.allowed_origins",
                "'*' cannot be combined with allow_credentials",
            ));
        } else if HeaderValue::from_str(origin).is_err() {
            errors.push(ValidationError::new(
                "cors.allowed_origins",
                format!("'{}' is not a valid origin", origin),
            ));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be > 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
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
    fn defaults_are_valid() {
        assert_eq!(validate_config(&ServiceConfig::default()), Ok(()));
    }

    #[test]
    fn collects_every_error() {
        let mut config = ServiceConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.request_secs = 0;
        config.database.host.clear();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["listener.bind_address", "database.host", "timeouts.request_secs"]
        );
    }

    #[test]
    fn bind_address_accepts_host_names() {
        let mut config = ServiceConfig::default();
        for addr in ["localhost:8080", "0.0.0.0:80", "[::1]:8080", "books.internal:0"] {
            config.listener.bind_address = addr.into();
            assert!(validate_config(&config).is_ok(), "{addr} should be accepted");
        }
        for addr in ["not-an-address", ":8080", "localhost:", "localhost:99999", "::1:8080"] {
            config.listener.bind_address = addr.into();
            assert!(validate_config(&config).is_err(), "{addr} should be rejected");
        }
    }

    #[test]
    fn database_settings_ignored_for_memory_backend() {
        let mut config = ServiceConfig::default();
        config.storage.backend = StorageBackend::Memory;
        config.database.host.clear();
        config.database.port = 0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn rejects_wildcard_origin_with_credentials() {
        let mut config = ServiceConfig::default();
        config.cors.allowed_origins = vec!["*".into()];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "cors.allowed_origins");

        config.cors.allow_credentials = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn base_path_shape() {
        let mut config = ServiceConfig::default();
        config.listener.base_path = "/api".into();
        assert!(validate_config(&config).is_ok());

        config.listener.base_path = "api/".into();
        assert!(validate_config(&config).is_err());

        // The root is spelled as the empty string.
        config.listener.base_path = "/".into();
        assert!(validate_config(&config).is_err());
    }
}
