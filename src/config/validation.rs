//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation of the typed sections (serde handles syntactic)
//! - Flag configured base URLs that will not resolve to absolute URLs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - A bad base URL is only a warning here; the hard failure happens when
//!   a client resolves its key at call time

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{AppConfig, Configuration};

/// Suffix identifying keys that hold a service's scheme and host.
const BASE_URL_SUFFIX: &str = ":baseurl";

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("helper.application_name must not be empty")]
    EmptyApplicationName,

    #[error("helper.connect_timeout_ms must be greater than zero")]
    ZeroConnectTimeout,

    #[error("{field} is not a valid socket address: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("relay.downstream_key must not be empty")]
    EmptyDownstreamKey,

    #[error("docs.cookie_name must not be empty")]
    EmptyCookieName,
}

/// Validate the typed configuration sections.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.helper.application_name.trim().is_empty() {
        errors.push(ValidationError::EmptyApplicationName);
    }
    if config.helper.connect_timeout_ms == 0 {
        errors.push(ValidationError::ZeroConnectTimeout);
    }
    if config.helper.metrics_enabled && config.helper.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "helper.metrics_address",
            value: config.helper.metrics_address.clone(),
        });
    }
    if config.relay.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "relay.bind_address",
            value: config.relay.bind_address.clone(),
        });
    }
    if config.relay.downstream_key.trim().is_empty() {
        errors.push(ValidationError::EmptyDownstreamKey);
    }
    if config.docs.cookie_name.trim().is_empty() {
        errors.push(ValidationError::EmptyCookieName);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Return the `*:BaseUrl` keys whose value is not an absolute http(s) URL.
pub fn invalid_base_urls(values: &Configuration) -> Vec<String> {
    values
        .iter()
        .filter(|(key, _)| key.ends_with(BASE_URL_SUFFIX))
        .filter(|(_, value)| match url::Url::parse(value) {
            Ok(url) => !matches!(url.scheme(), "http" | "https") || !url.has_host(),
            Err(_) => true,
        })
        .map(|(key, _)| key.to_string())
        .collect()
}

/// Log a warning for every base URL that will fail at call time.
pub fn warn_invalid_base_urls(values: &Configuration) {
    for key in invalid_base_urls(values) {
        tracing::warn!(key = %key, "Configured base URL is not an absolute http(s) URL");
    }
}
