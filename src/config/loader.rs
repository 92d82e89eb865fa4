//! Configuration loading from disk.

use std::ffi::OsString;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{AppConfig, Configuration};
use crate::config::validation::{validate_config, warn_invalid_base_urls, ValidationError};

/// Prefix of environment variables that override file values.
pub const DEFAULT_ENV_PREFIX: &str = "SVC_";

/// Error type for configuration loading.
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

/// A loaded configuration: typed sections plus the flat key view.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub app: AppConfig,
    pub values: Configuration,
}

/// Load and validate configuration from a TOML file, applying
/// `SVC_`-prefixed environment overrides.
pub fn load_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let loaded = parse_config(&content, DEFAULT_ENV_PREFIX, utf8_vars(std::env::vars_os()))?;

    tracing::info!(
        path = %path.display(),
        keys = loaded.values.len(),
        application = %loaded.app.helper.application_name,
        "Configuration loaded"
    );
    Ok(loaded)
}

/// Keep only environment entries whose name and value are valid UTF-8.
fn utf8_vars<I>(vars: I) -> impl Iterator<Item = (String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter().filter_map(|(key, value)| {
        match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (key, _) => {
                tracing::debug!(
                    key = %key.unwrap_or_else(|k| k.to_string_lossy().into_owned()),
                    "Skipping non-UTF-8 environment variable"
                );
                None
            }
        }
    })
}

/// Parse and validate configuration text with an explicit environment.
pub fn parse_config<I>(content: &str, env_prefix: &str, vars: I) -> Result<LoadedConfig, ConfigError>
where
    I: IntoIterator<Item = (String, String)>,
{
    let document: toml::Value = content.parse()?;
    let app: AppConfig = document.clone().try_into()?;

    validate_config(&app).map_err(ConfigError::Validation)?;

    let mut values = Configuration::from_toml(&document);
    values.apply_env(env_prefix, vars);
    warn_invalid_base_urls(&values);

    Ok(LoadedConfig { app, values })
}
