//! Configuration schema definitions.
//!
//! Two views of the same TOML document are kept:
//! - typed sections (`[helper]`, `[relay]`, `[docs]`) deserialized with serde
//! - a flat [`Configuration`] map of colon-separated keys that service
//!   clients resolve their base URLs from (`[Orders] BaseUrl = ".."` becomes
//!   `Orders:BaseUrl`)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Separator between nested key segments.
pub const KEY_SEPARATOR: &str = ":";

/// Root of the typed configuration sections.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Outbound helper settings.
    pub helper: HelperSettings,

    /// Relay service settings.
    pub relay: RelayConfig,

    /// Documentation visibility settings.
    pub docs: DocsConfig,
}

/// Settings for the outbound HTTP helper.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HelperSettings {
    /// Name used as the namespace in call-sequence entries.
    pub application_name: String,

    /// User-Agent sent on every outbound call.
    pub user_agent: String,

    /// TCP connect timeout in milliseconds.
    pub connect_timeout_ms: u64,

    /// How long idle pooled connections are kept, in seconds.
    pub pool_idle_timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for HelperSettings {
    fn default() -> Self {
        Self {
            application_name: env!("CARGO_PKG_NAME").to_string(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout_ms: 5_000,
            pool_idle_timeout_secs: 90,
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Relay service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Configuration key holding the downstream scheme and host.
    pub downstream_key: String,

    /// Inbound request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            downstream_key: "Relay:BaseUrl".to_string(),
            request_timeout_secs: 130,
        }
    }
}

/// Documentation visibility configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Cookie that reveals hidden routes.
    pub cookie_name: String,

    /// Value the cookie must carry.
    pub password: String,

    /// Route paths hidden from the documentation listing.
    pub hidden_routes: Vec<String>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            cookie_name: "swagger-show".to_string(),
            // WARNING: placeholder, override in any shared deployment.
            password: "password".to_string(),
            hidden_routes: Vec::new(),
        }
    }
}

/// Flat key/value view of the configuration.
///
/// Lookups are case-insensitive so file keys (`Orders:BaseUrl`) and
/// environment overrides (`SVC_ORDERS__BASEURL`) address the same entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    values: BTreeMap<String, String>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten a parsed TOML document.
    ///
    /// Nested tables join with `:`, array elements are addressed by index
    /// and non-string scalars are stored in their TOML text form.
    pub fn from_toml(document: &toml::Value) -> Self {
        let mut config = Self::new();
        flatten("", document, &mut config);
        config
    }

    /// Build from explicit key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = Self::new();
        for (key, value) in pairs {
            config.insert(key.as_ref(), value);
        }
        config
    }

    /// Overlay environment variables starting with `prefix`.
    ///
    /// `__` in the remainder of the name maps to the `:` separator, so
    /// `SVC_Orders__BaseUrl` overrides `Orders:BaseUrl`. Returns the number
    /// of keys applied.
    pub fn apply_env<I>(&mut self, prefix: &str, vars: I) -> usize
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut applied = 0;
        for (name, value) in vars {
            let Some(rest) = name.strip_prefix(prefix) else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }
            let key = rest.replace("__", KEY_SEPARATOR);
            tracing::debug!(key = %key, "Configuration value overridden from environment");
            self.insert(&key, value);
            applied += 1;
        }
        applied
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_ascii_lowercase(), value.into());
    }

    /// Look up a value by its colon-separated key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&key.to_ascii_lowercase()).map(String::as_str)
    }

    /// Iterate over all entries; keys are normalized to lowercase.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn flatten(prefix: &str, value: &toml::Value, out: &mut Configuration) {
    let child_key = |segment: &str| {
        if prefix.is_empty() {
            segment.to_string()
        } else {
            format!("{}{}{}", prefix, KEY_SEPARATOR, segment)
        }
    };

    match value {
        toml::Value::Table(table) => {
            for (key, nested) in table {
                flatten(&child_key(key), nested, out);
            }
        }
        toml::Value::Array(items) => {
            for (i, nested) in items.iter().enumerate() {
                flatten(&child_key(&i.to_string()), nested, out);
            }
        }
        toml::Value::String(s) => out.insert(prefix, s.clone()),
        other => out.insert(prefix, other.to_string()),
    }
}
