//! Service relay.
//!
//! A small service that forwards `GET /relay/{*path}` to the downstream
//! configured under `Relay:BaseUrl`, tagging each call with the `g-callsec`
//! call sequence.
//!
//! ```text
//!   client ──▶ relay A ──g-callsec: A:/relay/x──▶ relay B ──g-callsec: A:/relay/x;B:/relay/x──▶ backend
//! ```
//!
//! Configuration is read from the file named by `SERVICE_RELAY_CONFIG`
//! (default `relay.toml`); defaults apply when the file does not exist.

use std::path::PathBuf;

use tokio::net::TcpListener;

use service_http::config::watcher::ConfigWatcher;
use service_http::config::{load_config, LoadedConfig, SharedConfiguration};
use service_http::http::HttpServer;
use service_http::observability::{logging, metrics};
use service_http::register_http_helper;

const CONFIG_ENV: &str = "SERVICE_RELAY_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "relay.toml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = PathBuf::from(
        std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string()),
    );

    let loaded = if config_path.exists() {
        Some(load_config(&config_path)?)
    } else {
        None
    };
    let LoadedConfig { app, values } = loaded.clone().unwrap_or_default();

    logging::init_logging(&app.helper.log_level);
    tracing::info!("service-relay v{} starting", env!("CARGO_PKG_VERSION"));
    if loaded.is_none() {
        tracing::warn!(path = %config_path.display(), "Config file not found, using defaults");
    }

    tracing::info!(
        bind_address = %app.relay.bind_address,
        application = %app.helper.application_name,
        downstream_key = %app.relay.downstream_key,
        "Configuration loaded"
    );

    if app.helper.metrics_enabled {
        match app.helper.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %app.helper.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shared = SharedConfiguration::new(values);
    let _watcher = if loaded.is_some() {
        match ConfigWatcher::new(&config_path, shared.clone()).run() {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                tracing::warn!(error = %e, "Config hot reload unavailable");
                None
            }
        }
    } else {
        None
    };

    let helper = register_http_helper(&app.helper, shared)?;

    let listener = TcpListener::bind(&app.relay.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(app, &helper);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
