//! Relay HTTP server.
//!
//! # Responsibilities
//! - Create Axum Router with the relay, call-sequence and docs handlers
//! - Wire up middleware (tracing, timeout, hidden-route gate)
//! - Forward relayed GETs to the configured downstream with `g-callsec` attached
//!
//! The relay is a small service built on the outbound helper; a chain of
//! relays pointing at each other shows the call sequence growing hop by hop.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{RawQuery, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::callseq::outbound_call_sequence;
use crate::client::{Auth, CallOptions, ServiceClient};
use crate::config::AppConfig;
use crate::docs::{hide_unless_revealed, DocsVisibility};
use crate::error::HttpError;
use crate::http::RequestContext;
use crate::registration::HttpHelper;

/// Route templates served by the relay, as listed by `/docs`.
pub const ROUTES: &[&str] = &["/relay/{*path}", "/callsec", "/docs"];

/// Prefix stripped from relayed paths before forwarding.
const RELAY_PREFIX: &str = "/relay/";

/// Diagnostic route hidden from the docs listing by default.
const CALLSEC_ROUTE: &str = "/callsec";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub downstream: ServiceClient,
    pub docs: Arc<DocsVisibility>,
}

/// HTTP server for the relay service.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig, helper: &HttpHelper) -> Self {
        let docs = Arc::new(DocsVisibility::from_config(&config.docs).hide(CALLSEC_ROUTE));
        let state = AppState {
            downstream: helper.client(config.relay.downstream_key.clone()),
            docs,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route("/relay/{*path}", get(relay_handler))
            .route(CALLSEC_ROUTE, get(callsec_handler))
            .route("/docs", get(docs_handler))
            .route_layer(middleware::from_fn_with_state(
                state.docs.clone(),
                hide_unless_revealed,
            ))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.relay.request_timeout_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            downstream_key = %self.config.relay.downstream_key,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Forward a GET to the downstream service, propagating the call sequence.
///
/// The path is forwarded still percent-encoded, so encoded `?`, `#` and `/`
/// reach the downstream as part of the path.
async fn relay_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
    RawQuery(query): RawQuery,
) -> Response {
    let path = relayed_path(&ctx);
    let target = match query {
        Some(q) if !q.is_empty() => format!("{}?{}", path, q),
        _ => path.to_string(),
    };

    let mut options = CallOptions::new();
    if let Some(auth) = forwarded_auth(ctx.headers()) {
        options = options.with_auth(auth);
    }

    match state
        .downstream
        .execute_get_string(&ctx, &target, &[], "Relay", options)
        .await
    {
        Ok(body) => (StatusCode::OK, body).into_response(),
        Err(e) => error_response(e),
    }
}

/// Report the call sequence this service would send downstream.
async fn callsec_handler(State(state): State<AppState>, ctx: RequestContext) -> Json<serde_json::Value> {
    let sequence = outbound_call_sequence(&ctx, state.downstream.identity(), "CallSequence");
    Json(serde_json::json!({
        "g-callsec": sequence.to_header_value(),
        "depth": sequence.len(),
    }))
}

/// List the routes visible to this caller.
async fn docs_handler(State(state): State<AppState>, headers: HeaderMap) -> Json<Vec<&'static str>> {
    Json(state.docs.visible_routes(ROUTES.iter().copied(), &headers))
}

/// Raw (undecoded) request path below the relay prefix.
fn relayed_path(ctx: &RequestContext) -> &str {
    ctx.route_path()
        .and_then(|path| path.strip_prefix(RELAY_PREFIX))
        .unwrap_or_default()
}

/// Pass the inbound `Authorization` header through unchanged.
fn forwarded_auth(headers: &HeaderMap) -> Option<Auth> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, parameter) = value.trim().split_once(' ')?;
    Some(Auth::Scheme {
        scheme: scheme.to_string(),
        parameter: parameter.trim().to_string(),
    })
}

fn error_response(err: HttpError) -> Response {
    match err {
        HttpError::Configuration(msg) => {
            tracing::error!(error = %msg, "Relay downstream is not configured");
            (StatusCode::INTERNAL_SERVER_ERROR, "Downstream not configured").into_response()
        }
        HttpError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "Downstream timed out").into_response(),
        HttpError::Status { status, body } => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            (status, body).into_response()
        }
        HttpError::Transport(_) | HttpError::Serialization(_) => {
            (StatusCode::BAD_GATEWAY, "Downstream request failed").into_response()
        }
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
