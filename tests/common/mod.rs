//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    body::Bytes,
    http::{HeaderMap, Method, Uri},
    Json, Router,
};
use tokio::net::TcpListener;

use service_http::CALL_SEQUENCE_HEADER;

/// Serve `router` on an ephemeral local port and return its address.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    addr
}

/// Start a backend that echoes what it received as JSON:
/// method, path, query, every `g-callsec` header value and the body.
pub async fn start_echo_backend() -> SocketAddr {
    async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<serde_json::Value> {
        let callsec: Vec<String> = headers
            .get_all(CALL_SEQUENCE_HEADER)
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_owned))
            .collect();
        let authorization = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        Json(serde_json::json!({
            "method": method.as_str(),
            "path": uri.path(),
            "query": uri.query(),
            "callsec": callsec,
            "authorization": authorization,
            "body": String::from_utf8_lossy(&body),
        }))
    }

    serve(Router::new().fallback(echo)).await
}

/// Start a backend that answers every request after `delay`.
#[allow(dead_code)]
pub async fn start_slow_backend(delay: Duration) -> SocketAddr {
    serve(Router::new().fallback(move || async move {
        tokio::time::sleep(delay).await;
        "late"
    }))
    .await
}

/// Start a backend that always answers with `status` and `body`.
#[allow(dead_code)]
pub async fn start_failing_backend(status: u16, body: &'static str) -> SocketAddr {
    serve(Router::new().fallback(move || async move {
        (axum::http::StatusCode::from_u16(status).unwrap(), body)
    }))
    .await
}
