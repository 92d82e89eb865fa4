//! Inbound request context.
//!
//! # Responsibilities
//! - Carry the inbound headers and route path an outbound call is made on behalf of
//! - Represent non-request contexts (scheduled jobs, startup tasks)
//! - Extract itself from an axum request
//!
//! # Design Decisions
//! - Passed explicitly to every outbound call, never read from ambient state
//! - Immutable once built; cloned into concurrent fan-out calls
//! - Route path is the concrete request path, not the route template

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::callseq::CALL_SEQUENCE_HEADER;

/// Snapshot of the inbound request an outbound call is made for.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    headers: HeaderMap,
    route_path: Option<String>,
}

impl RequestContext {
    /// Context for an inbound HTTP request.
    pub fn new(headers: HeaderMap, route_path: impl Into<String>) -> Self {
        Self {
            headers,
            route_path: Some(route_path.into()),
        }
    }

    /// Context for work that is not serving a request (background jobs).
    ///
    /// Outbound calls made from it fall back to the caller name as the route.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn route_path(&self) -> Option<&str> {
        self.route_path.as_deref()
    }

    /// All inbound call-sequence header values that are valid visible ASCII.
    pub fn call_sequence_values(&self) -> impl Iterator<Item = &str> {
        self.headers
            .get_all(CALL_SEQUENCE_HEADER)
            .iter()
            .filter_map(|value| match value.to_str() {
                Ok(s) => Some(s),
                Err(_) => {
                    tracing::debug!("Ignoring non-ASCII call sequence header value");
                    None
                }
            })
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::new(parts.headers.clone(), parts.uri.path()))
    }
}
