//! The HTTP execution seam.
//!
//! # Responsibilities
//! - Define the request a dispatcher hands to the transport
//! - Perform the exchange and return the raw response body
//! - Map transport failures onto [`HttpError`]
//!
//! # Design Decisions
//! - The trait is object safe and body-agnostic; JSON (de)serialization
//!   happens in the dispatcher so the executor can be swapped in tests
//! - Non-success statuses are errors carrying the response body
//! - Timeout is per request, never a client-wide setting

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};

use crate::client::options::Auth;
use crate::config::HelperSettings;
use crate::error::{HttpError, HttpResult};

/// A fully resolved outbound call.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    /// Absolute URL without the query parameters.
    pub url: String,
    /// Query parameters in order; keys may repeat.
    pub query: Vec<(String, String)>,
    /// Headers in order; names may repeat.
    pub headers: Vec<(String, String)>,
    pub auth: Option<Auth>,
    pub timeout: Duration,
    /// Serialized JSON body, POST only.
    pub body: Option<String>,
}

/// Performs an outbound HTTP exchange.
#[async_trait]
pub trait JsonExecutor: Send + Sync {
    /// Execute `request` and return the response body on a 2xx status.
    async fn execute(&self, request: OutboundRequest) -> HttpResult<String>;
}

/// [`JsonExecutor`] backed by a shared, pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestExecutor {
    client: Client,
}

impl ReqwestExecutor {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build the underlying transport from helper settings.
    pub fn from_settings(settings: &HelperSettings) -> HttpResult<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .connect_timeout(Duration::from_millis(settings.connect_timeout_ms))
            .pool_idle_timeout(Duration::from_secs(settings.pool_idle_timeout_secs))
            .build()
            .map_err(|e| HttpError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::new(client))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl JsonExecutor for ReqwestExecutor {
    async fn execute(&self, request: OutboundRequest) -> HttpResult<String> {
        let start = Instant::now();
        let timeout_ms = request.timeout.as_millis() as u64;

        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .timeout(request.timeout);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match &request.auth {
            Some(Auth::Bearer(token)) => builder.bearer_auth(token),
            Some(Auth::Basic { user, password }) => builder.basic_auth(user, Some(password)),
            Some(Auth::Scheme { scheme, parameter }) => {
                builder.header(AUTHORIZATION, format!("{} {}", scheme, parameter))
            }
            None => builder,
        };
        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, timeout_ms))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| map_reqwest_error(e, timeout_ms))?;

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Outbound call completed"
        );

        if !status.is_success() {
            return Err(HttpError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }
}

fn map_reqwest_error(err: reqwest::Error, timeout_ms: u64) -> HttpError {
    if err.is_timeout() {
        HttpError::Timeout(timeout_ms)
    } else if err.is_decode() {
        HttpError::Serialization(err.to_string())
    } else {
        HttpError::Transport(err.to_string())
    }
}
