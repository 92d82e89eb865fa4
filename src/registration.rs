//! Wiring of the shared transport and executor.
//!
//! A host calls [`register_http_helper`] once at startup and hands the
//! resulting [`HttpHelper`] to every component that needs a
//! [`ServiceClient`]. All clients built from one helper share a single
//! pooled transport and one configuration handle.

use std::sync::Arc;

use crate::client::{JsonExecutor, ReqwestExecutor, ServiceClient};
use crate::config::{HelperSettings, SharedConfiguration};
use crate::error::HttpResult;
use crate::identity::AppIdentity;

/// Shared collaborators for outbound calls.
#[derive(Clone)]
pub struct HttpHelper {
    executor: Arc<dyn JsonExecutor>,
    config: SharedConfiguration,
    identity: AppIdentity,
}

impl HttpHelper {
    /// Assemble a helper from explicit parts, e.g. a test executor.
    pub fn from_parts(
        executor: Arc<dyn JsonExecutor>,
        config: SharedConfiguration,
        identity: AppIdentity,
    ) -> Self {
        Self {
            executor,
            config,
            identity,
        }
    }

    /// Client for the service whose scheme and host live under `base_url_key`.
    pub fn client(&self, base_url_key: impl Into<String>) -> ServiceClient {
        ServiceClient::new(
            base_url_key,
            self.config.clone(),
            self.executor.clone(),
            self.identity.clone(),
        )
    }

    pub fn executor(&self) -> Arc<dyn JsonExecutor> {
        self.executor.clone()
    }

    pub fn config(&self) -> &SharedConfiguration {
        &self.config
    }

    pub fn identity(&self) -> &AppIdentity {
        &self.identity
    }
}

/// Build the HTTP transport and JSON executor from `settings`.
pub fn register_http_helper(
    settings: &HelperSettings,
    config: SharedConfiguration,
) -> HttpResult<HttpHelper> {
    let executor = ReqwestExecutor::from_settings(settings)?;

    tracing::info!(
        application = %settings.application_name,
        connect_timeout_ms = settings.connect_timeout_ms,
        "HTTP helper registered"
    );

    Ok(HttpHelper::from_parts(
        Arc::new(executor),
        config,
        AppIdentity::new(&settings.application_name),
    ))
}
