//! Per-downstream-service dispatcher.
//!
//! A [`ServiceClient`] is bound to one configuration key naming its
//! downstream scheme and host (e.g. `"Inventory:BaseUrl"`). Every call it
//! makes resolves that key from the current configuration snapshot, tags
//! the request with the call sequence and hands it to the executor.

use std::sync::Arc;
use std::time::Instant;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::callseq::tag_headers;
use crate::client::executor::{JsonExecutor, OutboundRequest};
use crate::client::options::CallOptions;
use crate::client::url::build_url;
use crate::config::SharedConfiguration;
use crate::error::{HttpError, HttpResult};
use crate::http::RequestContext;
use crate::identity::AppIdentity;
use crate::observability::metrics;

/// Client for one downstream service.
#[derive(Clone)]
pub struct ServiceClient {
    base_url_key: String,
    config: SharedConfiguration,
    executor: Arc<dyn JsonExecutor>,
    identity: AppIdentity,
}

impl ServiceClient {
    pub fn new(
        base_url_key: impl Into<String>,
        config: SharedConfiguration,
        executor: Arc<dyn JsonExecutor>,
        identity: AppIdentity,
    ) -> Self {
        Self {
            base_url_key: base_url_key.into(),
            config,
            executor,
            identity,
        }
    }

    pub fn base_url_key(&self) -> &str {
        &self.base_url_key
    }

    pub fn identity(&self) -> &AppIdentity {
        &self.identity
    }

    /// Resolve `path` against the configured scheme and host.
    pub fn build_url(&self, path: &str) -> HttpResult<String> {
        if self.base_url_key.trim().is_empty() {
            return Err(HttpError::Configuration(
                "scheme and host configuration key is empty".to_string(),
            ));
        }

        let scheme_and_host = self
            .config
            .get(&self.base_url_key)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                HttpError::Configuration(format!(
                    "scheme and host is empty for key = {}",
                    self.base_url_key
                ))
            })?;

        Ok(build_url(scheme_and_host.trim(), path))
    }

    /// GET `path` and deserialize the JSON response.
    pub async fn execute_get<T>(
        &self,
        ctx: &RequestContext,
        path: &str,
        query: &[(&str, &str)],
        caller: &str,
        options: CallOptions,
    ) -> HttpResult<T>
    where
        T: DeserializeOwned,
    {
        let body = self.dispatch(ctx, Method::GET, path, query, None, caller, options).await?;
        deserialize_body(&body)
    }

    /// GET `path` and return the raw response body.
    pub async fn execute_get_string(
        &self,
        ctx: &RequestContext,
        path: &str,
        query: &[(&str, &str)],
        caller: &str,
        options: CallOptions,
    ) -> HttpResult<String> {
        self.dispatch(ctx, Method::GET, path, query, None, caller, options).await
    }

    /// POST `body` as JSON to `path` and deserialize the JSON response.
    pub async fn execute_post<B, T>(
        &self,
        ctx: &RequestContext,
        path: &str,
        body: &B,
        caller: &str,
        options: CallOptions,
    ) -> HttpResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_string(body)?;
        let response = self
            .dispatch(ctx, Method::POST, path, &[], Some(payload), caller, options)
            .await?;
        deserialize_body(&response)
    }

    /// POST `body` as JSON to `path` and return the raw response body.
    pub async fn execute_post_string<B>(
        &self,
        ctx: &RequestContext,
        path: &str,
        body: &B,
        caller: &str,
        options: CallOptions,
    ) -> HttpResult<String>
    where
        B: Serialize + ?Sized,
    {
        let payload = serde_json::to_string(body)?;
        self.dispatch(ctx, Method::POST, path, &[], Some(payload), caller, options)
            .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn dispatch(
        &self,
        ctx: &RequestContext,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<String>,
        caller: &str,
        options: CallOptions,
    ) -> HttpResult<String> {
        let start = Instant::now();

        let url = match self.build_url(path) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!(key = %self.base_url_key, caller = %caller, error = %e, "Cannot resolve downstream URL");
                metrics::record_outbound_call(&self.base_url_key, method.as_str(), Err(&e), start);
                return Err(e);
            }
        };

        let timeout = options.timeout_for(&method);
        let headers = tag_headers(ctx, &self.identity, caller, &options.headers);

        let request = OutboundRequest {
            method: method.clone(),
            url,
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            headers,
            auth: options.auth,
            timeout,
            body,
        };

        tracing::debug!(
            key = %self.base_url_key,
            method = %method,
            url = %request.url,
            caller = %caller,
            timeout_ms = timeout.as_millis() as u64,
            "Dispatching outbound call"
        );

        let result = self.executor.execute(request).await;
        metrics::record_outbound_call(&self.base_url_key, method.as_str(), result.as_ref().map(|_| ()), start);

        if let Err(e) = &result {
            tracing::warn!(
                key = %self.base_url_key,
                method = %method,
                caller = %caller,
                error = %e,
                "Outbound call failed"
            );
        }
        result
    }
}

/// Deserialize a JSON body; an empty body reads as `null`.
fn deserialize_body<T: DeserializeOwned>(body: &str) -> HttpResult<T> {
    let body = if body.trim().is_empty() { "null" } else { body };
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callseq::CALL_SEQUENCE_HEADER;
    use crate::config::Configuration;
    use async_trait::async_trait;
    use axum::http::{HeaderMap, HeaderValue};
    use serde::Deserialize;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records every request and answers with a canned body.
    struct RecordingExecutor {
        requests: Mutex<Vec<OutboundRequest>>,
        response: HttpResult<String>,
    }

    impl RecordingExecutor {
        fn answering(body: &str) -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
                response: Ok(body.to_string()),
            })
        }

        fn last(&self) -> OutboundRequest {
            self.requests.lock().unwrap().last().cloned().expect("no request recorded")
        }

        fn count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl JsonExecutor for RecordingExecutor {
        async fn execute(&self, request: OutboundRequest) -> HttpResult<String> {
            self.requests.lock().unwrap().push(request);
            match &self.response {
                Ok(body) => Ok(body.clone()),
                Err(_) => Err(HttpError::Status { status: 502, body: "bad gateway".into() }),
            }
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: u32,
    }

    fn client(executor: Arc<RecordingExecutor>) -> ServiceClient {
        let config = Configuration::from_pairs([("Inventory:BaseUrl", "https://inventory.internal/")]);
        ServiceClient::new(
            "Inventory:BaseUrl",
            SharedConfiguration::new(config),
            executor,
            AppIdentity::new("Orders"),
        )
    }

    fn inbound(callsec: &'static str, path: &str) -> RequestContext {
        let mut headers = HeaderMap::new();
        headers.insert(CALL_SEQUENCE_HEADER, HeaderValue::from_static(callsec));
        RequestContext::new(headers, path)
    }

    fn callsec_of(request: &OutboundRequest) -> Vec<&str> {
        request
            .headers
            .iter()
            .filter(|(name, _)| name == CALL_SEQUENCE_HEADER)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    #[test]
    fn test_build_url() {
        let client = client(RecordingExecutor::answering(""));
        assert_eq!(
            client.build_url("/v1/items").unwrap(),
            "https://inventory.internal/v1/items"
        );
    }

    #[test]
    fn test_build_url_missing_key() {
        let client = ServiceClient::new(
            "Missing:BaseUrl",
            SharedConfiguration::default(),
            RecordingExecutor::answering(""),
            AppIdentity::new("Orders"),
        );
        let err = client.build_url("/v1/items").unwrap_err();
        assert!(matches!(err, HttpError::Configuration(_)));
    }

    #[test]
    fn test_build_url_empty_value_or_key() {
        let config = SharedConfiguration::new(Configuration::from_pairs([("Blank:BaseUrl", "  ")]));
        let blank = ServiceClient::new("Blank:BaseUrl", config.clone(), RecordingExecutor::answering(""), AppIdentity::new("A"));
        assert!(matches!(blank.build_url("/"), Err(HttpError::Configuration(_))));

        let no_key = ServiceClient::new("", config, RecordingExecutor::answering(""), AppIdentity::new("A"));
        assert!(matches!(no_key.build_url("/"), Err(HttpError::Configuration(_))));
    }

    #[test]
    fn test_build_url_follows_reload() {
        let config = SharedConfiguration::new(Configuration::from_pairs([("Svc:BaseUrl", "http://old")]));
        let client = ServiceClient::new("Svc:BaseUrl", config.clone(), RecordingExecutor::answering(""), AppIdentity::new("A"));

        config.replace(Configuration::from_pairs([("Svc:BaseUrl", "http://new")]));
        assert_eq!(client.build_url("x").unwrap(), "http://new/x");
    }

    #[tokio::test]
    async fn test_get_deserializes_and_tags() {
        let executor = RecordingExecutor::answering(r#"{"id":42}"#);
        let client = client(executor.clone());
        let ctx = inbound("Front:/checkout", "/orders/42");

        let item: Item = client
            .execute_get(&ctx, "/items/42", &[("expand", "true"), ("tag", "a"), ("tag", "b")], "GetItem", CallOptions::new())
            .await
            .unwrap();

        assert_eq!(item, Item { id: 42 });
        let request = executor.last();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.url, "https://inventory.internal/items/42");
        assert_eq!(request.query.len(), 3);
        assert_eq!(request.timeout, Duration::from_millis(12_000));
        assert_eq!(callsec_of(&request), vec!["Front:/checkout;Orders:/orders/42"]);
    }

    #[tokio::test]
    async fn test_string_variants_carry_call_sequence() {
        let executor = RecordingExecutor::answering("plain text");
        let client = client(executor.clone());
        let ctx = RequestContext::background();

        let body = client
            .execute_get_string(&ctx, "/status", &[], "Heartbeat", CallOptions::new())
            .await
            .unwrap();
        assert_eq!(body, "plain text");
        assert_eq!(callsec_of(&executor.last()), vec!["Orders:Heartbeat"]);

        let body = client
            .execute_post_string(&ctx, "/notes", &serde_json::json!({"n": 1}), "Note", CallOptions::new())
            .await
            .unwrap();
        assert_eq!(body, "plain text");
        assert_eq!(callsec_of(&executor.last()), vec!["Orders:Note"]);
    }

    #[tokio::test]
    async fn test_post_serializes_body_with_default_timeout() {
        #[derive(Serialize)]
        struct Reserve<'a> {
            sku: &'a str,
            qty: u32,
        }

        let executor = RecordingExecutor::answering(r#"{"id":7}"#);
        let client = client(executor.clone());
        let options = CallOptions::new()
            .with_auth(crate::client::Auth::bearer("t"))
            .with_header("x-tenant", "acme");

        let item: Item = client
            .execute_post(&RequestContext::background(), "reservations", &Reserve { sku: "A-1", qty: 2 }, "Reserve", options)
            .await
            .unwrap();

        assert_eq!(item.id, 7);
        let request = executor.last();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.body.as_deref(), Some(r#"{"sku":"A-1","qty":2}"#));
        assert_eq!(request.timeout, Duration::from_millis(120_000));
        assert!(request.auth.is_some());
        assert_eq!(request.headers[0], ("x-tenant".to_string(), "acme".to_string()));
    }

    #[tokio::test]
    async fn test_configuration_error_skips_executor() {
        let executor = RecordingExecutor::answering("{}");
        let client = ServiceClient::new(
            "Missing:BaseUrl",
            SharedConfiguration::default(),
            executor.clone(),
            AppIdentity::new("Orders"),
        );

        let err = client
            .execute_get::<serde_json::Value>(&RequestContext::background(), "/x", &[], "X", CallOptions::new())
            .await
            .unwrap_err();

        assert!(matches!(err, HttpError::Configuration(_)));
        assert_eq!(executor.count(), 0);
    }

    #[tokio::test]
    async fn test_bad_response_body_is_serialization_error() {
        let executor = RecordingExecutor::answering("<html>oops</html>");
        let client = client(executor);

        let err = client
            .execute_get::<Item>(&RequestContext::background(), "/items/1", &[], "GetItem", CallOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_empty_body_reads_as_null() {
        let executor = RecordingExecutor::answering("");
        let client = client(executor);

        let value: Option<Item> = client
            .execute_get(&RequestContext::background(), "/items/none", &[], "GetItem", CallOptions::new())
            .await
            .unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_executor_errors_propagate_unchanged() {
        let executor = Arc::new(RecordingExecutor {
            requests: Mutex::new(Vec::new()),
            response: Err(HttpError::Transport("unused".into())),
        });
        let client = client(executor);

        let err = client
            .execute_get_string(&RequestContext::background(), "/", &[], "Root", CallOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::Status { status: 502, .. }));
    }
}
