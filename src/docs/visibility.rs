//! Cookie-gated visibility of hidden routes.

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    extract::{MatchedPath, Request, State},
    http::{header::COOKIE, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::config::DocsConfig;

pub const DEFAULT_COOKIE_NAME: &str = "swagger-show";
pub const DEFAULT_PASSWORD: &str = "password";

/// Which routes are hidden and what reveals them.
#[derive(Debug, Clone)]
pub struct DocsVisibility {
    cookie_name: String,
    password: String,
    hidden: BTreeSet<String>,
}

impl DocsVisibility {
    pub fn new(cookie_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
            password: password.into(),
            hidden: BTreeSet::new(),
        }
    }

    pub fn from_config(config: &DocsConfig) -> Self {
        config
            .hidden_routes
            .iter()
            .fold(Self::new(&config.cookie_name, &config.password), |v, route| v.hide(route))
    }

    /// Mark `route` (exact path or route template) as hidden.
    pub fn hide(mut self, route: impl Into<String>) -> Self {
        self.hidden.insert(route.into());
        self
    }

    pub fn is_hidden(&self, route: &str) -> bool {
        self.hidden.contains(route)
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// True when any `Cookie` header carries `<cookie_name>=<password>`.
    pub fn is_revealed(&self, headers: &HeaderMap) -> bool {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .any(|(name, value)| name.trim() == self.cookie_name && value.trim() == self.password)
    }

    /// Filter a documentation listing for the caller identified by `headers`.
    pub fn visible_routes<'a, I>(&self, routes: I, headers: &HeaderMap) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let revealed = self.is_revealed(headers);
        routes
            .into_iter()
            .filter(|route| revealed || !self.is_hidden(route))
            .collect()
    }
}

impl Default for DocsVisibility {
    fn default() -> Self {
        Self::new(DEFAULT_COOKIE_NAME, DEFAULT_PASSWORD)
    }
}

/// Middleware answering 404 on hidden routes unless the reveal cookie is present.
pub async fn hide_unless_revealed(
    State(visibility): State<Arc<DocsVisibility>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let hidden = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| visibility.is_hidden(matched.as_str()))
        .unwrap_or(false)
        || visibility.is_hidden(request.uri().path());

    if hidden && !visibility.is_revealed(request.headers()) {
        tracing::debug!(path = %request.uri().path(), "Hidden route requested without reveal cookie");
        return Err(StatusCode::NOT_FOUND);
    }

    Ok(next.run(request).await)
}
