//! Per-call options: auth, extra headers, timeout.

use std::time::Duration;

use reqwest::Method;

/// Default timeout for GET calls.
pub const DEFAULT_GET_TIMEOUT_MS: u64 = 12_000;

/// Default timeout for POST calls.
pub const DEFAULT_POST_TIMEOUT_MS: u64 = 120_000;

/// Credential rendered into the `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    /// `Authorization: Bearer <token>`
    Bearer(String),
    /// `Authorization: Basic base64(user:password)`
    Basic { user: String, password: String },
    /// Any other scheme, sent as `<scheme> <parameter>`.
    Scheme { scheme: String, parameter: String },
}

impl Auth {
    pub fn bearer(token: impl Into<String>) -> Self {
        Auth::Bearer(token.into())
    }

    pub fn scheme_name(&self) -> &str {
        match self {
            Auth::Bearer(_) => "Bearer",
            Auth::Basic { .. } => "Basic",
            Auth::Scheme { scheme, .. } => scheme,
        }
    }
}

// Credentials stay out of logs.
impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Auth({}, <redacted>)", self.scheme_name())
    }
}

/// Optional arguments of an outbound call.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub auth: Option<Auth>,
    pub headers: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_auth(mut self, auth: Auth) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Add a header; repeated names are sent as separate header lines.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_timeout_ms(mut self, millis: u64) -> Self {
        self.timeout = Some(Duration::from_millis(millis));
        self
    }

    /// Timeout to apply, falling back to the default for `method`.
    pub fn timeout_for(&self, method: &Method) -> Duration {
        self.timeout.unwrap_or_else(|| {
            if method == Method::POST {
                Duration::from_millis(DEFAULT_POST_TIMEOUT_MS)
            } else {
                Duration::from_millis(DEFAULT_GET_TIMEOUT_MS)
            }
        })
    }
}
