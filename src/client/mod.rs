//! Outbound service-to-service calls.
//!
//! # Data Flow
//! ```text
//! caller (handler or background job)
//!     → service.rs (resolve "<Service>:BaseUrl", build URL, tag g-callsec)
//!     → executor.rs (JsonExecutor: reqwest exchange with per-call timeout)
//!     → response body → serde_json → caller
//! ```
//!
//! # Design Decisions
//! - One ServiceClient per downstream service, each with its own config key
//! - No retries, no caching; every error reaches the caller unchanged
//! - Connection pooling belongs to reqwest

pub mod executor;
pub mod options;
pub mod service;
pub mod url;

pub use executor::{JsonExecutor, OutboundRequest, ReqwestExecutor};
pub use options::{Auth, CallOptions, DEFAULT_GET_TIMEOUT_MS, DEFAULT_POST_TIMEOUT_MS};
pub use service::ServiceClient;
