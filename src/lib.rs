//! Service-to-service HTTP helper with call-sequence tracing.

pub mod callseq;
pub mod client;
pub mod config;
pub mod docs;
pub mod error;
pub mod http;
pub mod identity;
pub mod observability;
pub mod registration;

pub use callseq::{CallSequence, CallSequenceEntry, CALL_SEQUENCE_HEADER};
pub use client::{Auth, CallOptions, ServiceClient};
pub use error::{HttpError, HttpResult};
pub use http::RequestContext;
pub use identity::AppIdentity;
pub use registration::{register_http_helper, HttpHelper};
