//! Inbound HTTP side.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → request.rs (RequestContext: headers + route path)
//!     → server.rs (relay handlers)
//!     → client::ServiceClient (outbound call tagged with g-callsec)
//! ```

pub mod request;
pub mod server;

pub use request::RequestContext;
pub use server::{AppState, HttpServer};
