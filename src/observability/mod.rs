//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! client and relay code produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (outbound call counters and latency histograms)
//!
//! Consumers:
//!     → stdout (fmt subscriber)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! Call-chain tracing itself lives in `callseq`.

pub mod logging;
pub mod metrics;
