//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handler and middleware produce:
//!     → logging.rs (structured log events, request-scoped spans)
//!     → metrics.rs (lookup counters and latency histogram)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through the tracing span of every request
//! - The provider API key is never recorded in logs or labels

pub mod logging;
pub mod metrics;
