//! WHOIS lookup subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → handler.rs (preflight branch, orchestration)
//!     → query.rs (extract & validate domain / format)
//!     → client.rs (one upstream GET, then body read)
//!     → handler.rs (pretty JSON or raw XML passthrough)
//!     → error.rs (any failure → {code, msg, timestamp})
//! ```
//!
//! # Design Decisions
//! - Stateless: nothing survives a request except the immutable config
//! - Single upstream attempt, no retries
//! - Upstream access goes through `UpstreamClient` so tests can swap it

pub mod client;
pub mod error;
pub mod handler;
pub mod query;

pub use client::{FetchError, HttpUpstream, UpstreamClient, UpstreamResponse};
pub use error::{ErrorBody, LookupError};
pub use handler::{handle, LookupService};
pub use query::{DomainName, LookupQuery, OutputFormat};
