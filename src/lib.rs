//! WHOIS edge function library.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod whois;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
