//! Upstream WHOIS client.
//!
//! # Responsibilities
//! - Compose the provider URL from config and validated parameters
//! - Issue exactly one GET per lookup
//! - Expose the status and body as two separate awaits, so a connection
//!   failure and a body failure are distinguishable
//!
//! # Design Decisions
//! - `UpstreamClient` is a trait so handlers can be driven by test doubles
//! - Production implementation wraps a shared `reqwest::Client` (pooled)

use axum::http::StatusCode;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::UpstreamConfig;
use crate::whois::query::{DomainName, OutputFormat};

/// Failure talking to the provider, before a usable body was obtained.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("{0}")]
    Transport(String),

    /// The response body could not be read.
    #[error("{0}")]
    Body(String),
}

/// A response whose body has not been read yet.
pub trait UpstreamResponse: Send {
    fn status(&self) -> StatusCode;

    /// Read the whole body as text.
    fn text(self) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Capability to send the single outbound lookup request.
pub trait UpstreamClient: Clone + Send + Sync + 'static {
    type Response: UpstreamResponse;

    fn send(&self, url: Url) -> impl Future<Output = Result<Self::Response, FetchError>> + Send;
}

/// Build `<base>?apiKey=..&domainName=..&outputFormat=..`.
///
/// Query pairs already present on `base` are kept ahead of the lookup
/// parameters.
pub fn lookup_url(
    base: &Url,
    api_key: &str,
    domain: &DomainName,
    format: OutputFormat,
) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut()
        .append_pair("apiKey", api_key)
        .append_pair("domainName", domain.as_str())
        .append_pair("outputFormat", format.as_str());
    url
}

/// `reqwest`-backed client used in production.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: reqwest::Client,
}

impl HttpUpstream {
    /// Create a client from the upstream configuration.
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl UpstreamClient for HttpUpstream {
    type Response = reqwest::Response;

    fn send(&self, url: Url) -> impl Future<Output = Result<Self::Response, FetchError>> + Send {
        let request = self.client.get(url);
        // Errors are stripped of their URL: it carries the API key.
        async move {
            request
                .send()
                .await
                .map_err(|e| FetchError::Transport(e.without_url().to_string()))
        }
    }
}

impl UpstreamResponse for reqwest::Response {
    fn status(&self) -> StatusCode {
        reqwest::Response::status(self)
    }

    fn text(self) -> impl Future<Output = Result<String, FetchError>> + Send {
        async move {
            reqwest::Response::text(self)
                .await
                .map_err(|e| FetchError::Body(e.without_url().to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://whois.example.net/WhoisService").unwrap()
    }

    #[test]
    fn test_lookup_url_carries_all_parameters() {
        let domain = DomainName::parse(Some("example.com")).unwrap();
        let url = lookup_url(&base(), "k3y", &domain, OutputFormat::Xml);

        assert_eq!(
            url.as_str(),
            "https://whois.example.net/WhoisService?apiKey=k3y&domainName=example.com&outputFormat=xml"
        );
    }

    #[test]
    fn test_lookup_url_keeps_base_query() {
        let base = Url::parse("https://whois.example.net/WhoisService?da=2&ip=1").unwrap();
        let domain = DomainName::parse(Some("example.com")).unwrap();
        let url = lookup_url(&base, "k3y", &domain, OutputFormat::Json);

        assert_eq!(
            url.as_str(),
            "https://whois.example.net/WhoisService?da=2&ip=1&apiKey=k3y&domainName=example.com&outputFormat=json"
        );
    }

    #[test]
    fn test_lookup_url_with_empty_key() {
        let domain = DomainName::parse(Some("example.com")).unwrap();
        let url = lookup_url(&base(), "", &domain, OutputFormat::Json);

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("apiKey".to_string(), String::new()),
                ("domainName".to_string(), "example.com".to_string()),
                ("outputFormat".to_string(), "json".to_string()),
            ]
        );
    }

    #[test]
    fn test_lookup_url_encodes_key() {
        let domain = DomainName::parse(Some("example.com")).unwrap();
        let url = lookup_url(&base(), "a&b=c", &domain, OutputFormat::Json);

        let key = url
            .query_pairs()
            .find(|(k, _)| k == "apiKey")
            .map(|(_, v)| v.into_owned());
        assert_eq!(key.as_deref(), Some("a&b=c"));
    }

    #[test]
    fn test_http_upstream_builds() {
        let mut config = UpstreamConfig::default();
        config.timeout_secs = Some(3);
        assert!(HttpUpstream::new(&config).is_ok());
    }
}
