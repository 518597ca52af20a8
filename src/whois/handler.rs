//! The request handler.
//!
//! Every inbound request ends here regardless of path. `OPTIONS` gets the
//! CORS preflight answer; everything else is treated as a lookup.

use axum::{
    extract::State,
    http::{Method, Uri},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use url::Url;

use crate::config::UpstreamConfig;
use crate::http::response;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::whois::client::{lookup_url, UpstreamClient, UpstreamResponse};
use crate::whois::error::LookupError;
use crate::whois::query::{LookupQuery, OutputFormat};

/// Performs lookups against the configured provider through `C`.
#[derive(Clone)]
pub struct LookupService<C> {
    client: C,
    base_url: Arc<Url>,
    api_key: Arc<str>,
}

impl<C: UpstreamClient> LookupService<C> {
    pub fn new(config: &UpstreamConfig, client: C) -> Result<Self, url::ParseError> {
        Ok(Self {
            client,
            base_url: Arc::new(Url::parse(&config.base_url)?),
            api_key: Arc::from(config.api_key.as_str()),
        })
    }

    /// Validate the query, call the provider once and shape the result.
    pub async fn lookup(&self, query: &LookupQuery) -> Result<Response, LookupError> {
        let (domain, format) = query.validate()?;

        tracing::debug!(domain = %domain, format = %format, "Querying WHOIS provider");

        let url = lookup_url(&self.base_url, &self.api_key, &domain, format);
        let upstream = self.client.send(url).await?;

        let status = upstream.status();
        if !status.is_success() {
            tracing::warn!(domain = %domain, status = %status, "WHOIS provider returned an error status");
            return Err(LookupError::Upstream);
        }

        let body = upstream.text().await?;
        let body = match format {
            OutputFormat::Json => {
                let value: serde_json::Value = serde_json::from_str(&body)?;
                serde_json::to_string_pretty(&value)?
            }
            OutputFormat::Xml => body,
        };

        tracing::info!(domain = %domain, format = %format, "WHOIS lookup succeeded");
        Ok(response::payload(format, body))
    }
}

/// Axum entry point for every method and path.
pub async fn handle<C: UpstreamClient>(
    State(state): State<AppState<C>>,
    method: Method,
    uri: Uri,
) -> Response {
    if method == Method::OPTIONS {
        return response::preflight();
    }

    let start_time = Instant::now();
    let query = LookupQuery::from_query(uri.query());

    tracing::debug!(method = %method, path = %uri.path(), "Lookup request received");

    let outcome = match state.request_timeout {
        Some(budget) => tokio::time::timeout(budget, state.lookup.lookup(&query))
            .await
            .unwrap_or_else(|_| Err(LookupError::Unexpected("request timed out".to_string()))),
        None => state.lookup.lookup(&query).await,
    };

    let response = match outcome {
        Ok(response) => response,
        Err(err) => {
            match &err {
                LookupError::Unexpected(detail) => {
                    tracing::error!(error = %detail, "WHOIS lookup failed unexpectedly");
                }
                other => tracing::warn!(reason = %other, "WHOIS lookup rejected"),
            }
            err.into_response()
        }
    };

    let format_label = OutputFormat::parse(query.format.as_deref())
        .map(OutputFormat::as_str)
        .unwrap_or("invalid");
    metrics::record_lookup(format_label, response.status().as_u16(), start_time);

    response
}
