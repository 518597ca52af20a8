//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router sending every method and path to the lookup handler
//! - Wire up middleware (request ID, tracing, CORS origin)
//! - Serve on a bound listener until shutdown is signalled

use axum::{
    body::Body,
    http::{header, HeaderValue, Request},
    routing::any,
    Router,
};
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::http::response::ALLOW_ORIGIN;
use crate::lifecycle::shutdown::ShutdownSignal;
use crate::whois::{handle, HttpUpstream, LookupService, UpstreamClient};

/// Errors raised while assembling or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid upstream URL: {0}")]
    UpstreamUrl(#[from] url::ParseError),

    #[error("failed to build upstream client: {0}")]
    UpstreamClient(#[from] reqwest::Error),

    #[error("server IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState<C> {
    pub lookup: LookupService<C>,
    /// Budget for one lookup; expiry is reported as an unexpected fault.
    pub request_timeout: Option<Duration>,
}

impl<C: UpstreamClient> AppState<C> {
    pub fn new(config: &ServiceConfig, client: C) -> Result<Self, ServerError> {
        Ok(Self {
            lookup: LookupService::new(&config.upstream, client)?,
            request_timeout: config.timeouts.request_secs.map(Duration::from_secs),
        })
    }
}

/// HTTP server for the WHOIS edge function.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a server talking to the configured provider over HTTP.
    pub fn new(config: ServiceConfig) -> Result<Self, ServerError> {
        let client = HttpUpstream::new(&config.upstream)?;
        Self::with_client(config, client)
    }

    /// Create a server using a caller-supplied upstream client.
    pub fn with_client<C: UpstreamClient>(config: ServiceConfig, client: C) -> Result<Self, ServerError> {
        let state = AppState::new(&config, client)?;
        let router = build_router(state);
        Ok(Self { router, config })
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.wait().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router<C: UpstreamClient>(state: AppState<C>) -> Router {
    Router::new()
        .route("/", any(handle::<C>))
        .route("/{*path}", any(handle::<C>))
        .with_state(state)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(ALLOW_ORIGIN),
        ))
        .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(&X_REQUEST_ID)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");
            tracing::info_span!(
                "request",
                request_id = %request_id,
                method = %request.method(),
                path = %request.uri().path()
            )
        }))
        .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
}
