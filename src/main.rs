//! WHOIS edge function.
//!
//! Accepts `?domain=<host>&format=json|xml`, forwards one lookup to the
//! configured WHOIS provider and relays the answer with permissive CORS
//! headers.
//!
//! ```text
//!   Client ──▶ request id ─▶ trace ─▶ CORS ─▶ handler ──▶ Provider
//!   Client ◀── JSON / XML passthrough, or {code, msg, timestamp} ◀──┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use whois_edge::config::validation::validate_config;
use whois_edge::config::{load_config, ConfigError};
use whois_edge::lifecycle::startup;
use whois_edge::observability::logging;

#[derive(Parser)]
#[command(name = "whois-edge")]
#[command(about = "HTTP edge function relaying WHOIS lookups", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    logging::init_logging(&config.observability);

    tracing::info!("whois-edge v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        api_key_set = !config.upstream.api_key.is_empty(),
        request_timeout_secs = ?config.timeouts.request_secs,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
