//! Edge API gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌───────────────────────────────────────────────────────┐
//!                     │                     API GATEWAY                        │
//!                     │                                                        │
//!   Client Request    │  ┌──────────┐   ┌──────────┐   ┌────────────┐          │
//!   ──────────────────┼─▶│  http    │──▶│   auth   │──▶│  routing   │          │
//!                     │  │  server  │   │intercept │   │ classifier │          │
//!                     │  └──────────┘   └────┬─────┘   └─────┬──────┘          │
//!                     │                      │               │                 │
//!                     │                 identity RPC   ┌─────┴──────┐          │
//!                     │                      │         ▼            ▼          │
//!                     │                      │   ┌──────────┐ ┌──────────┐     │
//!                     │                      │   │transcoder│ │  proxy   │     │
//!                     │                      │   └────┬─────┘ └────┬─────┘     │
//!                     └──────────────────────┼────────┼────────────┼───────────┘
//!                                            ▼        ▼            ▼
//!                                      identity   RPC backends  HTTP backends
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use api_gateway::config::{load_config, ObservabilityConfig};
use api_gateway::lifecycle::{build_gateway, wait_for_termination, Shutdown};
use api_gateway::observability::{init_logging, init_metrics};
use clap::Parser;
use tokio::net::TcpListener;

#[derive(Parser, Debug)]
#[command(name = "api-gateway", version, about = "Edge API gateway")]
struct Cli {
    /// Optional TOML configuration file; defaults and environment apply without it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&ObservabilityConfig::default())?;
            tracing::error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    init_logging(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "api-gateway starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backends = config.backends.len(),
        routes = config.routes.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        init_metrics(addr)?;
    }

    let server = match build_gateway(&config).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            std::process::exit(1);
        }
    };

    let listener = match TcpListener::bind(&config.listener.bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(
                bind_address = %config.listener.bind_address,
                error = %e,
                "Failed to bind listener"
            );
            std::process::exit(1);
        }
    };

    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    tokio::spawn(async move {
        match wait_for_termination().await {
            Ok(()) => shutdown.trigger(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handlers");
                std::future::pending::<()>().await;
            }
        }
    });

    server.run(listener, signal).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
