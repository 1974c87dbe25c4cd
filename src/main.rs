//! chain-router demo server.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────┐
//!                 │                    CHAIN ROUTER                       │
//!                 │                                                       │
//!   Request       │  ┌──────────┐   ┌─────────────┐   ┌──────────────┐   │
//!   ──────────────┼─▶│   http   │──▶│   routing   │──▶│   dispatch   │   │
//!                 │  │  server  │   │ route table │   │ global ++    │   │
//!                 │  └──────────┘   └─────────────┘   │ route chain  │   │
//!                 │        ▲                          └──────┬───────┘   │
//!   Response      │  ┌──────────┐                            │           │
//!   ◀─────────────┼──│ response │◀───────────────────────────┘           │
//!                 │  │ / file   │                                        │
//!                 │  └──────────┘                                        │
//!                 │                                                       │
//!                 │  config · observability · lifecycle                   │
//!                 └──────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use chain_router::app::demo_router;
use chain_router::config::{resolve_config, ConfigOverrides};
use chain_router::lifecycle::{signals, Shutdown};
use chain_router::observability::{logging, metrics};
use chain_router::HttpServer;

#[derive(Parser)]
#[command(name = "chain-router")]
#[command(about = "Demo server for the chain router", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override `observability.log_level`.
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        bind_address: cli.bind,
        log_level: cli.log_level,
    };
    let config = resolve_config(cli.config.as_deref(), overrides)?;

    logging::init(&config.observability)?;
    tracing::info!("chain-router v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        static_root = %config.static_files.root,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let dispatcher = demo_router(config.routing.clone())?;
    for (method, pattern) in dispatcher.routes().routes() {
        tracing::info!(method = %method, pattern, "Route");
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.signal();
    tokio::spawn(signals::forward_ctrl_c(shutdown.clone()));

    let server = HttpServer::new(config, dispatcher);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
