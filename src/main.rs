//! URL-rewriting gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────┐
//!                       │                   GATEWAY                    │
//!                       │                                              │
//!   Client Request      │  ┌─────────┐   ┌──────────┐   ┌───────────┐ │
//!   ────────────────────┼─▶│  http   │──▶│ routing  │──▶│urltemplate│ │
//!                       │  │ server  │   │  tables  │   │  engine   │ │
//!                       │  └─────────┘   └────┬─────┘   └───────────┘ │
//!                       │                     │                        │
//!                       │                     ▼                        │
//!   Client Response     │  ┌─────────┐   ┌──────────┐                 │
//!   ◀───────────────────┼──│response │◀──│ upstream │◀────────────────┼── Backend
//!                       │  │rewrite  │   │  client  │                 │
//!                       │  └─────────┘   └──────────┘                 │
//!                       │                                              │
//!                       │  config (hot reload) · functions (hostmap)  │
//!                       │  observability · lifecycle                  │
//!                       └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use rewrite_gateway::config::loader::load_config;
use rewrite_gateway::config::watcher::ConfigWatcher;
use rewrite_gateway::lifecycle::{listen_for_signals, ShutdownCoordinator};
use rewrite_gateway::observability::{logging, metrics};
use rewrite_gateway::{GatewayConfig, GatewayServer, RuleRegistry, RuleTable};

#[derive(Parser, Debug)]
#[command(name = "rewrite-gateway", about = "URL-rewriting reverse proxy gateway")]
struct Args {
    /// Path to the gateway configuration file.
    #[arg(short, long, default_value = "gateway.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = if args.config.exists() {
        load_config(&args.config)?
    } else {
        GatewayConfig::default()
    };

    logging::init_logging(&config.observability.log_level);

    if !args.config.exists() {
        tracing::warn!(path = ?args.config, "Config file not found, starting with defaults");
    }
    tracing::info!(
        bind_address = %config.listener.bind_address,
        rules = config.rules.len(),
        responses = config.responses.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let registry = Arc::new(RuleRegistry::new(RuleTable::from_config(&config)));

    // Hot reload: the watcher revalidates the file and sends parsed configs;
    // each one is compiled into a fresh table and swapped in.
    let (watcher, mut updates) = ConfigWatcher::new(&args.config);
    let _watcher = watcher.run()?;
    let reload_registry = registry.clone();
    tokio::spawn(async move {
        while let Some(new_config) = updates.recv().await {
            let table = RuleTable::from_config(&new_config);
            tracing::info!(
                rules = table.inbound_len(),
                responses = table.outbound_len(),
                "Rule table swapped"
            );
            reload_registry.store(table);
            metrics::record_reload(true);
        }
    });

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let coordinator = ShutdownCoordinator::new();
    let shutdown = coordinator.subscribe();
    tokio::spawn(async move {
        listen_for_signals(&coordinator).await;
    });

    let server = GatewayServer::new(&config, registry);
    server.run(listener, shutdown).await?;

    tracing::info!("Gateway exited cleanly");
    Ok(())
}
