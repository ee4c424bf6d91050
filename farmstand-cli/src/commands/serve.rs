//! HTTP server command

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use farmstand_server::db::DEFAULT_MAX_CONNECTIONS;
use farmstand_server::{run_server, Marketplace, MemoryStore, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "FARMSTAND_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Keep everything in memory instead of PostgreSQL (lost on exit)
    #[arg(long)]
    pub memory: bool,

    /// Maximum database connections
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
}

/// Run the HTTP server until Ctrl+C/SIGTERM
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let market = if args.memory {
        tracing::warn!("Using in-memory store - data is lost on exit");
        Marketplace::new(Arc::new(MemoryStore::new()))
    } else {
        super::connect(args.database_url, args.max_connections).await?
    };

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    tracing::info!("Starting farmstand server on {}", config.bind_addr);

    run_server(market, config).await.context("Server error")?;

    Ok(())
}
