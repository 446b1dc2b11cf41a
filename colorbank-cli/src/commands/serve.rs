//! HTTP server command
//!
//! Runs the colorbank HTTP API until Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;

use colorbank_server::http::{run_server, ServerConfig};

use super::{open_store, StoreArgs};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "COLORBANK_BIND", default_value = "0.0.0.0:5000")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let service = args.store.service_config()?;

    tracing::info!("Starting colorbank server on {}", args.bind);
    let pool = open_store(&service).await?;

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    // Run server (blocks until shutdown)
    run_server(pool, service, config)
        .await
        .context("Server error")?;

    Ok(())
}
