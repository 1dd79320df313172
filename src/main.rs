mod cli;
mod config;
mod db;
mod error;
mod routes;
mod seed;

use anyhow::{Context, Result};
use axum::serve;
use clap::Parser;
use cli::{Cli, Command};
use config::Config;
use db::{client::StoreClient, gateway::Gateway};
use seed::seed_bookmarks;
use std::{future::pending, net::SocketAddr};
use tokio::{main, net::TcpListener, signal::ctrl_c};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))).init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    let gateway = Gateway::connect(StoreClient::new(config.mongodb_uri.clone()), &config.database).await?;

    let result = match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => run_server(gateway.clone(), config.listen_address).await,
        Command::Seed { file, collection } => seed_bookmarks(&gateway, &collection, &file).await.map(|_| ()),
    };

    gateway.close().await;

    result
}

async fn run_server(gateway: Gateway, listen_address: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(listen_address).await.with_context(|| format!("Could not bind to {listen_address}"))?;
    info!("Server listening on {listen_address}");

    serve(listener, routes::router(gateway)).with_graceful_shutdown(shutdown_signal()).await?;

    Ok(())
}

async fn shutdown_signal() {
    match ctrl_c().await {
        Ok(()) => info!("Shutting down"),
        Err(error) => {
            error!("Could not listen for the shutdown signal: {error}");
            pending::<()>().await;
        },
    }
}
