//! Strictly Chess - WebSocket game server binary.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use strictly_chess_server::cli::{Cli, Command};
use strictly_chess_server::{GamesManager, ServerConfig, SessionHandler, ws};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("info,strictly_chess=debug,strictly_chess_server=debug")
            }),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port, host, config } => run_server(host, port, config).await,
    }
}

/// Run the WebSocket game server
#[instrument(skip_all)]
async fn run_server(host: Option<String>, port: Option<u16>, config: Option<PathBuf>) -> Result<()> {
    let config = ServerConfig::load(config.as_deref())?.with_overrides(host, port);

    let manager = GamesManager::new(config.manager_settings());
    let app = ws::router(SessionHandler::new(manager));

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!(host = %config.host(), port = config.port(), "Server ready at ws://{}:{}/chess/{{user_id}}", config.host(), config.port());

    axum::serve(listener, app).await?;
    Ok(())
}
