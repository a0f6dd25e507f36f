//! Command-line interface for strictly_chess_server.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Chess - authoritative two-player chess server
#[derive(Parser, Debug)]
#[command(name = "strictly_chess_server")]
#[command(about = "Authoritative chess server with WebSocket sessions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the WebSocket game server
    Serve {
        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
