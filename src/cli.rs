//! Command-line interface for strictly_ludo.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Ludo - four-player Ludo room server
#[derive(Parser, Debug)]
#[command(name = "strictly_ludo")]
#[command(about = "Ludo rules engine with a polling REST interface", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
    },

    /// Poll a room and print every change
    Watch {
        /// Game server URL
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        server_url: String,

        /// Room to watch
        #[arg(short, long)]
        room: String,
    },
}
