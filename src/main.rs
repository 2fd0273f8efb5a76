//! Strictly Ludo - Unified CLI

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use strictly_ludo::{GameSession, LudoClient, RoomRegistry, ServerConfig};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = ServerConfig::load(cli.config.as_deref())?;
    initialize_tracing(&config);

    match cli.command {
        Command::Serve { port, host } => run_server(config.with_overrides(host, port)).await,
        Command::Watch { server_url, room } => run_watch(config, server_url, room).await,
    }
}

fn initialize_tracing(config: &ServerConfig) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Run the HTTP game server
#[instrument(skip(config), fields(host = %config.host(), port = config.port()))]
async fn run_server(config: ServerConfig) -> Result<()> {
    info!("Starting Strictly Ludo server");
    let rooms = RoomRegistry::new();
    strictly_ludo::serve(config.host(), *config.port(), rooms).await
}

/// Run the polling client
#[instrument(skip(config))]
async fn run_watch(config: ServerConfig, server_url: String, room: String) -> Result<()> {
    let client = LudoClient::new(server_url, room);
    let last = client
        .watch(config.poll_interval(), |session| {
            println!("{}", describe(session));
            true
        })
        .await?;
    if let Some(winner) = last.winner() {
        println!("Winner: {}", winner);
    }
    Ok(())
}

fn describe(session: &GameSession) -> String {
    let mut out = format!(
        "[{}] room {} status {} die {}",
        session.last_updated().format("%H:%M:%S"),
        session.id(),
        session.status(),
        session.dice_value().map_or(0, |d| d.get()),
    );
    for player in session.players() {
        let positions: Vec<String> = player
            .pieces()
            .iter()
            .map(|piece| piece.position().to_string())
            .collect();
        out.push_str(&format!(
            "\n  {}{} ({}): {}",
            if *player.is_active() { "*" } else { " " },
            player.name(),
            player.color(),
            positions.join(", ")
        ));
    }
    out
}
