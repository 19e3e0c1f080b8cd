//! Notification relay CLI
//!
//! Queues notification records into a session store and replays event
//! streams through the delivery controller.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use notification_delivery::{NotificationsConfig, config};
use std::path::PathBuf;
use tracing::{Level, debug};

mod commands;

#[derive(Parser)]
#[command(name = "notification-relay")]
#[command(about = "Queue and replay toast notifications")]
#[command(version)]
struct Cli {
    /// Configuration file path (YAML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate notification records and queue them in a session store
    Enqueue {
        /// Session store directory
        #[arg(short, long)]
        store: PathBuf,

        /// File holding one record or a list of records, `-` for stdin
        input: PathBuf,
    },

    /// Mount a controller over a session store and feed it events
    Replay {
        /// Session store directory
        #[arg(short, long)]
        store: PathBuf,

        /// Newline-delimited `{"event", "payload"}` messages
        #[arg(short, long)]
        events: Option<PathBuf>,

        #[command(flatten)]
        user: commands::UserArgs,

        /// Print records as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the broadcast channel for a user
    Channel {
        #[command(flatten)]
        user: commands::UserArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    smol::block_on(async {
        let settings = match &cli.config {
            Some(path) => NotificationsConfig::from_file(path)
                .await
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
            None => NotificationsConfig::default(),
        };
        debug!("Using configuration: {:?}", settings);
        config::init(settings).context("Failed to install configuration")?;

        match cli.command {
            Commands::Enqueue { store, input } => commands::enqueue::run(&store, &input).await,
            Commands::Replay {
                store,
                events,
                user,
                json,
            } => commands::replay::run(&store, events.as_deref(), &user, json).await,
            Commands::Channel { user } => commands::channel::run(&user),
        }
    })
}
