//! Showreel CLI - Headless demo player shell
//!
//! Features:
//! - Catalog listing
//! - Headless playback against a simulated render component
//! - Scripted walkthrough of the session controller

use clap::{Parser, Subcommand};

mod commands;
mod output;
mod sim;

/// Showreel CLI - demo video player shell
#[derive(Parser)]
#[command(name = "showreel")]
#[command(version)]
#[command(about = "Demo video catalog player", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json, table)
    #[arg(short, long, default_value = "table")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the sample catalog
    List,

    /// Play a catalog item (by id) or a custom URL headlessly
    Play {
        /// Catalog item id, or a full video URL
        item: String,

        /// Simulated media seconds per wall-clock second
        #[arg(short, long, default_value = "60.0")]
        speed: f64,

        /// Seek once to this position (seconds) mid-play
        #[arg(long)]
        seek: Option<f64>,

        /// Start with autoplay off and resume explicitly
        #[arg(long)]
        paused: bool,
    },

    /// Run a scripted end-to-end exercise of the session controller
    Walkthrough,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(level)
        .init();

    match cli.command {
        Commands::List => {
            commands::list(&cli.format)?;
        }
        Commands::Play {
            item,
            speed,
            seek,
            paused,
        } => {
            commands::play(&item, speed, seek, paused).await?;
        }
        Commands::Walkthrough => {
            commands::walkthrough()?;
        }
    }

    Ok(())
}
