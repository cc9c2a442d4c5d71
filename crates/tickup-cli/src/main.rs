use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tickup_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "tickup")]
#[command(author, version, about = "Smoothly animates numeric counters from stdin targets")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Frame rate override in frames per second
    #[arg(long)]
    fps: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read target values from stdin and print the animated display value
    Run {
        /// Frame rate in frames per second
        #[arg(long)]
        fps: Option<u32>,
    },
    /// Print the configuration file path
    ConfigPath,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Some(Commands::Run { fps }) => commands::run::run(config, fps.or(cli.fps)).await,
        None => commands::run::run(config, cli.fps).await,
        Some(Commands::ConfigPath) => {
            println!("{}", AppConfig::config_path().display());
            Ok(())
        }
    }
}
