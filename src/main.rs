use anyhow::Result;
use clap::Parser;
use log::{debug, info};

use machine_api::cli::commands::{config_command, machine_command, serve_command};
use machine_api::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    if let Ok(path) = dotenv {
        debug!("Loaded environment from {}", path.display());
    }

    let cli = Cli::parse();
    info!("Starting machine-api");

    let result = match cli.command {
        Commands::Serve(args) => serve_command(args).await,
        Commands::Machine(cmd) => machine_command(cmd).await,
        Commands::Config(cmd) => config_command(cmd).await,
    };

    debug!("Command finished: {}", if result.is_ok() { "ok" } else { "error" });
    result
}
