use crate::config::{Backend, Config};
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::*;

#[derive(Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Print the effective configuration, environment overrides included
    Show,
    /// Print the path of the config file
    Path,
    /// Write the effective configuration to the config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

pub async fn config_command(cmd: ConfigCommands) -> Result<()> {
    match cmd.command {
        ConfigSubcommands::Show => show_config(),
        ConfigSubcommands::Path => {
            println!("{}", Config::get_config_path()?.display());
            Ok(())
        }
        ConfigSubcommands::Init { force } => init_config(force),
    }
}

fn init_config(force: bool) -> Result<()> {
    let path = Config::get_config_path()?;
    if path.exists() && !force {
        anyhow::bail!(
            "Config file {} already exists, pass --force to overwrite it",
            path.display()
        );
    }

    Config::load()?.save()?;
    println!("{} Wrote {}", "✓".bright_green().bold(), path.display());
    Ok(())
}

fn show_config() -> Result<()> {
    let config = Config::load()?;

    let store = match config.backend {
        Backend::Sqlite => config.database_path()?,
        Backend::Document => config.documents_path()?,
    };

    println!("  {}", "Configuration:".bright_white().bold());
    println!(
        "  {} {}",
        "Backend:".bright_white(),
        config.backend.to_string().bright_green().bold()
    );
    println!("  {} {}", "Store:".bright_white(), store.display());
    println!("  {} {}", "Bind:".bright_white(), config.server.bind);
    println!("  {} {}", "Datasource:".bright_white(), config.datasource.base_url);
    println!();

    let toml = toml::to_string_pretty(&config).context("Failed to serialize config to TOML")?;
    println!("{}", toml.dimmed());
    Ok(())
}
