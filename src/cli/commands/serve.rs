use crate::config::Config;
use crate::domain::DefaultMachineService;
use crate::gate::{self, AppState};
use anyhow::Result;
use clap::Args;
use colored::*;
use log::info;
use std::sync::Arc;

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on, overriding the configured one
    #[arg(short, long)]
    pub bind: Option<String>,
}

pub async fn serve_command(args: ServeArgs) -> Result<()> {
    let config = Config::load()?;
    let bind = args.bind.unwrap_or_else(|| config.server.bind.clone());

    let service = DefaultMachineService::new(config.build_repo().await?);
    let state = AppState::new(Arc::new(service), config.build_datasource()?);

    info!("Starting machine API with {} backend", config.backend);
    println!(
        "{} Serving machine API on {}",
        "▶".bright_cyan().bold(),
        format!("http://{}", bind).bright_green().bold()
    );

    gate::serve(state, &bind).await
}
