use crate::config::Config;
use crate::contracts::{CreateMachineCommand, Machine, UpdateMachineCommand};
use crate::domain::{DefaultMachineService, MachineService};
use crate::maybe::lift;
use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use clap::{Args, Subcommand};
use colored::*;
use uuid::Uuid;

#[derive(Args)]
pub struct MachineCommands {
    #[command(subcommand)]
    pub command: MachineSubcommands,
}

#[derive(Subcommand)]
pub enum MachineSubcommands {
    /// List all machines
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show a single machine
    Get {
        /// Machine id (UUID)
        id: String,
    },
    /// Add a new machine
    Add {
        #[arg(long)]
        name: String,
        /// Manufacturing year, either `2029` or an RFC 3339 timestamp
        #[arg(long, value_parser = parse_year)]
        year: DateTime<Utc>,
        #[arg(long)]
        serial: String,
        #[arg(long)]
        manufacturer: String,
        #[arg(long)]
        fabric_serial: Option<String>,
        #[arg(long)]
        internal_series: Option<String>,
        #[arg(long)]
        place: Option<String>,
    },
    /// Change fields of an existing machine
    Update {
        /// Machine id (UUID)
        id: String,
        #[command(flatten)]
        fields: UpdateFields,
    },
}

/// Fields left out are not changed
#[derive(Args, Debug, Default)]
pub struct UpdateFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long, value_parser = parse_year)]
    pub year: Option<DateTime<Utc>>,
    #[arg(long)]
    pub serial: Option<String>,
    #[arg(long)]
    pub manufacturer: Option<String>,
    #[arg(long)]
    pub fabric_serial: Option<String>,
    #[arg(long)]
    pub internal_series: Option<String>,
    #[arg(long)]
    pub place: Option<String>,
}

impl UpdateFields {
    fn into_command(self, id: String) -> UpdateMachineCommand {
        UpdateMachineCommand {
            id,
            machine_name: lift(self.name),
            manufacturing_year: lift(self.year),
            serial_number: lift(self.serial),
            fabric_serial_number: lift(self.fabric_serial),
            internal_series_name: lift(self.internal_series),
            manufacturer_name: lift(self.manufacturer),
            place_of_manufacturing: lift(self.place),
        }
    }
}

fn parse_year(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    value
        .parse::<i32>()
        .ok()
        .and_then(|year| Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single())
        .ok_or_else(|| format!("'{}' is neither a year nor an RFC 3339 timestamp", value))
}

pub async fn machine_command(cmd: MachineCommands) -> Result<()> {
    let config = Config::load()?;
    let service = DefaultMachineService::new(config.build_repo().await?);

    match cmd.command {
        MachineSubcommands::List { json } => list_machines(&service, json).await,
        MachineSubcommands::Get { id } => get_machine(&service, &id).await,
        MachineSubcommands::Add {
            name,
            year,
            serial,
            manufacturer,
            fabric_serial,
            internal_series,
            place,
        } => {
            let create = CreateMachineCommand {
                machine_name: name,
                manufacturing_year: year,
                serial_number: serial,
                fabric_serial_number: fabric_serial,
                internal_series_name: internal_series,
                manufacturer_name: manufacturer,
                place_of_manufacturing: place,
            };
            let machine = service.add_machine(create).await?;
            println!(
                "{} Machine '{}' added with id {}",
                "✓".bright_green().bold(),
                machine.machine_name.bright_green().bold(),
                machine.id.bright_cyan()
            );
            Ok(())
        }
        MachineSubcommands::Update { id, fields } => {
            let updated = service.update_machine(fields.into_command(id.clone())).await?;
            updated.fold(
                || Err(anyhow::anyhow!("Machine '{}' not found", id)),
                |machine| {
                    println!(
                        "{} Machine '{}' updated",
                        "✓".bright_green().bold(),
                        machine.id.bright_green().bold()
                    );
                    print_machine(&machine);
                    Ok(())
                },
            )
        }
    }
}

async fn list_machines(service: &dyn MachineService, json: bool) -> Result<()> {
    let machines = service.get_machines().await?;

    if json {
        let output =
            serde_json::to_string_pretty(&machines).context("Failed to serialize machines")?;
        println!("{}", output);
        return Ok(());
    }

    if machines.is_empty() {
        println!("  {}", "⚠️  No machines stored".bright_yellow().bold());
        return Ok(());
    }

    println!("  {}", "Machines:".bright_white().bold());
    println!(
        "  {:<38} {:<24} {:<14} {}",
        "Id".dimmed(),
        "Name".dimmed(),
        "Serial".dimmed(),
        "Manufacturer".dimmed()
    );
    for machine in &machines {
        println!(
            "  {:<38} {:<24} {:<14} {}",
            machine.id.bright_cyan(),
            machine.machine_name.bright_green(),
            machine.serial_number,
            machine.manufacturer_name
        );
    }
    println!("\n  Total machines: {}", machines.len());
    Ok(())
}

async fn get_machine(service: &dyn MachineService, id: &str) -> Result<()> {
    let parsed =
        Uuid::parse_str(id).with_context(|| format!("'{}' is not a valid machine id", id))?;

    service.get_machine(parsed).await?.fold(
        || Err(anyhow::anyhow!("Machine '{}' not found", id)),
        |machine| {
            print_machine(&machine);
            Ok(())
        },
    )
}

fn print_machine(machine: &Machine) {
    let optional = |value: &Option<String>| {
        lift(value.clone()).reduce_with(|| "-".dimmed().to_string())
    };

    let field = |label: &str, value: String| {
        println!("  {} {}", label.bright_white().bold(), value);
    };

    field("Id:", machine.id.bright_cyan().to_string());
    field("Name:", machine.machine_name.bright_green().bold().to_string());
    field("Manufactured:", machine.manufacturing_year.format("%Y-%m-%d").to_string());
    field("Serial:", machine.serial_number.clone());
    field("Fabric serial:", optional(&machine.fabric_serial_number));
    field("Internal series:", optional(&machine.internal_series_name));
    field("Manufacturer:", machine.manufacturer_name.clone());
    field("Place:", optional(&machine.place_of_manufacturing));
}
