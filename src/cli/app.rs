use super::commands::config::ConfigCommands;
use super::commands::machine::MachineCommands;
use super::commands::serve::ServeArgs;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "machine-api")]
#[command(about = "Machine inventory REST API with SQLite and document stores")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve(ServeArgs),
    /// Inspect and edit machines in the configured store
    Machine(MachineCommands),
    /// Show or initialize the configuration
    Config(ConfigCommands),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::config::ConfigSubcommands;
    use crate::cli::commands::machine::MachineSubcommands;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_machine_update() {
        let cli = Cli::try_parse_from([
            "machine-api",
            "machine",
            "update",
            "0bf5b011-909b-4cd5-b700-4eb1ffc7d436",
            "--name",
            "Renamed",
        ])
        .unwrap();

        match cli.command {
            Commands::Machine(MachineCommands {
                command: MachineSubcommands::Update { id, fields },
            }) => {
                assert_eq!(id, "0bf5b011-909b-4cd5-b700-4eb1ffc7d436");
                assert_eq!(fields.name.as_deref(), Some("Renamed"));
                assert!(fields.serial.is_none());
            }
            _ => panic!("expected machine update"),
        }
    }

    #[test]
    fn test_parse_config_init() {
        let cli = Cli::try_parse_from(["machine-api", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigCommands {
                command: ConfigSubcommands::Init { force: true }
            })
        ));

        let cli = Cli::try_parse_from(["machine-api", "config", "init"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigCommands {
                command: ConfigSubcommands::Init { force: false }
            })
        ));
    }
}
