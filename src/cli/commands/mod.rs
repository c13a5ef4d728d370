pub mod config;
pub mod machine;
pub mod serve;

pub use config::config_command;
pub use machine::machine_command;
pub use serve::serve_command;
