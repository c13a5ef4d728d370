//! Machine domain logic

pub mod machine;
pub mod service;

pub use service::{DefaultMachineService, MachineService};
