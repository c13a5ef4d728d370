//! Persistence backends and outbound data sources

use crate::contracts::{Machine, SomeData};
use crate::maybe::Maybe;
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

pub mod another_datasource;
pub mod document;
pub mod sqlite;

pub use another_datasource::AnotherDatasourceHttpClient;
pub use document::{DocumentContainer, DocumentMachineRepo};
pub use sqlite::SqliteMachineRepo;

/// Storage for machines
#[async_trait]
pub trait MachineRepo: Send + Sync {
    /// Store a new machine and return it as stored
    async fn add_machine(&self, machine: Machine) -> Result<Machine>;

    /// Replace the stored machine with the same id (insert if missing)
    async fn update_machine(&self, machine: Machine) -> Result<Machine>;

    /// Load a machine by id
    async fn get_machine(&self, id: Uuid) -> Result<Maybe<Machine>>;

    /// Load every machine; empty when there are none
    async fn get_machines(&self) -> Result<Vec<Machine>>;
}

/// A secondary service the API pulls supplementary data from
#[async_trait]
pub trait AnotherDatasource: Send + Sync {
    async fn get_some_data(&self) -> Result<SomeData>;
}
